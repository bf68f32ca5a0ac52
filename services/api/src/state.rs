use sea_orm::DatabaseConnection;

use crate::infra::cache::AnyChallengeStore;
use crate::infra::db::{DbBudgetRepository, DbExpenseRepository, DbUserRepository};
use crate::infra::mail::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub challenges: AnyChallengeStore,
    pub mailer: HttpMailer,
    pub jwt_secret: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn expense_repo(&self) -> DbExpenseRepository {
        DbExpenseRepository {
            db: self.db.clone(),
        }
    }

    pub fn budget_repo(&self) -> DbBudgetRepository {
        DbBudgetRepository {
            db: self.db.clone(),
        }
    }
}
