#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use outlay_domain::Category;

use crate::domain::types::{
    Budget, BudgetPatch, CategoryTotal, Expense, ExpenseFilter, ExpensePatch, NotificationPrefs,
    OtpSession, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Apply the provided profile fields; `None` leaves a field unchanged.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        monthly_income: Option<f64>,
        currency: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn update_notifications(
        &self,
        id: Uuid,
        prefs: NotificationPrefs,
    ) -> Result<(), ApiError>;
}

/// Repository for spending entries.
pub trait ExpenseRepository: Send + Sync {
    /// List an owner's expenses matching `filter`, most recent date first.
    async fn list(&self, owner: Uuid, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, ApiError>;

    async fn create(&self, expense: &Expense) -> Result<(), ApiError>;

    /// Apply a partial update and return the updated row.
    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Expense, ApiError>;

    /// Delete an expense. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Sum and count per category for an owner, inside the optional
    /// inclusive date window. Categories with no rows are absent.
    async fn category_totals(
        &self,
        owner: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotal>, ApiError>;

    /// Total spend for one owner + category inside an inclusive window.
    /// Zero when nothing matches.
    async fn sum_for_category(
        &self,
        owner: Uuid,
        category: Category,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, ApiError>;
}

/// Repository for budgets.
pub trait BudgetRepository: Send + Sync {
    /// List an owner's budgets, newest first.
    async fn list(&self, owner: Uuid) -> Result<Vec<Budget>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Budget>, ApiError>;

    async fn find_by_owner_category(
        &self,
        owner: Uuid,
        category: Category,
    ) -> Result<Option<Budget>, ApiError>;

    async fn create(&self, budget: &Budget) -> Result<(), ApiError>;

    /// Apply a partial update and return the updated row.
    async fn update(&self, id: Uuid, patch: &BudgetPatch) -> Result<Budget, ApiError>;

    /// Delete a budget. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Store for pending login-code sessions (Redis or in-process, short TTL).
pub trait ChallengeStore: Send + Sync {
    /// Store a session under its id. The backend keeps the record until
    /// [`OtpSession::evict_deadline`].
    async fn put(&self, session: &OtpSession) -> Result<(), ApiError>;

    /// Remove and return a session in one step. A session is observed by at
    /// most one caller; concurrent takes on the same id get `None`.
    async fn take(&self, session_id: &str) -> Result<Option<OtpSession>, ApiError>;

    /// Drop sessions past their evict deadline. Returns how many were
    /// removed; backends with native TTL report 0.
    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ApiError>;
}

/// Outbound mail delivery for login codes. Best-effort: no retry, no queue.
pub trait Mailer: Send + Sync {
    async fn deliver_code(&self, to: &str, code: &str) -> Result<(), ApiError>;
}
