use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::domain::types::{NotificationPrefs, User};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::profile::{
    GetProfileUseCase, UpdateNotificationsUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::validate::Violations;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub budget_alerts: bool,
    pub weekly_reports: bool,
    pub expense_reminders: bool,
}

/// The account as every auth and profile endpoint reports it. The
/// password hash never leaves the service.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub monthly_income: f64,
    pub currency: String,
    pub notifications: NotificationsResponse,
    #[serde(serialize_with = "outlay_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "outlay_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            monthly_income: user.monthly_income,
            currency: user.currency,
            notifications: NotificationsResponse {
                budget_alerts: user.notifications.budget_alerts,
                weekly_reports: user.notifications.weekly_reports,
                expense_reminders: user.notifications.expense_reminders,
            },
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/me ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub monthly_income: Option<f64>,
    pub currency: Option<String>,
}

impl UpdateMeRequest {
    fn validate(self) -> Result<UpdateProfileInput, ApiError> {
        let mut violations = Violations::new();

        let name = self.name.map(|n| n.trim().to_owned());
        if matches!(&name, Some(n) if n.is_empty()) {
            violations.push("name", "name must not be empty");
        }
        if matches!(self.monthly_income, Some(income) if income < 0.0) {
            violations.push("monthly_income", "monthly_income must not be negative");
        }
        let currency = self.currency.map(|c| c.trim().to_owned());
        if matches!(&currency, Some(c) if c.is_empty()) {
            violations.push("currency", "currency must not be empty");
        }

        violations.finish()?;
        Ok(UpdateProfileInput {
            name,
            monthly_income: self.monthly_income,
            currency,
        })
    }
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let input = body.validate()?;
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id, input).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/me/notifications ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNotificationsRequest {
    pub budget_alerts: Option<bool>,
    pub weekly_reports: Option<bool>,
    pub expense_reminders: Option<bool>,
}

impl UpdateNotificationsRequest {
    fn validate(self) -> Result<NotificationPrefs, ApiError> {
        let mut violations = Violations::new();

        if self.budget_alerts.is_none() {
            violations.push("budget_alerts", "budget_alerts is required");
        }
        if self.weekly_reports.is_none() {
            violations.push("weekly_reports", "weekly_reports is required");
        }
        if self.expense_reminders.is_none() {
            violations.push("expense_reminders", "expense_reminders is required");
        }

        violations.finish()?;
        Ok(NotificationPrefs {
            budget_alerts: self.budget_alerts.unwrap_or_default(),
            weekly_reports: self.weekly_reports.unwrap_or_default(),
            expense_reminders: self.expense_reminders.unwrap_or_default(),
        })
    }
}

pub async fn update_notifications(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateNotificationsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let prefs = body.validate()?;
    let usecase = UpdateNotificationsUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id, prefs).await?;
    Ok(Json(user.into()))
}
