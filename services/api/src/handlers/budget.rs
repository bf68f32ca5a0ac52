use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use outlay_domain::{BudgetPeriod, Category};

use crate::auth::Identity;
use crate::domain::types::{Budget, BudgetPatch, BudgetUsage};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::budget::{
    CreateBudgetInput, CreateBudgetUseCase, DeleteBudgetUseCase, ListBudgetUsageUseCase,
    UpdateBudgetUseCase,
};
use crate::validate::{Violations, optional_category, optional_date, optional_period};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BudgetResponse {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub limit: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: i16,
    #[serde(serialize_with = "outlay_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        BudgetResponse {
            id: budget.id.to_string(),
            user_id: budget.user_id.to_string(),
            category: budget.category,
            limit: budget.limit,
            period: budget.period,
            start_date: budget.start_date,
            end_date: budget.end_date,
            alert_threshold: budget.alert_threshold,
            created_at: budget.created_at,
        }
    }
}

/// A budget with its spend-so-far, as `GET /budgets` reports it.
#[derive(Serialize)]
pub struct BudgetUsageResponse {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub limit: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: i16,
    pub spent: f64,
    pub remaining: f64,
    /// `spent / limit * 100`, uncapped: 150 means half again over.
    pub percentage: f64,
    #[serde(serialize_with = "outlay_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<BudgetUsage> for BudgetUsageResponse {
    fn from(usage: BudgetUsage) -> Self {
        BudgetUsageResponse {
            id: usage.budget.id.to_string(),
            user_id: usage.budget.user_id.to_string(),
            category: usage.budget.category,
            limit: usage.budget.limit,
            period: usage.budget.period,
            start_date: usage.budget.start_date,
            end_date: usage.budget.end_date,
            alert_threshold: usage.budget.alert_threshold,
            spent: usage.spent,
            remaining: usage.remaining,
            percentage: usage.percentage,
            created_at: usage.budget.created_at,
        }
    }
}

// ── GET /budgets ─────────────────────────────────────────────────────────────

pub async fn list_budgets(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<BudgetUsageResponse>>, ApiError> {
    let usecase = ListBudgetUsageUseCase {
        budgets: state.budget_repo(),
        expenses: state.expense_repo(),
    };
    let usages = usecase.execute(identity.user_id).await?;
    Ok(Json(usages.into_iter().map(BudgetUsageResponse::from).collect()))
}

// ── POST /budgets ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBudgetRequest {
    pub category: Option<String>,
    pub limit: Option<f64>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub alert_threshold: Option<i16>,
}

impl CreateBudgetRequest {
    fn validate(self) -> Result<CreateBudgetInput, ApiError> {
        let mut violations = Violations::new();

        let category = if self.category.is_none() {
            violations.push("category", "category is required");
            None
        } else {
            optional_category(self.category.as_deref(), "category", &mut violations)
        };
        let limit = self.limit.unwrap_or_default();
        if limit <= 0.0 {
            violations.push("limit", "limit must be greater than 0");
        }
        let period = optional_period(self.period.as_deref(), "period", &mut violations);
        let start_date = optional_date(self.start_date.as_deref(), "start_date", &mut violations);
        let end_date = if self.end_date.is_none() {
            violations.push("end_date", "end_date is required");
            None
        } else {
            optional_date(self.end_date.as_deref(), "end_date", &mut violations)
        };
        let alert_threshold = self.alert_threshold.unwrap_or(80);
        if !(0..=100).contains(&alert_threshold) {
            violations.push("alert_threshold", "alert_threshold must be between 0 and 100");
        }

        violations.finish()?;
        Ok(CreateBudgetInput {
            category: category.unwrap_or(Category::Other),
            limit,
            period: period.unwrap_or_default(),
            start_date: start_date.unwrap_or_else(|| Utc::now().date_naive()),
            end_date: end_date.unwrap_or_else(|| Utc::now().date_naive()),
            alert_threshold,
        })
    }
}

pub async fn create_budget(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body.validate()?;
    let usecase = CreateBudgetUseCase {
        budgets: state.budget_repo(),
    };
    let budget = usecase.execute(identity.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(BudgetResponse::from(budget))))
}

// ── PATCH /budgets/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBudgetRequest {
    pub category: Option<String>,
    pub limit: Option<f64>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub alert_threshold: Option<i16>,
}

impl UpdateBudgetRequest {
    fn validate(self) -> Result<BudgetPatch, ApiError> {
        let mut violations = Violations::new();

        let category = optional_category(self.category.as_deref(), "category", &mut violations);
        if matches!(self.limit, Some(l) if l <= 0.0) {
            violations.push("limit", "limit must be greater than 0");
        }
        let period = optional_period(self.period.as_deref(), "period", &mut violations);
        let start_date = optional_date(self.start_date.as_deref(), "start_date", &mut violations);
        let end_date = optional_date(self.end_date.as_deref(), "end_date", &mut violations);
        if matches!(self.alert_threshold, Some(t) if !(0..=100).contains(&t)) {
            violations.push("alert_threshold", "alert_threshold must be between 0 and 100");
        }

        let patch = BudgetPatch {
            category,
            limit: self.limit,
            period,
            start_date,
            end_date,
            alert_threshold: self.alert_threshold,
        };
        if violations.is_empty()
            && patch.category.is_none()
            && patch.limit.is_none()
            && patch.period.is_none()
            && patch.start_date.is_none()
            && patch.end_date.is_none()
            && patch.alert_threshold.is_none()
        {
            violations.push("body", "at least one field is required");
        }

        violations.finish()?;
        Ok(patch)
    }
}

pub async fn update_budget(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBudgetRequest>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let patch = body.validate()?;
    let usecase = UpdateBudgetUseCase {
        budgets: state.budget_repo(),
    };
    let budget = usecase.execute(identity.user_id, id, patch).await?;
    Ok(Json(budget.into()))
}

// ── DELETE /budgets/{id} ─────────────────────────────────────────────────────

pub async fn delete_budget(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteBudgetUseCase {
        budgets: state.budget_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
