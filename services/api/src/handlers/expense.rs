use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use outlay_domain::{Category, PaymentMethod};

use crate::auth::Identity;
use crate::domain::types::{Expense, ExpenseFilter, ExpensePatch, ExpenseSummary};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::expense::{
    CreateExpenseInput, CreateExpenseUseCase, DeleteExpenseUseCase, ExpenseSummaryUseCase,
    ListExpensesUseCase, UpdateExpenseUseCase,
};
use crate::validate::{Violations, optional_category, optional_date, optional_payment};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    #[serde(serialize_with = "outlay_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        ExpenseResponse {
            id: expense.id.to_string(),
            user_id: expense.user_id.to_string(),
            title: expense.title,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            payment_method: expense.payment_method,
            description: expense.description,
            created_at: expense.created_at,
        }
    }
}

// ── GET /expenses ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListExpensesQuery {
    #[serde(rename = "start-date")]
    pub start_date: Option<String>,
    #[serde(rename = "end-date")]
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListExpensesQuery {
    fn validate(self) -> Result<ExpenseFilter, ApiError> {
        let mut violations = Violations::new();

        let start_date = optional_date(self.start_date.as_deref(), "start-date", &mut violations);
        let end_date = optional_date(self.end_date.as_deref(), "end-date", &mut violations);
        let category = optional_category(self.category.as_deref(), "category", &mut violations);
        let search = self.search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());

        violations.finish()?;
        Ok(ExpenseFilter {
            start_date,
            end_date,
            category,
            search,
        })
    }
}

pub async fn list_expenses(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<Vec<ExpenseResponse>>, ApiError> {
    let filter = query.validate()?;
    let usecase = ListExpensesUseCase {
        expenses: state.expense_repo(),
    };
    let expenses = usecase.execute(identity.user_id, filter).await?;
    Ok(Json(expenses.into_iter().map(ExpenseResponse::from).collect()))
}

// ── POST /expenses ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

impl CreateExpenseRequest {
    fn validate(self) -> Result<CreateExpenseInput, ApiError> {
        let mut violations = Violations::new();

        let title = self.title.map(|t| t.trim().to_owned()).unwrap_or_default();
        if title.is_empty() {
            violations.push("title", "title is required");
        }
        let amount = self.amount.unwrap_or_default();
        if amount <= 0.0 {
            violations.push("amount", "amount must be greater than 0");
        }
        let category = if self.category.is_none() {
            violations.push("category", "category is required");
            None
        } else {
            optional_category(self.category.as_deref(), "category", &mut violations)
        };
        // Absent date means "spent today"
        let date = optional_date(self.date.as_deref(), "date", &mut violations);
        let payment_method =
            optional_payment(self.payment_method.as_deref(), "payment_method", &mut violations);
        let description = self.description.map(|d| d.trim().to_owned()).filter(|d| !d.is_empty());

        violations.finish()?;
        Ok(CreateExpenseInput {
            title,
            amount,
            category: category.unwrap_or(Category::Other),
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
            payment_method: payment_method.unwrap_or_default(),
            description,
        })
    }
}

pub async fn create_expense(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body.validate()?;
    let usecase = CreateExpenseUseCase {
        expenses: state.expense_repo(),
    };
    let expense = usecase.execute(identity.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(expense))))
}

// ── PATCH /expenses/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

impl UpdateExpenseRequest {
    fn validate(self) -> Result<ExpensePatch, ApiError> {
        let mut violations = Violations::new();

        let title = self.title.map(|t| t.trim().to_owned());
        if matches!(&title, Some(t) if t.is_empty()) {
            violations.push("title", "title must not be empty");
        }
        if matches!(self.amount, Some(a) if a <= 0.0) {
            violations.push("amount", "amount must be greater than 0");
        }
        let category = optional_category(self.category.as_deref(), "category", &mut violations);
        let date = optional_date(self.date.as_deref(), "date", &mut violations);
        let payment_method =
            optional_payment(self.payment_method.as_deref(), "payment_method", &mut violations);
        let description = self.description.map(|d| d.trim().to_owned()).filter(|d| !d.is_empty());

        let patch = ExpensePatch {
            title: title.filter(|t| !t.is_empty()),
            amount: self.amount,
            category,
            date,
            payment_method,
            description,
        };
        if violations.is_empty()
            && patch.title.is_none()
            && patch.amount.is_none()
            && patch.category.is_none()
            && patch.date.is_none()
            && patch.payment_method.is_none()
            && patch.description.is_none()
        {
            violations.push("body", "at least one field is required");
        }

        violations.finish()?;
        Ok(patch)
    }
}

pub async fn update_expense(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let patch = body.validate()?;
    let usecase = UpdateExpenseUseCase {
        expenses: state.expense_repo(),
    };
    let expense = usecase.execute(identity.user_id, id, patch).await?;
    Ok(Json(expense.into()))
}

// ── DELETE /expenses/{id} ────────────────────────────────────────────────────

pub async fn delete_expense(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteExpenseUseCase {
        expenses: state.expense_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /expenses/summary ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SummaryQuery {
    #[serde(rename = "start-date")]
    pub start_date: Option<String>,
    #[serde(rename = "end-date")]
    pub end_date: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryTotalResponse {
    pub category: Category,
    pub total: f64,
    pub count: i64,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub by_category: Vec<CategoryTotalResponse>,
    pub total_spent: f64,
    pub total_count: i64,
}

impl From<ExpenseSummary> for SummaryResponse {
    fn from(summary: ExpenseSummary) -> Self {
        SummaryResponse {
            by_category: summary
                .by_category
                .into_iter()
                .map(|row| CategoryTotalResponse {
                    category: row.category,
                    total: row.total,
                    count: row.count,
                })
                .collect(),
            total_spent: summary.total_spent,
            total_count: summary.total_count,
        }
    }
}

pub async fn expense_summary(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let mut violations = Violations::new();
    let start_date = optional_date(query.start_date.as_deref(), "start-date", &mut violations);
    let end_date = optional_date(query.end_date.as_deref(), "end-date", &mut violations);
    violations.finish()?;

    let usecase = ExpenseSummaryUseCase {
        expenses: state.expense_repo(),
    };
    let summary = usecase.execute(identity.user_id, start_date, end_date).await?;
    Ok(Json(summary.into()))
}
