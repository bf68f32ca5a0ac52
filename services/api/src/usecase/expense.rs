//! Expense CRUD and the category summary report.

use chrono::{NaiveDate, Utc};
use outlay_domain::{Category, PaymentMethod};
use uuid::Uuid;

use crate::domain::repository::ExpenseRepository;
use crate::domain::types::{Expense, ExpenseFilter, ExpensePatch, ExpenseSummary};
use crate::error::ApiError;

pub struct ListExpensesUseCase<R: ExpenseRepository> {
    pub expenses: R,
}

impl<R: ExpenseRepository> ListExpensesUseCase<R> {
    pub async fn execute(
        &self,
        owner: Uuid,
        filter: ExpenseFilter,
    ) -> Result<Vec<Expense>, ApiError> {
        self.expenses.list(owner, &filter).await
    }
}

#[derive(Debug)]
pub struct CreateExpenseInput {
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

pub struct CreateExpenseUseCase<R: ExpenseRepository> {
    pub expenses: R,
}

impl<R: ExpenseRepository> CreateExpenseUseCase<R> {
    pub async fn execute(
        &self,
        owner: Uuid,
        input: CreateExpenseInput,
    ) -> Result<Expense, ApiError> {
        let expense = Expense {
            id: Uuid::now_v7(),
            user_id: owner,
            title: input.title,
            amount: input.amount,
            category: input.category,
            date: input.date,
            payment_method: input.payment_method,
            description: input.description,
            created_at: Utc::now(),
        };
        self.expenses.create(&expense).await?;

        Ok(expense)
    }
}

pub struct UpdateExpenseUseCase<R: ExpenseRepository> {
    pub expenses: R,
}

impl<R: ExpenseRepository> UpdateExpenseUseCase<R> {
    pub async fn execute(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ExpensePatch,
    ) -> Result<Expense, ApiError> {
        // 404 before 403: a missing record never confirms another
        // owner's id.
        let existing = self.expenses.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        if existing.user_id != owner {
            return Err(ApiError::Forbidden);
        }

        self.expenses.update(id, &patch).await
    }
}

pub struct DeleteExpenseUseCase<R: ExpenseRepository> {
    pub expenses: R,
}

impl<R: ExpenseRepository> DeleteExpenseUseCase<R> {
    pub async fn execute(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
        let existing = self.expenses.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        if existing.user_id != owner {
            return Err(ApiError::Forbidden);
        }

        // false here means another delete won the race
        let deleted = self.expenses.delete(id).await?;
        if !deleted {
            return Err(ApiError::NotFound);
        }

        Ok(())
    }
}

pub struct ExpenseSummaryUseCase<R: ExpenseRepository> {
    pub expenses: R,
}

impl<R: ExpenseRepository> ExpenseSummaryUseCase<R> {
    pub async fn execute(
        &self,
        owner: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<ExpenseSummary, ApiError> {
        let mut by_category = self.expenses.category_totals(owner, start_date, end_date).await?;

        // Biggest spender first
        by_category
            .sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

        let total_spent = by_category.iter().map(|row| row.total).sum();
        let total_count = by_category.iter().map(|row| row.count).sum();

        Ok(ExpenseSummary {
            by_category,
            total_spent,
            total_count,
        })
    }
}
