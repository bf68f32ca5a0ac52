//! Budget CRUD and per-budget spend tracking.

use chrono::{NaiveDate, Utc};
use outlay_domain::{BudgetPeriod, Category};
use uuid::Uuid;

use crate::domain::repository::{BudgetRepository, ExpenseRepository};
use crate::domain::types::{Budget, BudgetPatch, BudgetUsage};
use crate::error::ApiError;

pub struct ListBudgetUsageUseCase<B, E>
where
    B: BudgetRepository,
    E: ExpenseRepository,
{
    pub budgets: B,
    pub expenses: E,
}

impl<B, E> ListBudgetUsageUseCase<B, E>
where
    B: BudgetRepository,
    E: ExpenseRepository,
{
    pub async fn execute(&self, owner: Uuid) -> Result<Vec<BudgetUsage>, ApiError> {
        let budgets = self.budgets.list(owner).await?;

        // One sum query per budget; users hold a handful of budgets at most
        let mut usages = Vec::with_capacity(budgets.len());
        for budget in budgets {
            let spent = self
                .expenses
                .sum_for_category(owner, budget.category, budget.start_date, budget.end_date)
                .await?;
            let remaining = budget.limit - spent;
            let percentage = if budget.limit > 0.0 { spent / budget.limit * 100.0 } else { 0.0 };

            usages.push(BudgetUsage {
                budget,
                spent,
                remaining,
                percentage,
            });
        }

        Ok(usages)
    }
}

#[derive(Debug)]
pub struct CreateBudgetInput {
    pub category: Category,
    pub limit: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: i16,
}

pub struct CreateBudgetUseCase<B: BudgetRepository> {
    pub budgets: B,
}

impl<B: BudgetRepository> CreateBudgetUseCase<B> {
    pub async fn execute(&self, owner: Uuid, input: CreateBudgetInput) -> Result<Budget, ApiError> {
        // One budget per category and owner → 409 on the second. The
        // unique index backstops the race between check and insert.
        if self.budgets.find_by_owner_category(owner, input.category).await?.is_some() {
            return Err(ApiError::Conflict);
        }

        let budget = Budget {
            id: Uuid::now_v7(),
            user_id: owner,
            category: input.category,
            limit: input.limit,
            period: input.period,
            start_date: input.start_date,
            end_date: input.end_date,
            alert_threshold: input.alert_threshold,
            created_at: Utc::now(),
        };
        self.budgets.create(&budget).await?;

        Ok(budget)
    }
}

pub struct UpdateBudgetUseCase<B: BudgetRepository> {
    pub budgets: B,
}

impl<B: BudgetRepository> UpdateBudgetUseCase<B> {
    pub async fn execute(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: BudgetPatch,
    ) -> Result<Budget, ApiError> {
        let existing = self.budgets.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        if existing.user_id != owner {
            return Err(ApiError::Forbidden);
        }

        // Moving to a category that already has a budget is a 409 too
        if let Some(category) = patch.category {
            if category != existing.category
                && self.budgets.find_by_owner_category(owner, category).await?.is_some()
            {
                return Err(ApiError::Conflict);
            }
        }

        self.budgets.update(id, &patch).await
    }
}

pub struct DeleteBudgetUseCase<B: BudgetRepository> {
    pub budgets: B,
}

impl<B: BudgetRepository> DeleteBudgetUseCase<B> {
    pub async fn execute(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
        let existing = self.budgets.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        if existing.user_id != owner {
            return Err(ApiError::Forbidden);
        }

        let deleted = self.budgets.delete(id).await?;
        if !deleted {
            return Err(ApiError::NotFound);
        }

        Ok(())
    }
}
