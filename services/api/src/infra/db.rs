use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use outlay_domain::Category;
use outlay_schema::{budgets, expenses, users};

use crate::domain::repository::{BudgetRepository, ExpenseRepository, UserRepository};
use crate::domain::types::{
    Budget, BudgetPatch, CategoryTotal, Expense, ExpenseFilter, ExpensePatch, NotificationPrefs,
    User,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            password_hash: Set(user.password_hash.clone()),
            monthly_income: Set(user.monthly_income),
            currency: Set(user.currency.clone()),
            budget_alerts: Set(user.notifications.budget_alerts),
            weekly_reports: Set(user.notifications.weekly_reports),
            expense_reminders: Set(user.notifications.expense_reminders),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        monthly_income: Option<f64>,
        currency: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(new_name) = name {
            am.name = Set(new_name.to_owned());
        }
        if let Some(new_income) = monthly_income {
            am.monthly_income = Set(new_income);
        }
        if let Some(new_currency) = currency {
            am.currency = Set(new_currency.to_owned());
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update user profile")?;
        Ok(())
    }

    async fn update_notifications(
        &self,
        id: Uuid,
        prefs: NotificationPrefs,
    ) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            budget_alerts: Set(prefs.budget_alerts),
            weekly_reports: Set(prefs.weekly_reports),
            expense_reminders: Set(prefs.expense_reminders),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user notifications")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        monthly_income: model.monthly_income,
        currency: model.currency,
        notifications: NotificationPrefs {
            budget_alerts: model.budget_alerts,
            weekly_reports: model.weekly_reports,
            expense_reminders: model.expense_reminders,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Expense repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbExpenseRepository {
    pub db: DatabaseConnection,
}

impl ExpenseRepository for DbExpenseRepository {
    async fn list(&self, owner: Uuid, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError> {
        let mut query = expenses::Entity::find().filter(expenses::Column::UserId.eq(owner));

        if let Some(category) = filter.category {
            query = query.filter(expenses::Column::Category.eq(category.as_str()));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(expenses::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(expenses::Column::Date.lte(end));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(expenses::Column::Title)))
                            .like(pattern.as_str()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(expenses::Column::Description)))
                            .like(pattern.as_str()),
                    ),
            );
        }

        let models = query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list expenses")?;
        models.into_iter().map(expense_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, ApiError> {
        let model = expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find expense by id")?;
        model.map(expense_from_model).transpose()
    }

    async fn create(&self, expense: &Expense) -> Result<(), ApiError> {
        expenses::ActiveModel {
            id: Set(expense.id),
            user_id: Set(expense.user_id),
            title: Set(expense.title.clone()),
            amount: Set(expense.amount),
            category: Set(expense.category.as_str().to_owned()),
            date: Set(expense.date),
            payment_method: Set(expense.payment_method.as_str().to_owned()),
            description: Set(expense.description.clone()),
            created_at: Set(expense.created_at),
        }
        .insert(&self.db)
        .await
        .context("create expense")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Expense, ApiError> {
        let mut am = expenses::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(title) = &patch.title {
            am.title = Set(title.clone());
        }
        if let Some(amount) = patch.amount {
            am.amount = Set(amount);
        }
        if let Some(category) = patch.category {
            am.category = Set(category.as_str().to_owned());
        }
        if let Some(date) = patch.date {
            am.date = Set(date);
        }
        if let Some(payment_method) = patch.payment_method {
            am.payment_method = Set(payment_method.as_str().to_owned());
        }
        if let Some(description) = &patch.description {
            am.description = Set(Some(description.clone()));
        }
        let model = am.update(&self.db).await.context("update expense")?;
        expense_from_model(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete expense")?;
        Ok(result.rows_affected > 0)
    }

    async fn category_totals(
        &self,
        owner: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotal>, ApiError> {
        use sea_orm::FromQueryResult;

        #[derive(Debug, FromQueryResult)]
        struct CategoryTotalRow {
            category: String,
            total: f64,
            count: i64,
        }

        let mut query = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(expenses::Column::Amount.sum(), "total")
            .column_as(expenses::Column::Id.count(), "count")
            .filter(expenses::Column::UserId.eq(owner));
        if let Some(start) = start_date {
            query = query.filter(expenses::Column::Date.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(expenses::Column::Date.lte(end));
        }

        let rows = query
            .group_by(expenses::Column::Category)
            .into_model::<CategoryTotalRow>()
            .all(&self.db)
            .await
            .context("sum expenses per category")?;

        rows.into_iter()
            .map(|row| {
                let category = row.category.parse().context("parse expense category")?;
                Ok(CategoryTotal {
                    category,
                    total: row.total,
                    count: row.count,
                })
            })
            .collect()
    }

    async fn sum_for_category(
        &self,
        owner: Uuid,
        category: Category,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, ApiError> {
        use sea_orm::FromQueryResult;

        // SUM over zero rows is NULL, not zero
        #[derive(Debug, FromQueryResult)]
        struct SumRow {
            total: Option<f64>,
        }

        let row = expenses::Entity::find()
            .select_only()
            .column_as(expenses::Column::Amount.sum(), "total")
            .filter(expenses::Column::UserId.eq(owner))
            .filter(expenses::Column::Category.eq(category.as_str()))
            .filter(expenses::Column::Date.gte(start_date))
            .filter(expenses::Column::Date.lte(end_date))
            .into_model::<SumRow>()
            .one(&self.db)
            .await
            .context("sum expenses for category")?;
        Ok(row.and_then(|r| r.total).unwrap_or(0.0))
    }
}

fn expense_from_model(model: expenses::Model) -> Result<Expense, ApiError> {
    let category = model.category.parse().context("parse expense category")?;
    let payment_method = model
        .payment_method
        .parse()
        .context("parse expense payment method")?;
    Ok(Expense {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        amount: model.amount,
        category,
        date: model.date,
        payment_method,
        description: model.description,
        created_at: model.created_at,
    })
}

// ── Budget repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBudgetRepository {
    pub db: DatabaseConnection,
}

impl BudgetRepository for DbBudgetRepository {
    async fn list(&self, owner: Uuid) -> Result<Vec<Budget>, ApiError> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list budgets")?;
        models.into_iter().map(budget_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Budget>, ApiError> {
        let model = budgets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find budget by id")?;
        model.map(budget_from_model).transpose()
    }

    async fn find_by_owner_category(
        &self,
        owner: Uuid,
        category: Category,
    ) -> Result<Option<Budget>, ApiError> {
        let model = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner))
            .filter(budgets::Column::Category.eq(category.as_str()))
            .one(&self.db)
            .await
            .context("find budget by owner and category")?;
        model.map(budget_from_model).transpose()
    }

    async fn create(&self, budget: &Budget) -> Result<(), ApiError> {
        budgets::ActiveModel {
            id: Set(budget.id),
            user_id: Set(budget.user_id),
            category: Set(budget.category.as_str().to_owned()),
            limit_amount: Set(budget.limit),
            period: Set(budget.period.as_str().to_owned()),
            start_date: Set(budget.start_date),
            end_date: Set(budget.end_date),
            alert_threshold: Set(budget.alert_threshold),
            created_at: Set(budget.created_at),
        }
        .insert(&self.db)
        .await
        .context("create budget")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &BudgetPatch) -> Result<Budget, ApiError> {
        let mut am = budgets::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(category) = patch.category {
            am.category = Set(category.as_str().to_owned());
        }
        if let Some(limit) = patch.limit {
            am.limit_amount = Set(limit);
        }
        if let Some(period) = patch.period {
            am.period = Set(period.as_str().to_owned());
        }
        if let Some(start_date) = patch.start_date {
            am.start_date = Set(start_date);
        }
        if let Some(end_date) = patch.end_date {
            am.end_date = Set(end_date);
        }
        if let Some(alert_threshold) = patch.alert_threshold {
            am.alert_threshold = Set(alert_threshold);
        }
        let model = am.update(&self.db).await.context("update budget")?;
        budget_from_model(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = budgets::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete budget")?;
        Ok(result.rows_affected > 0)
    }
}

fn budget_from_model(model: budgets::Model) -> Result<Budget, ApiError> {
    let category = model.category.parse().context("parse budget category")?;
    let period = model.period.parse().context("parse budget period")?;
    Ok(Budget {
        id: model.id,
        user_id: model.user_id,
        category,
        limit: model.limit_amount,
        period,
        start_date: model.start_date,
        end_date: model.end_date,
        alert_threshold: model.alert_threshold,
        created_at: model.created_at,
    })
}
