use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use outlay_api::domain::repository::{
    BudgetRepository, ChallengeStore, ExpenseRepository, Mailer, UserRepository,
};
use outlay_api::domain::types::{
    Budget, BudgetPatch, CategoryTotal, Expense, ExpenseFilter, ExpensePatch, NotificationPrefs,
    OTP_TTL_SECS, OtpSession, User,
};
use outlay_api::error::ApiError;
use outlay_domain::{BudgetPeriod, Category, PaymentMethod};

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal user list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        monthly_income: Option<f64>,
        currency: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(name) = name {
                user.name = name.to_owned();
            }
            if let Some(monthly_income) = monthly_income {
                user.monthly_income = monthly_income;
            }
            if let Some(currency) = currency {
                user.currency = currency.to_owned();
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_notifications(
        &self,
        id: Uuid,
        prefs: NotificationPrefs,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.notifications = prefs;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockExpenseRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockExpenseRepo {
    pub expenses: Arc<Mutex<Vec<Expense>>>,
}

impl MockExpenseRepo {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Arc::new(Mutex::new(expenses)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal expense list for post-execution inspection.
    pub fn expenses_handle(&self) -> Arc<Mutex<Vec<Expense>>> {
        Arc::clone(&self.expenses)
    }
}

impl ExpenseRepository for MockExpenseRepo {
    async fn list(&self, owner: Uuid, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError> {
        let mut rows: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        if let Some(category) = filter.category {
            rows.retain(|e| e.category == category);
        }
        if let Some(start) = filter.start_date {
            rows.retain(|e| e.date >= start);
        }
        if let Some(end) = filter.end_date {
            rows.retain(|e| e.date <= end);
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            rows.retain(|e| {
                e.title.to_lowercase().contains(&needle)
                    || e.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            });
        }
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, ApiError> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn create(&self, expense: &Expense) -> Result<(), ApiError> {
        self.expenses.lock().unwrap().push(expense.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Expense, ApiError> {
        let mut expenses = self.expenses.lock().unwrap();
        let expense = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ApiError::NotFound)?;
        if let Some(title) = &patch.title {
            expense.title = title.clone();
        }
        if let Some(amount) = patch.amount {
            expense.amount = amount;
        }
        if let Some(category) = patch.category {
            expense.category = category;
        }
        if let Some(date) = patch.date {
            expense.date = date;
        }
        if let Some(payment_method) = patch.payment_method {
            expense.payment_method = payment_method;
        }
        if let Some(description) = &patch.description {
            expense.description = Some(description.clone());
        }
        Ok(expense.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut expenses = self.expenses.lock().unwrap();
        let before = expenses.len();
        expenses.retain(|e| e.id != id);
        Ok(expenses.len() < before)
    }

    async fn category_totals(
        &self,
        owner: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotal>, ApiError> {
        let mut groups: HashMap<Category, (f64, i64)> = HashMap::new();
        for expense in self.expenses.lock().unwrap().iter() {
            if expense.user_id != owner {
                continue;
            }
            if let Some(start) = start_date {
                if expense.date < start {
                    continue;
                }
            }
            if let Some(end) = end_date {
                if expense.date > end {
                    continue;
                }
            }
            let entry = groups.entry(expense.category).or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category,
                total,
                count,
            })
            .collect())
    }

    async fn sum_for_category(
        &self,
        owner: Uuid,
        category: Category,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, ApiError> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                e.user_id == owner
                    && e.category == category
                    && e.date >= start_date
                    && e.date <= end_date
            })
            .map(|e| e.amount)
            .sum())
    }
}

// ── MockBudgetRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockBudgetRepo {
    pub budgets: Arc<Mutex<Vec<Budget>>>,
}

impl MockBudgetRepo {
    pub fn new(budgets: Vec<Budget>) -> Self {
        Self {
            budgets: Arc::new(Mutex::new(budgets)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal budget list for post-execution inspection.
    pub fn budgets_handle(&self) -> Arc<Mutex<Vec<Budget>>> {
        Arc::clone(&self.budgets)
    }
}

impl BudgetRepository for MockBudgetRepo {
    async fn list(&self, owner: Uuid) -> Result<Vec<Budget>, ApiError> {
        let mut rows: Vec<Budget> = self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Budget>, ApiError> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_by_owner_category(
        &self,
        owner: Uuid,
        category: Category,
    ) -> Result<Option<Budget>, ApiError> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.user_id == owner && b.category == category)
            .cloned())
    }

    async fn create(&self, budget: &Budget) -> Result<(), ApiError> {
        self.budgets.lock().unwrap().push(budget.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &BudgetPatch) -> Result<Budget, ApiError> {
        let mut budgets = self.budgets.lock().unwrap();
        let budget = budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::NotFound)?;
        if let Some(category) = patch.category {
            budget.category = category;
        }
        if let Some(limit) = patch.limit {
            budget.limit = limit;
        }
        if let Some(period) = patch.period {
            budget.period = period;
        }
        if let Some(start_date) = patch.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            budget.end_date = end_date;
        }
        if let Some(alert_threshold) = patch.alert_threshold {
            budget.alert_threshold = alert_threshold;
        }
        Ok(budget.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut budgets = self.budgets.lock().unwrap();
        let before = budgets.len();
        budgets.retain(|b| b.id != id);
        Ok(budgets.len() < before)
    }
}

// ── MockChallengeStore ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockChallengeStore {
    pub sessions: Arc<Mutex<Vec<OtpSession>>>,
}

impl MockChallengeStore {
    pub fn new(sessions: Vec<OtpSession>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal session list for post-execution inspection.
    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<OtpSession>>> {
        Arc::clone(&self.sessions)
    }
}

impl ChallengeStore for MockChallengeStore {
    async fn put(&self, session: &OtpSession) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|s| s.session_id != session.session_id);
        sessions.push(session.clone());
        Ok(())
    }

    async fn take(&self, session_id: &str) -> Result<Option<OtpSession>, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter().position(|s| s.session_id == session_id) {
            Some(index) => Ok(Some(sessions.remove(index))),
            None => Ok(None),
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| now <= s.evict_deadline());
        Ok(before - sessions.len())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub fail: bool,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn working() -> Self {
        Self {
            fail: false,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Returns a shared handle to the delivered `(to, code)` pairs.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn deliver_code(&self, to: &str, code: &str) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::DeliveryFailed);
        }
        self.sent.lock().unwrap().push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        name: "John Doe".to_owned(),
        email: "john@example.com".to_owned(),
        phone: Some("+1234567890".to_owned()),
        // Minimum cost keeps test setup fast.
        password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
        monthly_income: 5000.0,
        currency: "USD".to_owned(),
        notifications: NotificationPrefs::default(),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_session(code: &str) -> OtpSession {
    let now = Utc::now();
    OtpSession {
        session_id: Uuid::new_v4().to_string(),
        identifier: "+1234567890".to_owned(),
        code: code.to_owned(),
        delivery_address: "john@example.com".to_owned(),
        created_at: now,
        expires_at: now + Duration::seconds(OTP_TTL_SECS),
    }
}

pub fn test_expense(owner: Uuid, category: Category, amount: f64, date: NaiveDate) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        user_id: owner,
        title: format!("{category} purchase"),
        amount,
        category,
        date,
        payment_method: PaymentMethod::CreditCard,
        description: None,
        created_at: Utc::now(),
    }
}

pub fn test_budget(owner: Uuid, category: Category, limit: f64) -> Budget {
    Budget {
        id: Uuid::new_v4(),
        user_id: owner,
        category,
        limit,
        period: BudgetPeriod::Yearly,
        start_date: date(2026, 1, 1),
        end_date: date(2026, 12, 31),
        alert_threshold: 80,
        created_at: Utc::now(),
    }
}

pub const TEST_PASSWORD: &str = "password123";

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
