use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use outlay_domain::{BudgetPeriod, Category, PaymentMethod};

/// Login-code session time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// How long an expired session stays takeable past its logical expiry.
/// Within this window verification reports expiry; after it the session is
/// gone and verification reports an unknown session.
pub const OTP_EXPIRED_GRACE_SECS: i64 = 600;

/// Access-token time-to-live in seconds (7 days).
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// A pending one-time login code, keyed by its opaque session id.
///
/// Never updated in place: a wrong-code attempt re-inserts the same value,
/// success and expiry remove it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSession {
    pub session_id: String,
    /// Raw login input the user supplied (email address or phone number).
    pub identifier: String,
    /// Six decimal digits.
    pub code: String,
    /// Account email the code was sent to. Differs from `identifier` when
    /// the user logged in by phone number.
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Point at which the stored record itself may be evicted.
    pub fn evict_deadline(&self) -> DateTime<Utc> {
        self.expires_at + Duration::seconds(OTP_EXPIRED_GRACE_SECS)
    }
}

/// Which account field a login identifier matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

/// Per-user notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub budget_alerts: bool,
    pub weekly_reports: bool,
    pub expense_reminders: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            budget_alerts: true,
            weekly_reports: false,
            expense_reminders: false,
        }
    }
}

/// User account owned by the API service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub monthly_income: f64,
    pub currency: String,
    pub notifications: NotificationPrefs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single spending entry.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filters for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<Category>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

/// Partial update for an expense. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
}

/// Aggregated spend for one category.
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: i64,
}

/// Spending report over an optional date window.
#[derive(Debug, Clone)]
pub struct ExpenseSummary {
    /// Per-category breakdown, highest total first.
    pub by_category: Vec<CategoryTotal>,
    pub total_spent: f64,
    pub total_count: i64,
}

/// Spending limit for one category over a date window.
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub limit: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Percentage of the limit at which the client surfaces an alert (0-100).
    pub alert_threshold: i16,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a budget. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub category: Option<Category>,
    pub limit: Option<f64>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub alert_threshold: Option<i16>,
}

/// A budget joined with the spend recorded inside its window.
#[derive(Debug, Clone)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub spent: f64,
    /// `limit - spent`; negative when the budget is blown.
    pub remaining: f64,
    /// `spent / limit * 100`, uncapped.
    pub percentage: f64,
}
