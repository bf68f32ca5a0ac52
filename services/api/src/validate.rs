//! Request validation plumbing.
//!
//! Every endpoint checks its whole request up front and reports all failing
//! fields in one `VALIDATION` response, rather than bailing on the first.

use chrono::NaiveDate;

use outlay_domain::{BudgetPeriod, Category, PaymentMethod};

use crate::error::{ApiError, FieldError};

/// Accumulates field violations for one request.
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing was pushed, otherwise the validation error.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// Cheap shape check for email addresses: one `@`, non-empty local part,
/// dotted domain. Deliverability is the mail provider's problem.
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Parse a `YYYY-MM-DD` wire date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse an optional date field, recording a violation on bad input.
pub fn optional_date(
    value: Option<&str>,
    field: &'static str,
    violations: &mut Violations,
) -> Option<NaiveDate> {
    match value {
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                violations.push(field, format!("{field} must be a YYYY-MM-DD date"));
                None
            }
        },
        None => None,
    }
}

/// Parse an optional category field, recording a violation on bad input.
pub fn optional_category(
    value: Option<&str>,
    field: &'static str,
    violations: &mut Violations,
) -> Option<Category> {
    match value {
        Some(raw) => match raw.parse() {
            Ok(category) => Some(category),
            Err(_) => {
                violations.push(field, format!("{field} is not a recognized category"));
                None
            }
        },
        None => None,
    }
}

/// Parse an optional budget-period field, recording a violation on bad
/// input.
pub fn optional_period(
    value: Option<&str>,
    field: &'static str,
    violations: &mut Violations,
) -> Option<BudgetPeriod> {
    match value {
        Some(raw) => match raw.parse() {
            Ok(period) => Some(period),
            Err(_) => {
                violations.push(field, format!("{field} must be weekly, monthly or yearly"));
                None
            }
        },
        None => None,
    }
}

/// Parse an optional payment-method field, recording a violation on bad
/// input.
pub fn optional_payment(
    value: Option<&str>,
    field: &'static str,
    violations: &mut Violations,
) -> Option<PaymentMethod> {
    match value {
        Some(raw) => match raw.parse() {
            Ok(method) => Some(method),
            Err(_) => {
                violations.push(field, format!("{field} is not a recognized payment method"));
                None
            }
        },
        None => None,
    }
}
