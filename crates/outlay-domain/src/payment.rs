//! Payment method domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an expense was paid.
///
/// Wire format: display strings (`"Cash"`, `"Credit Card"`, `"Debit Card"`,
/// `"UPI"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    /// Every payment method, in display order.
    pub const ALL: [PaymentMethod; 4] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::Upi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed as a [`PaymentMethod`].
#[derive(Debug, Error)]
#[error("unknown payment method: {0:?}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            "Credit Card" => Ok(Self::CreditCard),
            "Debit Card" => Ok(Self::DebitCard),
            "UPI" => Ok(Self::Upi),
            other => Err(UnknownPaymentMethod(other.to_owned())),
        }
    }
}
