//! Spending category domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category an expense or budget belongs to.
///
/// Wire format: display strings (`"Food & Dining"`, `"Bills & Utilities"`,
/// ...), shared by expenses, budgets, and the summary report so category
/// joins line up across all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Shopping,
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Healthcare,
    Education,
    Travel,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Groceries,
    Investment,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 12] = [
        Self::FoodAndDining,
        Self::Transportation,
        Self::Shopping,
        Self::Entertainment,
        Self::BillsAndUtilities,
        Self::Healthcare,
        Self::Education,
        Self::Travel,
        Self::PersonalCare,
        Self::Groceries,
        Self::Investment,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::PersonalCare => "Personal Care",
            Self::Groceries => "Groceries",
            Self::Investment => "Investment",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed as a [`Category`].
#[derive(Debug, Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food & Dining" => Ok(Self::FoodAndDining),
            "Transportation" => Ok(Self::Transportation),
            "Shopping" => Ok(Self::Shopping),
            "Entertainment" => Ok(Self::Entertainment),
            "Bills & Utilities" => Ok(Self::BillsAndUtilities),
            "Healthcare" => Ok(Self::Healthcare),
            "Education" => Ok(Self::Education),
            "Travel" => Ok(Self::Travel),
            "Personal Care" => Ok(Self::PersonalCare),
            "Groceries" => Ok(Self::Groceries),
            "Investment" => Ok(Self::Investment),
            "Other" => Ok(Self::Other),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}
