//! sea-orm entities for the Outlay API service.

pub mod budgets;
pub mod expenses;
pub mod users;
