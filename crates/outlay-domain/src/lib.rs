//! Domain vocabulary shared across the Outlay workspace.
//!
//! Pure types with no framework dependencies: the ledger's category,
//! payment-method and budget-period enums plus their wire strings, shared
//! so the service, schema and seed all agree on them.

pub mod category;
pub mod payment;
pub mod period;

pub use category::Category;
pub use payment::PaymentMethod;
pub use period::BudgetPeriod;
