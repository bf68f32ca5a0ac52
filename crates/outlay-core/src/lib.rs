//! Cross-cutting service plumbing shared across the Outlay workspace:
//! liveness handler, request-id middleware, timestamp serialization, and
//! tracing setup.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
