pub mod auth;
pub mod budget;
pub mod expense;
pub mod profile;
