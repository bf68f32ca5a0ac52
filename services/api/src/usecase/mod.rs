pub mod budget;
pub mod challenge;
pub mod expense;
pub mod profile;
pub mod token;
