pub mod auth;
pub mod dashboard;
pub mod payments;
pub mod students;
