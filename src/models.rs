pub mod auth;
pub mod dashboard;
pub mod payment;
pub mod student;
