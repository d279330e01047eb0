pub mod auth;
pub mod dashboard_service;
pub mod factory;
pub mod http_auth_service;
pub mod http_client;
pub mod http_payment_service;
pub mod http_student_service;
pub mod local_auth_service;
pub mod payment_service;
pub mod ports;
pub mod session;
pub mod status;
pub mod student_service;

pub use factory::{ServiceFactory, ServiceMode, Services};
pub use ports::{AuthService, PaymentService, StudentService};
