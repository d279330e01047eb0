pub mod seed;
pub mod student_store;

pub use student_store::{StoreDocument, StoreOptions, StudentStore, Subscription};
