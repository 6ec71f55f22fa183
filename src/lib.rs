pub mod aggregate;
pub mod error;
pub mod output;
pub mod rubric;
pub mod service;
pub mod store;

pub use error::JudgingError;
