pub mod auth;
pub mod error;
pub mod holding;
pub mod insight;

pub use error::ApiError;
