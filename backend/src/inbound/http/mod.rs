//! HTTP inbound adapter exposing the benefits REST endpoints.

pub mod benefits;
pub mod error;
pub mod fallback;
pub mod health;
pub mod state;

pub use error::{ApiError, ApiResult};
