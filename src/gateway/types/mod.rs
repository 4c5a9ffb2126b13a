//! Gateway types module
//!
//! - [`ErrorBody`]: error response body shared by every module
//! - [`HealthResponse`]: `/health` payload

pub mod response;

pub use response::{ErrorBody, HealthResponse};
