//! HTTP middleware for Branch Office Core
//!
//! - Error response normalization (framework rejections become JSON)
//! - Request ID propagation and HTTP metrics

pub mod error_response;
pub mod metrics;

pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
