pub mod dto;
pub mod endpoint;
pub mod metrics;

pub use dto::*;
pub use endpoint::InsightEndpoint;
pub use metrics::{to_fixed, DerivedMetrics, CONVERSION_RATE_PLACEHOLDER};
