pub mod error;
pub mod remote;
pub mod runtime;
pub mod service_adapter;

pub use error::RuntimeError;
pub use runtime::CopilotRuntime;
pub use service_adapter::SanitizingAdapter;
