pub mod openai_provider;
pub mod tool_calls;
pub mod types;

pub use types::*;
