pub mod api_utils;
pub mod charts;
pub mod components;
pub mod copilot;
pub mod icons;
pub mod number_format;
