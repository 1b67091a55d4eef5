pub mod dashboard;
pub mod search_results;
pub mod view_model;

pub use dashboard::InsightsDashboard;
