pub mod d100_insights;

pub use d100_insights::ui::InsightsDashboard;
