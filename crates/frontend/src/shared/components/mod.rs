pub mod chart_card;
pub mod metric_tile;
