//! SVG chart widgets for the dashboard cards
//!
//! - data.rs: turning typed rows into label/value tables
//! - geometry.rs: scales, paths and arcs (pure, unit tested)
//! - area_chart.rs / bar_chart.rs / donut_chart.rs: components

pub mod area_chart;
pub mod bar_chart;
pub mod data;
pub mod donut_chart;
pub mod geometry;
mod legend;

pub use area_chart::AreaChart;
pub use bar_chart::BarChart;
pub use data::{tabulate, ChartRow};
pub use donut_chart::DonutChart;
