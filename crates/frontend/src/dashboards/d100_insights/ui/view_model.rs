//! Insights dashboard - View Model

use crate::shared::number_format::{format_currency, format_locale};
use contracts::dashboards::d100_insights::{
    CategoryPoint, CustomerPoint, DashboardSnapshot, DerivedMetrics, ProductPoint, RegionPoint,
    SalesPoint,
};
use leptos::prelude::*;

pub const READABLE_DESCRIPTION: &str =
    "Dashboard data including sales trends, product performance, and category distribution";

// Blue, green, red
pub const SALES_OVERVIEW_COLORS: &[&str] = &["#3b82f6", "#10b981", "#ef4444"];
pub const PRODUCT_COLORS: &[&str] = &["#8b5cf6", "#6366f1", "#4f46e5"];
pub const CATEGORY_COLORS: &[&str] = &["#3b82f6", "#64748b", "#10b981", "#f59e0b", "#94a3b8"];
pub const REGIONAL_COLORS: &[&str] = &["#059669", "#10b981", "#34d399", "#6ee7b7", "#a7f3d0"];
pub const CUSTOMER_COLORS: &[&str] = &["#f97316", "#f59e0b", "#eab308", "#facc15", "#fde047"];

#[derive(Clone, Copy)]
pub struct InsightsVm {
    pub sales: RwSignal<Vec<SalesPoint>>,
    pub products: RwSignal<Vec<ProductPoint>>,
    pub categories: RwSignal<Vec<CategoryPoint>>,
    pub regions: RwSignal<Vec<RegionPoint>>,
    pub customers: RwSignal<Vec<CustomerPoint>>,
    pub metrics: RwSignal<DerivedMetrics>,
}

impl InsightsVm {
    pub fn new() -> Self {
        Self {
            sales: RwSignal::new(Vec::new()),
            products: RwSignal::new(Vec::new()),
            categories: RwSignal::new(Vec::new()),
            regions: RwSignal::new(Vec::new()),
            customers: RwSignal::new(Vec::new()),
            metrics: RwSignal::new(DerivedMetrics::default()),
        }
    }

    /// Replaces the sales collection and recomputes the tiles from it
    pub fn set_sales(&self, sales: Vec<SalesPoint>) {
        self.metrics.set(DerivedMetrics::from_sales(&sales));
        self.sales.set(sales);
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            sales_data: self.sales.get(),
            product_data: self.products.get(),
            category_data: self.categories.get(),
            regional_data: self.regions.get(),
            customer_data: self.customers.get(),
            metrics: self.metrics.get(),
        }
    }
}

impl Default for InsightsVm {
    fn default() -> Self {
        Self::new()
    }
}

/// One summary tile: label, icon name, formatted value
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTileData {
    pub label: &'static str,
    pub icon: &'static str,
    pub value: String,
}

pub fn metric_tiles(metrics: &DerivedMetrics) -> Vec<MetricTileData> {
    vec![
        MetricTileData {
            label: "Total Revenue",
            icon: "revenue",
            value: format_currency(metrics.total_revenue),
        },
        MetricTileData {
            label: "Total Profit",
            icon: "profit",
            value: format_currency(metrics.total_profit),
        },
        MetricTileData {
            label: "Customers",
            icon: "customers",
            value: format_locale(metrics.total_customers),
        },
        MetricTileData {
            label: "Conversion Rate",
            icon: "conversion",
            value: metrics.conversion_rate.clone(),
        },
        MetricTileData {
            label: "Avg Order Value",
            icon: "order",
            value: format!("${}", metrics.average_order_value),
        },
        MetricTileData {
            label: "Profit Margin",
            icon: "margin",
            value: metrics.profit_margin.clone(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_and_values(metrics: &DerivedMetrics) -> Vec<(&'static str, String)> {
        metric_tiles(metrics)
            .into_iter()
            .map(|t| (t.label, t.value))
            .collect()
    }

    #[test]
    fn test_initial_tiles() {
        assert_eq!(
            labels_and_values(&DerivedMetrics::default()),
            vec![
                ("Total Revenue", "$0".to_string()),
                ("Total Profit", "$0".to_string()),
                ("Customers", "0".to_string()),
                ("Conversion Rate", "0%".to_string()),
                ("Avg Order Value", "$0".to_string()),
                ("Profit Margin", "0%".to_string()),
            ]
        );
    }

    #[test]
    fn test_tiles_after_sales() {
        let metrics = DerivedMetrics::from_sales(&[SalesPoint {
            date: "Jan".to_string(),
            sales: 12500.0,
            profit: 2500.0,
            expenses: 10000.0,
            customers: 1000.0,
        }]);
        let tiles = labels_and_values(&metrics);
        assert_eq!(tiles[0].1, "$12,500");
        assert_eq!(tiles[1].1, "$2,500");
        assert_eq!(tiles[2].1, "1,000");
        assert_eq!(tiles[3].1, "12.3%");
        assert_eq!(tiles[4].1, "$12.50");
        assert_eq!(tiles[5].1, "20.0%");
    }
}
