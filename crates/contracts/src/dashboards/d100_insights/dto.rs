use serde::{Deserialize, Serialize};

use super::metrics::DerivedMetrics;

/// Status value the insights API uses for a successful response
pub const STATUS_SUCCESS: &str = "success";

/// Common response wrapper of every `/api/v1/insights/*` endpoint
///
/// ```json
/// { "status": "success", "data": [ ... ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsEnvelope<T> {
    pub status: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Optional error text some failure responses carry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> InsightsEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Data of a successful response, `None` for any other status
    pub fn into_success_data(self) -> Option<Vec<T>> {
        if self.is_success() {
            Some(self.data)
        } else {
            None
        }
    }

    /// Like [`Self::into_success_data`], with the status (and message, if
    /// any) as the error text
    pub fn into_result(self) -> Result<Vec<T>, String> {
        let status = self.status.clone();
        let message = self.message.clone();
        self.into_success_data().ok_or_else(|| match message {
            Some(message) => format!("Unexpected status '{}': {}", status, message),
            None => format!("Unexpected status '{}'", status),
        })
    }
}

/// One reporting period of the sales overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    #[serde(rename = "Expenses")]
    pub expenses: f64,
    #[serde(rename = "Customers")]
    pub customers: f64,
}

/// Top film by rentals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPoint {
    pub title: String,
    pub rental_count: f64,
    pub rental_rate: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    pub category: String,
    pub film_count: f64,
    pub avg_rental_rate: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPoint {
    pub region: String,
    pub sales: f64,
    #[serde(rename = "marketShare")]
    pub market_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPoint {
    pub customer_name: String,
    pub rental_count: f64,
    pub total_spent: f64,
}

/// Everything the dashboard shows, in the shape handed to the copilot as
/// readable context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub sales_data: Vec<SalesPoint>,
    pub product_data: Vec<ProductPoint>,
    pub category_data: Vec<CategoryPoint>,
    pub regional_data: Vec<RegionPoint>,
    pub customer_data: Vec<CustomerPoint>,
    pub metrics: DerivedMetrics,
}
