use serde::{Deserialize, Serialize};

/// The five collections the insights dashboard loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightEndpoint {
    SalesOverview,
    TopFilms,
    CategoryPerformance,
    RegionalSales,
    CustomerActivity,
}

impl InsightEndpoint {
    pub const ALL: [InsightEndpoint; 5] = [
        InsightEndpoint::SalesOverview,
        InsightEndpoint::TopFilms,
        InsightEndpoint::CategoryPerformance,
        InsightEndpoint::RegionalSales,
        InsightEndpoint::CustomerActivity,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            InsightEndpoint::SalesOverview => "sales-overview",
            InsightEndpoint::TopFilms => "top-films",
            InsightEndpoint::CategoryPerformance => "category-performance",
            InsightEndpoint::RegionalSales => "regional-sales",
            InsightEndpoint::CustomerActivity => "customer-activity",
        }
    }

    pub fn path(&self) -> String {
        format!("/api/v1/insights/{}", self.slug())
    }

    /// Full URL under the configured API base (a trailing slash is tolerated)
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            InsightEndpoint::SalesOverview.path(),
            "/api/v1/insights/sales-overview"
        );
        assert_eq!(
            InsightEndpoint::CustomerActivity.url("http://localhost:8000/"),
            "http://localhost:8000/api/v1/insights/customer-activity"
        );
    }

    #[test]
    fn test_serde_matches_slug() {
        for endpoint in InsightEndpoint::ALL {
            let json = serde_json::to_string(&endpoint).unwrap();
            assert_eq!(json, format!("\"{}\"", endpoint.slug()));
        }
    }
}
