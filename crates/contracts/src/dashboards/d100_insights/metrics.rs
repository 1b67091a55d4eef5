use serde::{Deserialize, Serialize};

use super::dto::SalesPoint;

/// Conversion rate is not derived from any collection yet
pub const CONVERSION_RATE_PLACEHOLDER: &str = "12.3%";

/// Summary tiles computed client-side from the sales overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_customers: f64,
    pub conversion_rate: String,
    pub average_order_value: String,
    pub profit_margin: String,
}

impl Default for DerivedMetrics {
    fn default() -> Self {
        Self {
            total_revenue: 0.0,
            total_profit: 0.0,
            total_customers: 0.0,
            conversion_rate: "0%".to_string(),
            average_order_value: "0".to_string(),
            profit_margin: "0%".to_string(),
        }
    }
}

impl DerivedMetrics {
    /// Sums revenue, profit and customers over all periods and derives the
    /// ratios from the totals.
    ///
    /// Zero customers or zero revenue are not special-cased: the ratio tiles
    /// then show `NaN` / `Infinity`.
    pub fn from_sales(sales: &[SalesPoint]) -> Self {
        let total_revenue: f64 = sales.iter().map(|p| p.sales).sum();
        let total_profit: f64 = sales.iter().map(|p| p.profit).sum();
        let total_customers: f64 = sales.iter().map(|p| p.customers).sum();

        let average_order_value = to_fixed(total_revenue / total_customers, 2);
        let profit_margin = format!("{}%", to_fixed(total_profit / total_revenue * 100.0, 1));

        Self {
            total_revenue,
            total_profit,
            total_customers,
            conversion_rate: CONVERSION_RATE_PLACEHOLDER.to_string(),
            average_order_value,
            profit_margin,
        }
    }
}

/// Fixed-point formatting with browser semantics: exact halves round away
/// from zero and non-finite values print as `NaN` / `Infinity`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Exact tie: the standard formatter would round half to even
    if is_exact_half(value, digits) {
        let factor = 10f64.powi(digits as i32);
        let scaled = value * factor;
        let rounded = scaled.trunc() + scaled.signum();
        return format!("{:.prec$}", rounded / factor, prec = digits);
    }

    let formatted = format!("{:.prec$}", value, prec = digits);
    // -0.00 is printed without sign by browsers
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

/// Digits printed past the rounding position when looking for a tie. A
/// double that is an exact half at `digits` terminates right there, and a
/// near miss differs well before this many places.
const TIE_CHECK_DIGITS: usize = 30;

/// Whether the exact binary value sits halfway between two results at
/// `digits` decimals. `1.45` is stored as `1.4499999...`, so it is not.
fn is_exact_half(value: f64, digits: usize) -> bool {
    let expanded = format!("{:.prec$}", value.abs(), prec = digits + TIE_CHECK_DIGITS);
    let tail = &expanded.as_bytes()[expanded.len() - TIE_CHECK_DIGITS..];
    tail[0] == b'5' && tail[1..].iter().all(|b| *b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, sales: f64, profit: f64, expenses: f64, customers: f64) -> SalesPoint {
        SalesPoint {
            date: date.to_string(),
            sales,
            profit,
            expenses,
            customers,
        }
    }

    #[test]
    fn test_single_period() {
        let metrics = DerivedMetrics::from_sales(&[point("Jan", 100.0, 20.0, 80.0, 10.0)]);
        assert_eq!(metrics.total_revenue, 100.0);
        assert_eq!(metrics.total_profit, 20.0);
        assert_eq!(metrics.total_customers, 10.0);
        assert_eq!(metrics.average_order_value, "10.00");
        assert_eq!(metrics.profit_margin, "20.0%");
        assert_eq!(metrics.conversion_rate, "12.3%");
    }

    #[test]
    fn test_sums_over_periods() {
        let sales = vec![
            point("Jan", 1200.0, 300.0, 900.0, 40.0),
            point("Feb", 800.5, 150.25, 650.25, 25.0),
            point("Mar", 999.5, 49.75, 949.75, 35.0),
        ];
        let metrics = DerivedMetrics::from_sales(&sales);
        assert_eq!(metrics.total_revenue, 3000.0);
        assert_eq!(metrics.total_profit, 500.0);
        assert_eq!(metrics.total_customers, 100.0);
        assert_eq!(metrics.average_order_value, "30.00");
        assert_eq!(metrics.profit_margin, "16.7%");
    }

    #[test]
    fn test_zero_customers_is_not_guarded() {
        let metrics = DerivedMetrics::from_sales(&[point("Jan", 100.0, 20.0, 80.0, 0.0)]);
        assert_eq!(metrics.average_order_value, "Infinity");
        assert_eq!(metrics.profit_margin, "20.0%");
    }

    #[test]
    fn test_empty_sales() {
        let metrics = DerivedMetrics::from_sales(&[]);
        assert_eq!(metrics.total_revenue, 0.0);
        assert_eq!(metrics.average_order_value, "NaN");
        assert_eq!(metrics.profit_margin, "NaN%");
    }

    #[test]
    fn test_initial_metrics() {
        let metrics = DerivedMetrics::default();
        assert_eq!(metrics.conversion_rate, "0%");
        assert_eq!(metrics.average_order_value, "0");
        assert_eq!(metrics.profit_margin, "0%");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(10.0, 2), "10.00");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(16.666666, 1), "16.7");
        assert_eq!(to_fixed(-0.0001, 2), "0.00");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }

    #[test]
    fn test_to_fixed_near_halves_follow_stored_value() {
        // stored just below the half, so they round down
        assert_eq!(to_fixed(1.45, 1), "1.4");
        assert_eq!(to_fixed(0.35, 1), "0.3");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        // stored just above the half
        assert_eq!(to_fixed(0.15, 1), "0.1");
        assert_eq!(to_fixed(2.675, 2), "2.67");
        assert_eq!(to_fixed(8.345, 2), "8.35");
        // exact halves still round away from zero
        assert_eq!(to_fixed(0.375, 2), "0.38");
        assert_eq!(to_fixed(-2.5, 0), "-3");
    }

    #[test]
    fn test_profit_margin_near_half() {
        // 14.5 / 100 * 100 is 14.499999999999998
        let metrics = DerivedMetrics::from_sales(&[point("Jan", 100.0, 14.5, 85.5, 4.0)]);
        assert_eq!(metrics.profit_margin, "14.5%");
        let metrics = DerivedMetrics::from_sales(&[point("Jan", 100.0, 1.45, 98.55, 1.0)]);
        assert_eq!(metrics.profit_margin, "1.4%");
    }

    #[test]
    fn test_serialized_names() {
        let value = serde_json::to_value(DerivedMetrics::default()).unwrap();
        assert_eq!(value["averageOrderValue"], "0");
        assert_eq!(value["totalRevenue"], 0.0);
    }
}
