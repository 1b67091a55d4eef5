use serde::Serialize;
use serde_json::Value;

/// One x-axis entry (or slice) with a value per category
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// Builds chart rows from serializable records: `index` names the label
/// field, `categories` the numeric fields in display order. Missing or
/// non-numeric fields count as zero.
pub fn tabulate<T: Serialize>(data: &[T], index: &str, categories: &[&str]) -> Vec<ChartRow> {
    data.iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .map(|record| {
            let label = match record.get(index) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let values = categories
                .iter()
                .map(|c| record.get(*c).and_then(Value::as_f64).unwrap_or(0.0))
                .collect();
            ChartRow { label, values }
        })
        .collect()
}

/// Largest value over all rows and categories, never below zero
pub fn max_value(rows: &[ChartRow]) -> f64 {
    rows.iter()
        .flat_map(|r| r.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d100_insights::{RegionPoint, SalesPoint};

    #[test]
    fn test_tabulate_sales() {
        let sales = vec![SalesPoint {
            date: "Jan".to_string(),
            sales: 100.0,
            profit: 20.0,
            expenses: 80.0,
            customers: 10.0,
        }];
        let rows = tabulate(&sales, "date", &["Sales", "Profit", "Expenses"]);
        assert_eq!(
            rows,
            vec![ChartRow {
                label: "Jan".to_string(),
                values: vec![100.0, 20.0, 80.0],
            }]
        );
    }

    #[test]
    fn test_tabulate_missing_category() {
        let regions = vec![RegionPoint {
            region: "India".to_string(),
            sales: 6034.78,
            market_share: 9.0,
        }];
        let rows = tabulate(&regions, "region", &["sales", "unknown"]);
        assert_eq!(rows[0].values, vec![6034.78, 0.0]);
    }

    #[test]
    fn test_max_value() {
        let rows = vec![
            ChartRow { label: "a".into(), values: vec![1.0, 7.5] },
            ChartRow { label: "b".into(), values: vec![3.0, f64::NAN] },
        ];
        assert_eq!(max_value(&rows), 7.5);
        assert_eq!(max_value(&[]), 0.0);
    }
}
