//! Business KPI aggregates and a smoothing-based trend projection
//!
//! The forecast is an illustrative estimator, not a calibrated time-series
//! model: single exponential smoothing with a fixed factor, a linear trend
//! read off the smoothed endpoints, and a fixed placeholder confidence.
//! Responses name the method and its one tunable so callers know exactly
//! what produced the numbers.

use serde::{Deserialize, Serialize};
use tabstat_core::{stats, Error, Result, Table};

/// Fixed smoothing factor of the exponential smoother
const SMOOTHING_FACTOR: f64 = 0.3;
/// Fixed placeholder confidence reported with every forecast
const PLACEHOLDER_CONFIDENCE: f64 = 0.7;
/// Observations required before projecting anything
const MIN_FORECAST_POINTS: usize = 3;

/// Revenue/cost/margin aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub revenue_column: String,
    pub total_revenue: f64,
    pub mean_revenue: f64,
    pub observations: usize,
    /// Present only when a cost column was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostKpis>,
}

/// Cost-side aggregates derived when a cost column is supplied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostKpis {
    pub cost_column: String,
    pub total_cost: f64,
    pub net_profit: f64,
    /// Percent of revenue; `None` when total revenue is zero
    pub profit_margin: Option<f64>,
}

/// Direction classification of the projected trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Forecast output with the smoothed series and projected points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub column: String,
    pub method: String,
    pub smoothing_factor: f64,
    pub smoothed: Vec<f64>,
    pub trend: f64,
    pub trend_direction: TrendDirection,
    pub projections: Vec<f64>,
    /// Fixed placeholder, not an estimated interval
    pub confidence: f64,
}

/// Compute revenue KPIs, optionally extended with cost-side aggregates
///
/// Missing values are excluded. A supplied cost column must exist.
pub fn compute_kpis(
    table: &Table,
    revenue_column: &str,
    cost_column: Option<&str>,
) -> Result<KpiReport> {
    let revenue_col = table.column(revenue_column)?;
    if !revenue_col.is_numeric() {
        return Err(Error::non_numeric_column(revenue_column));
    }
    let revenue = revenue_col.numeric_values();
    if revenue.is_empty() {
        return Err(Error::empty_sample(revenue_column));
    }
    let total_revenue: f64 = revenue.iter().sum();

    let cost = match cost_column {
        Some(name) => {
            let cost_col = table.column(name)?;
            if !cost_col.is_numeric() {
                return Err(Error::non_numeric_column(name));
            }
            let total_cost: f64 = cost_col.numeric_values().iter().sum();
            let net_profit = total_revenue - total_cost;
            let profit_margin = if total_revenue != 0.0 {
                Some(net_profit / total_revenue * 100.0)
            } else {
                None
            };
            Some(CostKpis {
                cost_column: name.to_string(),
                total_cost,
                net_profit,
                profit_margin,
            })
        }
        None => None,
    };

    Ok(KpiReport {
        revenue_column: revenue_column.to_string(),
        total_revenue,
        mean_revenue: stats::mean(&revenue),
        observations: revenue.len(),
        cost,
    })
}

/// Project `periods` future points of a column by exponential smoothing
///
/// Requires at least three non-missing values. The trend is the smoothed
/// end-to-end slope divided by the series length, extrapolated from the
/// last smoothed value.
pub fn forecast(table: &Table, column: &str, periods: usize) -> Result<ForecastReport> {
    let col = table.column(column)?;
    if !col.is_numeric() {
        return Err(Error::non_numeric_column(column));
    }
    let values = col.numeric_values();
    if values.len() < MIN_FORECAST_POINTS {
        return Err(Error::InsufficientData {
            expected: MIN_FORECAST_POINTS,
            actual: values.len(),
        });
    }

    let mut smoothed = Vec::with_capacity(values.len());
    let mut level = values[0];
    smoothed.push(level);
    for &value in &values[1..] {
        level = SMOOTHING_FACTOR * value + (1.0 - SMOOTHING_FACTOR) * level;
        smoothed.push(level);
    }

    let first = smoothed[0];
    let last = smoothed[smoothed.len() - 1];
    let trend = (last - first) / smoothed.len() as f64;
    let trend_direction = if trend.abs() < 1e-9 {
        TrendDirection::Stable
    } else if trend > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    let projections = (1..=periods)
        .map(|step| last + trend * step as f64)
        .collect();

    Ok(ForecastReport {
        column: column.to_string(),
        method: "single_exponential_smoothing".to_string(),
        smoothing_factor: SMOOTHING_FACTOR,
        smoothed,
        trend,
        trend_direction,
        projections,
        confidence: PLACEHOLDER_CONFIDENCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabstat_core::Column;

    fn revenue_table() -> Table {
        Table::new(vec![
            Column::from_numbers("revenue", &[Some(100.0), Some(200.0), None, Some(300.0)]),
            Column::from_numbers("cost", &[Some(50.0), Some(80.0), Some(10.0), Some(70.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_revenue_kpis() {
        let report = compute_kpis(&revenue_table(), "revenue", None).unwrap();
        assert_relative_eq!(report.total_revenue, 600.0);
        assert_relative_eq!(report.mean_revenue, 200.0);
        assert_eq!(report.observations, 3);
        assert!(report.cost.is_none());
    }

    #[test]
    fn test_cost_kpis_and_margin() {
        let report = compute_kpis(&revenue_table(), "revenue", Some("cost")).unwrap();
        let cost = report.cost.unwrap();
        assert_relative_eq!(cost.total_cost, 210.0);
        assert_relative_eq!(cost.net_profit, 390.0);
        assert_relative_eq!(cost.profit_margin.unwrap(), 65.0);
    }

    #[test]
    fn test_zero_revenue_margin_guard() {
        let table = Table::new(vec![
            Column::from_numbers("revenue", &[Some(0.0), Some(0.0)]),
            Column::from_numbers("cost", &[Some(10.0), Some(5.0)]),
        ])
        .unwrap();
        let report = compute_kpis(&table, "revenue", Some("cost")).unwrap();
        assert!(report.cost.unwrap().profit_margin.is_none());
    }

    #[test]
    fn test_missing_cost_column_fails() {
        let err = compute_kpis(&revenue_table(), "revenue", Some("ghost")).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn test_forecast_needs_three_points() {
        let table = Table::new(vec![Column::from_numbers(
            "y",
            &[Some(1.0), Some(2.0)],
        )])
        .unwrap();
        let err = forecast(&table, "y", 5).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 3, .. }));
    }

    #[test]
    fn test_increasing_series_classified_increasing() {
        let table = Table::new(vec![Column::from_numbers(
            "y",
            &(1..=10).map(|i| Some(i as f64)).collect::<Vec<_>>(),
        )])
        .unwrap();
        let report = forecast(&table, "y", 3).unwrap();
        assert_eq!(report.trend_direction, TrendDirection::Increasing);
        assert_eq!(report.projections.len(), 3);
        // Projections continue upward from the last smoothed value
        let last_smoothed = *report.smoothed.last().unwrap();
        assert!(report.projections[0] > last_smoothed);
        assert!(report.projections[2] > report.projections[0]);
    }

    #[test]
    fn test_constant_series_classified_stable() {
        let table = Table::new(vec![Column::from_numbers(
            "y",
            &[Some(5.0), Some(5.0), Some(5.0), Some(5.0)],
        )])
        .unwrap();
        let report = forecast(&table, "y", 2).unwrap();
        assert_eq!(report.trend_direction, TrendDirection::Stable);
        assert_relative_eq!(report.projections[0], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smoothing_recurrence() {
        let table = Table::new(vec![Column::from_numbers(
            "y",
            &[Some(10.0), Some(20.0), Some(30.0)],
        )])
        .unwrap();
        let report = forecast(&table, "y", 1).unwrap();
        // s0 = 10, s1 = 0.3 * 20 + 0.7 * 10 = 13, s2 = 0.3 * 30 + 0.7 * 13 = 18.1
        assert_relative_eq!(report.smoothed[1], 13.0, epsilon = 1e-12);
        assert_relative_eq!(report.smoothed[2], 18.1, epsilon = 1e-12);
        assert_relative_eq!(report.trend, (18.1 - 10.0) / 3.0, epsilon = 1e-12);
    }
}
