//! Descriptive profiler
//!
//! Computes per-column summary statistics, box-plot five-number summaries,
//! and a histogram for the numeric columns of a table. Missing values are
//! excluded before any statistic is computed, per column independently.

use serde::{Deserialize, Serialize};
use tabstat_core::{stats, Column, Error, FiveNumberSummary, Result, Table};

/// Number of box plots emitted (first numeric columns in table order)
const BOX_PLOT_LIMIT: usize = 5;
/// Bucket count of the profile histogram
const HISTOGRAM_BUCKETS: usize = 30;

/// Summary statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Non-missing observations
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub variance: f64,
    /// Adjusted Fisher-Pearson skewness; absent below three observations
    pub skewness: Option<f64>,
    /// Adjusted excess kurtosis; absent below four observations
    pub kurtosis: Option<f64>,
}

/// Five-number summary keyed by column name, box-plot ready
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub name: String,
    #[serde(flatten)]
    pub summary: FiveNumberSummary,
}

/// One labeled histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Range label, `lo-hi` with two decimals
    pub bin: String,
    pub count: usize,
    pub left: f64,
    pub right: f64,
}

/// Histogram of the first numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub column: String,
    pub buckets: Vec<HistogramBucket>,
}

/// Full descriptive profile of a table's numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveProfile {
    pub summary: Vec<ColumnSummary>,
    pub box_plots: Vec<BoxPlot>,
    pub histogram: HistogramSeries,
}

/// Summary statistics over the non-missing values of one column
pub fn column_summary(column: &Column) -> ColumnSummary {
    let values = column.numeric_values();
    let five = stats::five_number_summary(&values).unwrap_or(FiveNumberSummary {
        min: f64::NAN,
        q1: f64::NAN,
        median: f64::NAN,
        q3: f64::NAN,
        max: f64::NAN,
    });
    ColumnSummary {
        column: column.name().to_string(),
        count: values.len(),
        mean: stats::mean(&values),
        std: stats::sample_std(&values),
        min: five.min,
        q1: five.q1,
        median: five.median,
        q3: five.q3,
        max: five.max,
        variance: stats::sample_variance(&values),
        skewness: stats::skewness(&values),
        kurtosis: stats::excess_kurtosis(&values),
    }
}

/// Profile the numeric columns of a table
///
/// Fails with [`Error::NoNumericColumns`] when the table has none. Box
/// plots cover up to the first five numeric columns in table order; the
/// histogram covers exactly the first numeric column.
pub fn profile(table: &Table) -> Result<DescriptiveProfile> {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return Err(Error::NoNumericColumns);
    }

    let summary = numeric.iter().map(|c| column_summary(c)).collect();

    let box_plots = numeric
        .iter()
        .take(BOX_PLOT_LIMIT)
        .filter_map(|col| {
            let values = col.numeric_values();
            stats::five_number_summary(&values).ok().map(|summary| BoxPlot {
                name: col.name().to_string(),
                summary,
            })
        })
        .collect();

    let hist_col = numeric[0];
    let buckets = stats::equal_width_histogram(&hist_col.numeric_values(), HISTOGRAM_BUCKETS)
        .into_iter()
        .map(|bin| HistogramBucket {
            bin: format!("{:.2}-{:.2}", bin.left, bin.right),
            count: bin.count,
            left: bin.left,
            right: bin.right,
        })
        .collect();

    Ok(DescriptiveProfile {
        summary,
        box_plots,
        histogram: HistogramSeries {
            column: hist_col.name().to_string(),
            buckets,
        },
    })
}
