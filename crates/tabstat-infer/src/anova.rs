//! One-way analysis of variance

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tabstat_core::{stats, Cell, Error, FiveNumberSummary, Result, Table};

/// Fixed decision threshold for equality of group means
const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Significant / not-significant classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnovaDecision {
    Significant,
    NotSignificant,
}

/// Per-group descriptive statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-group five-number summary, box-plot ready
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBoxPlot {
    pub group: String,
    #[serde(flatten)]
    pub summary: FiveNumberSummary,
}

/// One-way ANOVA result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub num_groups: usize,
    pub decision: AnovaDecision,
    pub group_statistics: Vec<GroupStatistics>,
    pub box_plot_data: Vec<GroupBoxPlot>,
}

fn group_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(v) => Some(v.to_string()),
        Cell::Null => None,
    }
}

/// Test equality of group means of `value_column` across `group_column`
///
/// Rows missing either the value or the group are dropped; groups are
/// ordered by first appearance in the cleaned data. The decision threshold
/// is fixed at 0.05.
pub fn one_way_anova(table: &Table, value_column: &str, group_column: &str) -> Result<AnovaResult> {
    let values = table.column(value_column)?;
    let groups_col = table.column(group_column)?;
    if !values.is_numeric() {
        return Err(Error::non_numeric_column(value_column));
    }

    // Partition by group label, first-appearance order
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (cell, group_cell) in values.cells().iter().zip(groups_col.cells()) {
        let (Some(value), Some(label)) = (cell.as_number(), group_label(group_cell)) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, members)) => members.push(value),
            None => groups.push((label, vec![value])),
        }
    }

    let k = groups.len();
    if k < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: k,
        });
    }
    let n: usize = groups.iter().map(|(_, members)| members.len()).sum();
    if n <= k {
        return Err(Error::computation(
            "ANOVA needs more observations than groups",
        ));
    }

    let grand_mean = groups
        .iter()
        .flat_map(|(_, members)| members)
        .sum::<f64>()
        / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for (_, members) in &groups {
        let group_mean = stats::mean(members);
        ss_between += members.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += members.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let f_statistic = (ss_between / df_between) / (ss_within / df_within);
    let p_value = if f_statistic.is_finite() {
        let dist = FisherSnedecor::new(df_between, df_within)
            .map_err(|e| Error::Computation(format!("F distribution: {e}")))?;
        1.0 - dist.cdf(f_statistic)
    } else {
        0.0
    };

    let group_statistics = groups
        .iter()
        .map(|(name, members)| GroupStatistics {
            group: name.clone(),
            count: members.len(),
            mean: stats::mean(members),
            std: stats::sample_std(members),
            min: stats::min(members),
            max: stats::max(members),
        })
        .collect();
    let box_plot_data = groups
        .iter()
        .map(|(name, members)| {
            stats::five_number_summary(members).map(|summary| GroupBoxPlot {
                group: name.clone(),
                summary,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let decision = if p_value < SIGNIFICANCE_LEVEL {
        AnovaDecision::Significant
    } else {
        AnovaDecision::NotSignificant
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        num_groups: k,
        decision,
        group_statistics,
        box_plot_data,
    })
}
