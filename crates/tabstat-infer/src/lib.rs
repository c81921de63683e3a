//! Inference engine
//!
//! Runs one of a fixed set of hypothesis and association procedures against
//! named columns of a table and packages statistic, p-value, decision, and
//! the auxiliary series a chart needs. Each procedure is stateless per
//! request; missing values are dropped before any computation.
//!
//! Procedures:
//!
//! - [`one_sample_ttest`]: one-sample t-test with confidence interval
//! - [`simple_ols`]: simple linear regression with diagnostics
//! - [`one_way_anova`]: one-way analysis of variance with group summaries
//! - [`pairwise_correlation`]: Pearson correlation matrix
//! - [`normality_battery`]: Shapiro-Wilk, Kolmogorov-Smirnov, Anderson-Darling

pub mod anova;
pub mod correlation;
pub mod normality;
pub mod regression;
mod swilk;
pub mod ttest;

pub use anova::{one_way_anova, AnovaDecision, AnovaResult, GroupBoxPlot, GroupStatistics};
pub use correlation::{
    pairwise_correlation, CorrelationMatrix, CorrelationPair, CorrelationResult,
};
pub use normality::{
    normality_battery, AndersonDarling, CurvePoint, DensityBucket, NormalityParams,
    NormalityResult, NormalityVerdict, QqPoint, TestVerdict,
};
pub use regression::{
    simple_ols, CoefficientEstimate, RegressionModelStats, RegressionPoint, RegressionResult,
    ResidualPoint,
};
pub use ttest::{one_sample_ttest, ConfidenceInterval, TTestParams, TTestResult, TestDecision};
