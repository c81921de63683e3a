//! Core building blocks for tabular statistical analysis
//!
//! This crate holds the pieces every other tabstat crate builds on:
//!
//! - A typed in-memory table model ([`Table`], [`Column`], [`Cell`]) with a
//!   representable missing marker in every column kind
//! - The unified error taxonomy ([`Error`], [`Result`])
//! - Descriptive moment and quantile helpers ([`stats`])
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Cell, Column, Table, stats};
//!
//! let table = Table::new(vec![
//!     Column::new("score", vec![Cell::Number(1.0), Cell::Null, Cell::Number(3.0)]),
//!     Column::new("label", vec![Cell::Text("a".into()), Cell::Text("b".into()), Cell::Null]),
//! ]).unwrap();
//!
//! let score = table.column("score").unwrap();
//! assert_eq!(score.numeric_values(), vec![1.0, 3.0]);
//! assert_eq!(stats::mean(&score.numeric_values()), 2.0);
//! ```

pub mod error;
pub mod stats;
pub mod table;

pub use error::{Error, Result};
pub use stats::{FiveNumberSummary, HistogramBin};
pub use table::{Cell, Column, ColumnKind, Table};
