//! Property checks over the table model and transforms

mod common;

use common::single_column_csv;
use proptest::prelude::*;
use tabstat_clean::{scale_columns, ScalingMethod};
use tabstat_core::{stats, Cell, Column, Table};
use tabstat_service::AnalysisService;
use tabstat_store::DatasetId;

fn arbitrary_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Null),
        (-1e6f64..1e6).prop_map(Cell::Number),
        "[a-z]{1,8}".prop_map(Cell::Text),
    ]
}

fn arbitrary_table() -> impl Strategy<Value = Table> {
    (1usize..6, 1usize..12).prop_flat_map(|(cols, rows)| {
        proptest::collection::vec(
            proptest::collection::vec(arbitrary_cell(), rows..=rows),
            cols..=cols,
        )
        .prop_map(|columns| {
            Table::new(
                columns
                    .into_iter()
                    .enumerate()
                    .map(|(i, cells)| Column::new(format!("c{i}"), cells))
                    .collect(),
            )
            .expect("equal-length columns")
        })
    })
}

proptest! {
    #[test]
    fn prop_column_partition_is_disjoint_and_covering(table in arbitrary_table()) {
        let numeric = table.numeric_column_names();
        let categorical = table.categorical_column_names();
        prop_assert_eq!(numeric.len() + categorical.len(), table.n_cols());
        for name in &numeric {
            prop_assert!(!categorical.contains(name));
        }
        for col in table.columns() {
            let name = col.name().to_string();
            prop_assert!(numeric.contains(&name) ^ categorical.contains(&name));
        }
    }

    #[test]
    fn prop_standard_scaling_centers_numeric_columns(
        values in proptest::collection::vec(-1e5f64..1e5, 2..40)
    ) {
        // Skip degenerate all-equal samples, the guard maps them to zeros
        prop_assume!(values.iter().any(|v| *v != values[0]));
        let table = Table::new(vec![Column::new(
            "x",
            values.iter().map(|&v| Cell::Number(v)).collect(),
        )]).expect("single column");

        let outcome = scale_columns(&table, ScalingMethod::Standard, &["x".to_string()])
            .expect("scaling succeeds");
        let scaled = outcome.table.column("x").expect("column").numeric_values();
        prop_assert!(stats::mean(&scaled).abs() < 1e-8);
        prop_assert!((stats::population_std(&scaled) - 1.0).abs() < 1e-8);
    }

    #[test]
    fn prop_minmax_scaling_bounds_and_endpoints(
        values in proptest::collection::vec(-1e5f64..1e5, 2..40)
    ) {
        prop_assume!(values.iter().any(|v| *v != values[0]));
        let table = Table::new(vec![Column::new(
            "x",
            values.iter().map(|&v| Cell::Number(v)).collect(),
        )]).expect("single column");

        let outcome = scale_columns(&table, ScalingMethod::Minmax, &["x".to_string()])
            .expect("scaling succeeds");
        let scaled = outcome.table.column("x").expect("column").numeric_values();
        prop_assert!(scaled.iter().all(|v| (-1e-12..=1.0 + 1e-12).contains(v)));
        prop_assert!((stats::min(&scaled) - 0.0).abs() < 1e-12);
        prop_assert!((stats::max(&scaled) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_derive_on_unknown_parent_always_fails(tag in "[a-z_]{1,20}") {
        let service = AnalysisService::new();
        let table = Table::new(vec![Column::new("x", vec![Cell::Number(1.0)])])
            .expect("single column");
        let result = service
            .store()
            .derive(&DatasetId::from("never-stored"), &tag, table);
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_drop_missing_leaves_no_numeric_gaps(
        values in proptest::collection::vec(proptest::option::of(-1e3f64..1e3), 1..30)
    ) {
        let service = AnalysisService::new();
        let summary = service
            .upload("data.csv", single_column_csv("x", &values).as_bytes())
            .expect("upload");
        let cleaned = service
            .clean_missing(&tabstat_service::CleanMissingRequest {
                dataset: summary.dataset_id,
                operation: tabstat_clean::CleanOperation::DropMissing,
                columns: None,
            })
            .expect("clean");

        let expected_rows = values.iter().filter(|v| v.is_some()).count();
        prop_assert_eq!(cleaned.new_shape.rows, expected_rows);
        prop_assert_eq!(cleaned.missing_values_after, 0);
        let record = service.store().get(&cleaned.new_dataset_id).expect("derived");
        prop_assert_eq!(record.table.column("x").expect("column").null_count(), 0);
    }
}
