//! Property-based tests for Tabula.
//!
//! These tests use proptest to generate random tables and verify that
//! sampling, sorting, filtering and delimited encoding keep their
//! invariants under all inputs.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p tabula --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p tabula --test property_tests
//! ```

use proptest::prelude::*;
use tempfile::TempDir;

use tabula::{Column, ColumnType, FilterOperator, FilterSpec, Table, Tabula, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Nullable integer cells, with nulls roughly one time in eight.
fn nullable_int() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        7 => (-50i64..50).prop_map(Some),
        1 => Just(None),
    ]
}

/// Words that never collide with null, boolean or date tokens.
fn word() -> impl Strategy<Value = String> {
    "s[a-z]{0,6}"
}

/// A table with a row id, a nullable integer key and a text column.
fn keyed_table(keys: Vec<Option<i64>>, words: Vec<String>) -> Table {
    let rows = keys.len().min(words.len());
    let ids = (0..rows as i64).map(Value::Integer).collect();
    let keys = keys[..rows]
        .iter()
        .map(|k| k.map_or(Value::Null, Value::Integer))
        .collect();
    let words = words[..rows].iter().cloned().map(Value::String).collect();

    Table::new(
        "generated.csv",
        vec![
            Column::new("id", ColumnType::Integer, ids),
            Column::new("key", ColumnType::Integer, keys),
            Column::new("word", ColumnType::String, words),
        ],
    )
    .expect("generated columns have equal length")
}

fn table_strategy() -> impl Strategy<Value = Table> {
    (1usize..60).prop_flat_map(|rows| {
        (
            prop::collection::vec(nullable_int(), rows),
            prop::collection::vec(word(), rows),
        )
            .prop_map(|(keys, words)| keyed_table(keys, words))
    })
}

fn column_values(table: &Table, name: &str) -> Vec<Value> {
    table.column(name).expect("column exists").values.clone()
}

// =============================================================================
// Sampling
// =============================================================================

proptest! {
    #[test]
    fn sample_returns_min_of_n_and_rows(table in table_strategy(), n in 1usize..100) {
        let tabula = Tabula::new();
        let sample = tabula.inspector().sample(&table, n).unwrap();

        prop_assert_eq!(sample.rows.len(), n.min(table.row_count()));
        prop_assert_eq!(sample.total_rows, table.row_count());
        for (i, row) in sample.rows.iter().enumerate() {
            prop_assert_eq!(&row["id"], &Value::Integer(i as i64));
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

proptest! {
    #[test]
    fn sort_places_nulls_last_in_both_directions(table in table_strategy(), descending: bool) {
        let tabula = Tabula::new();
        let sorted = tabula.transformer().sort(&table, "key", descending).unwrap();
        let keys = column_values(&sorted, "key");

        let first_null = keys.iter().position(Value::is_null).unwrap_or(keys.len());
        prop_assert!(keys[first_null..].iter().all(Value::is_null));
        prop_assert_eq!(sorted.row_count(), table.row_count());
    }

    #[test]
    fn sort_is_stable_for_ties(table in table_strategy(), descending: bool) {
        let tabula = Tabula::new();
        let sorted = tabula.transformer().sort(&table, "key", descending).unwrap();
        let keys = column_values(&sorted, "key");
        let ids = column_values(&sorted, "id");

        for i in 1..keys.len() {
            if keys[i] == keys[i - 1] {
                prop_assert!(ids[i].compare(&ids[i - 1]) == Some(std::cmp::Ordering::Greater));
            }
        }
    }

    #[test]
    fn descending_reverses_ascending_without_ties(
        keys in prop::collection::hash_set(-1000i64..1000, 1..40)
    ) {
        let keys: Vec<Option<i64>> = keys.into_iter().map(Some).collect();
        let words = vec!["s".to_string(); keys.len()];
        let table = keyed_table(keys, words);
        let tabula = Tabula::new();

        let ascending = tabula.transformer().sort(&table, "key", false).unwrap();
        let descending = tabula.transformer().sort(&ascending, "key", true).unwrap();

        let mut reversed = column_values(&ascending, "id");
        reversed.reverse();
        prop_assert_eq!(column_values(&descending, "id"), reversed);
    }
}

// =============================================================================
// Filtering
// =============================================================================

proptest! {
    #[test]
    fn filter_partitions_non_null_rows(table in table_strategy(), threshold in -60i64..60) {
        let tabula = Tabula::new();
        let transformer = tabula.transformer();
        let operand = threshold.to_string();

        let above = transformer
            .filter(&table, &FilterSpec::new("key", FilterOperator::GreaterThan, operand.as_str()))
            .unwrap();
        let rest = transformer
            .filter(&table, &FilterSpec::new("key", FilterOperator::LessOrEqual, operand.as_str()))
            .unwrap();
        let nulls = table.column("key").unwrap().null_count();

        prop_assert_eq!(above.row_count() + rest.row_count() + nulls, table.row_count());
        for key in column_values(&above, "key") {
            prop_assert!(matches!(key, Value::Integer(k) if k > threshold));
        }
    }

    #[test]
    fn filter_preserves_row_order(table in table_strategy()) {
        let tabula = Tabula::new();
        let spec = FilterSpec::new("word", FilterOperator::StartsWith, "s");
        let filtered = tabula.transformer().filter(&table, &spec).unwrap();

        prop_assert_eq!(column_values(&filtered, "id"), column_values(&table, "id"));
    }
}

// =============================================================================
// Delimited Round-trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn delimited_roundtrip_preserves_cells(
        table in table_strategy(),
        extension in prop_oneof![Just("csv"), Just("tsv"), Just("psv")],
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("roundtrip.{extension}"));
        let tabula = Tabula::new();

        tabula.transformer().write(&table, &path, None).unwrap();
        let reloaded = tabula.loader().load(&path, None).unwrap();

        prop_assert_eq!(reloaded.column_names(), table.column_names());
        prop_assert_eq!(column_values(&reloaded, "id"), column_values(&table, "id"));
        prop_assert_eq!(column_values(&reloaded, "word"), column_values(&table, "word"));
        prop_assert_eq!(column_values(&reloaded, "key"), column_values(&table, "key"));
    }
}
