//! Property-based tests for folio_table.
//!
//! These verify invariants of column negotiation, row unification and data
//! validation over generated inputs.

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;

use common::fixtures::{test_document, test_measurer};
use folio_table::layout::{ColumnRange, DEFAULT_GROWTH_STEP, resolve_column_widths};
use folio_table::prelude::*;

const EPS: f64 = 1e-6;

// ============================================================================
// Custom Strategies
// ============================================================================

/// Column ranges with a natural width at or above the minimum.
fn column_ranges() -> impl Strategy<Value = Vec<ColumnRange>> {
    prop::collection::vec(
        (5.0f64..80.0, 0.0f64..200.0).prop_map(|(min, extra)| ColumnRange::new(min, min + extra)),
        1..6,
    )
}

/// Short cell text: a few lowercase words.
fn cell_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,12}", 1..6).prop_map(|words| words.join(" "))
}

/// A rectangular grid of cell text.
fn grid() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..4, 1usize..8).prop_flat_map(|(cols, rows)| {
        prop::collection::vec(prop::collection::vec(cell_text(), cols), rows)
    })
}

// ============================================================================
// Column negotiation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Feasible widths are filled to within one growth step.
    #[test]
    fn prop_width_conservation(ranges in column_ranges(), slack in 0.0f64..600.0) {
        let min_total: f64 = ranges.iter().map(|range| range.min).sum();
        let width = min_total + slack;
        let widths = resolve_column_widths(&ranges, &BTreeMap::new(), width, DEFAULT_GROWTH_STEP)
            .unwrap();
        let total: f64 = widths.iter().sum();
        prop_assert!(total >= width - EPS, "total {} below width {}", total, width);
        prop_assert!(total <= width + DEFAULT_GROWTH_STEP + EPS, "total {} overshoots {}", total, width);
    }

    /// Fixed-size columns, such as image cells, still fill the table.
    #[test]
    fn prop_fixed_columns_fill_width(
        sizes in prop::collection::vec(10.0f64..120.0, 1..5),
        slack in 0.0f64..400.0,
    ) {
        let ranges: Vec<ColumnRange> = sizes.iter().map(|size| ColumnRange::new(*size, *size)).collect();
        let width = sizes.iter().sum::<f64>() + slack;
        let widths = resolve_column_widths(&ranges, &BTreeMap::new(), width, DEFAULT_GROWTH_STEP)
            .unwrap();
        let total: f64 = widths.iter().sum();
        prop_assert!(total >= width - EPS, "total {} below width {}", total, width);
        prop_assert!(total <= width + DEFAULT_GROWTH_STEP + EPS);
    }

    /// No column ends below its minimum, and while the naturals do not fit
    /// no column grows more than a step past its natural width.
    #[test]
    fn prop_growth_is_bounded(ranges in column_ranges(), slack in 0.0f64..600.0) {
        let min_total: f64 = ranges.iter().map(|range| range.min).sum();
        let natural_total: f64 = ranges.iter().map(|range| range.natural).sum();
        let width = min_total + slack;
        let widths = resolve_column_widths(&ranges, &BTreeMap::new(), width, DEFAULT_GROWTH_STEP)
            .unwrap();

        for (range, resolved) in ranges.iter().zip(&widths) {
            prop_assert!(*resolved >= range.min - EPS);
            if width < natural_total {
                prop_assert!(*resolved <= range.natural + DEFAULT_GROWTH_STEP + EPS);
            }
        }
    }

    /// Widths below the sum of minimums always fail.
    #[test]
    fn prop_infeasible_width_fails(ranges in column_ranges(), shortfall in 0.5f64..100.0) {
        let min_total: f64 = ranges.iter().map(|range| range.min).sum();
        let result = resolve_column_widths(
            &ranges,
            &BTreeMap::new(),
            (min_total - shortfall).max(0.0),
            DEFAULT_GROWTH_STEP,
        );
        let is_too_wide = matches!(result, Err(TableError::ContentTooWide { .. }));
        prop_assert!(is_too_wide);
    }

    /// Pinned columns come back exactly as pinned.
    #[test]
    fn prop_pins_are_exact(ranges in column_ranges(), extra in 0.0f64..50.0, slack in 0.0f64..300.0) {
        let pin = ranges[0].min + extra;
        let pins = BTreeMap::from([(0, pin)]);
        let width = pin + ranges[1..].iter().map(|range| range.min).sum::<f64>() + slack;
        let widths = resolve_column_widths(&ranges, &pins, width, DEFAULT_GROWTH_STEP).unwrap();
        prop_assert!((widths[0] - pin).abs() < EPS);
    }
}

// ============================================================================
// Tables
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rows of equal length are accepted; one short row is rejected.
    #[test]
    fn prop_rectangularity(data in grid(), victim in any::<prop::sample::Index>()) {
        prop_assert!(Table::from_data(data.clone()).is_ok());

        let mut ragged = data;
        let row = victim.index(ragged.len());
        ragged[row].push("extra".to_string());
        let result = Table::from_data(ragged.clone());
        let is_ragged = matches!(result, Err(TableError::RaggedRows { .. }));
        prop_assert!(is_ragged || ragged.len() == 1);
    }

    /// Every cell of a row reports the row height and the column width.
    #[test]
    fn prop_rows_are_uniform(data in grid()) {
        let mut table = Table::from_data(data).unwrap();
        table.set_width(400.0).unwrap();
        table.calculate_dimensions(&test_measurer()).unwrap();

        let widths = table.column_widths().unwrap().to_vec();
        let heights = table.row_heights().unwrap().to_vec();
        for (row, height) in table.rows().iter().zip(&heights) {
            for (cell, width) in row.iter().zip(&widths) {
                prop_assert_eq!(cell.geometry().height, Some(*height));
                prop_assert_eq!(cell.geometry().width, Some(*width));
            }
        }
    }

    /// Rendering never loses a row, whatever the page size.
    #[test]
    fn prop_every_row_is_drawn(data in grid(), rows_per_page in 1usize..6) {
        let expected = data.len();
        let mut table = Table::from_data(data).unwrap();
        let mut doc = test_document(400.0, rows_per_page, 10.0);
        let report = table.render(&mut doc, 10.0, 10.0).unwrap();
        prop_assert_eq!(report.rows_drawn, expected);
        prop_assert_eq!(doc.page_count(), report.pages_started + 1);
    }
}
