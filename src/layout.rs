//! Column width negotiation and row height unification.
//!
//! Widths are negotiated in small increments: every unpinned column starts
//! at its minimum width and columns are bumped one growth step at a time,
//! in ascending index order, until the columns fill the table width.
//! Columns still short of their natural width are preferred. Once every
//! column has its natural width the remaining space is shared evenly.
//!
//! ```
//! use std::collections::BTreeMap;
//! use folio_table::layout::{resolve_column_widths, ColumnRange};
//!
//! let ranges = [ColumnRange::new(50.0, 150.0), ColumnRange::new(50.0, 100.0)];
//! let widths = resolve_column_widths(&ranges, &BTreeMap::new(), 400.0, 0.3).unwrap();
//! let total: f64 = widths.iter().sum();
//! assert!(total >= 400.0 - 1e-9 && total <= 400.3 + 1e-9);
//! ```

use std::collections::BTreeMap;

use crate::error::{Result, TableError};
use crate::options::DEFAULT_PADDING;

/// Default increment used when growing columns.
pub const DEFAULT_GROWTH_STEP: f64 = 0.3;

/// Default number of paddings added to measured text widths.
pub const DEFAULT_PADDING_MULTIPLIER: f64 = 4.0;

/// Default gap between the text and the image of a text+image cell.
pub const DEFAULT_IMAGE_GAP: f64 = 4.0;

/// Tolerance for floating point width comparisons.
const EPSILON: f64 = 1e-9;

/// Tunables for table layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Width added to a column per growth step.
    pub growth_step: f64,
    /// Padding used when a cell's options do not set one.
    pub default_padding: f64,
    /// Paddings added to measured text widths.
    pub padding_multiplier: f64,
    /// Vertical gap between the text and the image of a text+image cell.
    pub image_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            growth_step: DEFAULT_GROWTH_STEP,
            default_padding: DEFAULT_PADDING,
            padding_multiplier: DEFAULT_PADDING_MULTIPLIER,
            image_gap: DEFAULT_IMAGE_GAP,
        }
    }
}

impl LayoutConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth step.
    #[must_use]
    pub fn growth_step(mut self, step: f64) -> Self {
        self.growth_step = step;
        self
    }

    /// Set the fallback padding.
    #[must_use]
    pub fn default_padding(mut self, padding: f64) -> Self {
        self.default_padding = padding;
        self
    }

    /// Set the padding multiplier for width ranges.
    #[must_use]
    pub fn padding_multiplier(mut self, multiplier: f64) -> Self {
        self.padding_multiplier = multiplier;
        self
    }

    /// Set the text-to-image gap.
    #[must_use]
    pub fn image_gap(mut self, gap: f64) -> Self {
        self.image_gap = gap;
        self
    }
}

/// Width bounds of one column, the union over all its cells.
///
/// There is no upper bound: only a pin stops a column from growing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnRange {
    /// Largest minimum width among the cells.
    pub min: f64,
    /// Largest natural width among the cells.
    pub natural: f64,
}

impl ColumnRange {
    /// A range from `min` to `natural`, with `natural` raised to `min` if
    /// needed.
    #[must_use]
    pub fn new(min: f64, natural: f64) -> Self {
        Self {
            min,
            natural: natural.max(min),
        }
    }

    /// Widen this range to cover another cell's range.
    pub fn include(&mut self, other: &ColumnRange) {
        self.min = self.min.max(other.min);
        self.natural = self.natural.max(other.natural);
    }
}

fn check_width(width: f64) -> Result<f64> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(TableError::InvalidWidth(width))
    }
}

/// Assign a width to every column so the columns fill `table_width`.
///
/// Pinned columns keep their pinned width. Every other column starts at its
/// minimum and grows by `step` per turn. The result sums to at least
/// `table_width` and overshoots by at most one step. The only exception is
/// a table whose columns are all pinned, which keeps the pinned total.
///
/// # Errors
///
/// - [`TableError::InvalidWidth`] for a non-finite or negative width, pin
///   or step (the step must also be non-zero).
/// - [`TableError::PinnedWidthTooNarrow`] when a pin is below its column's
///   minimum.
/// - [`TableError::ContentTooWide`] when the minimums do not fit.
pub fn resolve_column_widths(
    ranges: &[ColumnRange],
    pins: &BTreeMap<usize, f64>,
    table_width: f64,
    step: f64,
) -> Result<Vec<f64>> {
    let table_width = check_width(table_width)?;
    if !(step.is_finite() && step > 0.0) {
        return Err(TableError::InvalidWidth(step));
    }

    let mut widths = Vec::with_capacity(ranges.len());
    let mut pinned = vec![false; ranges.len()];
    for (col, range) in ranges.iter().enumerate() {
        match pins.get(&col) {
            Some(&pin) => {
                let pin = check_width(pin)?;
                if pin + EPSILON < range.min {
                    return Err(TableError::PinnedWidthTooNarrow {
                        col,
                        pinned: pin,
                        minimum: range.min,
                    });
                }
                pinned[col] = true;
                widths.push(pin);
            }
            None => widths.push(range.min),
        }
    }
    for col in pins.keys().filter(|col| **col >= ranges.len()) {
        log::debug!("ignoring width pin for column {col}, table has {} columns", ranges.len());
    }

    let required: f64 = widths.iter().sum();
    if required > table_width + EPSILON {
        return Err(TableError::ContentTooWide {
            required,
            available: table_width,
        });
    }

    let natural_total: f64 = ranges
        .iter()
        .zip(&widths)
        .zip(&pinned)
        .map(|((range, width), is_pinned)| if *is_pinned { *width } else { range.natural })
        .sum();

    if required < table_width && pinned.iter().all(|is_pinned| *is_pinned) {
        log::debug!(
            "every column is pinned, table stays at {required:.2} of requested width {table_width:.2}"
        );
        return Ok(widths);
    }

    let mut total = required;
    let mut turns = 0_usize;
    'grow: while total < table_width {
        for (col, range) in ranges.iter().enumerate() {
            if total >= table_width {
                break 'grow;
            }
            if pinned[col] {
                continue;
            }
            // below the natural total only columns short of their natural width grow
            if total >= natural_total || widths[col] < range.natural {
                widths[col] += step;
                total += step;
            }
        }
        turns += 1;
    }

    log::trace!("resolved {} column widths in {turns} turns: {widths:?}", widths.len());
    Ok(widths)
}

/// Height of a row: the tallest of its cells.
#[must_use]
pub fn resolve_row_height<I>(cell_heights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    cell_heights.into_iter().fold(0.0, f64::max)
}

/// Height of every row in a grid of measured cell heights.
#[must_use]
pub fn resolve_row_heights(rows: &[Vec<f64>]) -> Vec<f64> {
    rows.iter()
        .map(|row| resolve_row_height(row.iter().copied()))
        .collect()
}
