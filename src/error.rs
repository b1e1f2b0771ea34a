//! Error types for table construction, layout and rendering.
//!
//! Every failure is reported synchronously to the caller of the operation
//! that detected it. Errors fall into three categories, see [`ErrorKind`]:
//!
//! - **Validation**: bad caller input detected at assignment time (ragged
//!   rows, header count mismatch, unknown cell/row/column references).
//! - **Layout**: content that cannot satisfy the geometric constraints,
//!   detected by [`Table::calculate_dimensions`](crate::table::Table::calculate_dimensions)
//!   before any draw call is issued.
//! - **Precondition**: API misuse, such as measuring a height before the
//!   width that it depends on has been resolved.

use std::fmt;

/// Broad category of a [`TableError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-input problem.
    Validation,
    /// Content cannot satisfy the requested geometry.
    Layout,
    /// Operation invoked in the wrong order.
    Precondition,
}

/// Error type for every fallible table operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A data row has a different number of cells than the first row.
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count of the offending row.
        found: usize,
    },
    /// Header cell count differs from the body column count.
    HeaderCountMismatch {
        /// Body column count.
        expected: usize,
        /// Number of header cells supplied.
        found: usize,
    },
    /// A `(column, row)` reference that names no cell.
    InvalidCellReference {
        /// Column index.
        col: usize,
        /// Row index.
        row: usize,
    },
    /// A row or column selector naming an index outside the table.
    InvalidSelector {
        /// "row" or "column".
        axis: &'static str,
        /// First offending index.
        index: usize,
        /// Number of rows or columns available.
        count: usize,
    },
    /// A width that is negative, NaN or infinite.
    InvalidWidth(f64),
    /// The minimum widths do not fit into the requested table width.
    ContentTooWide {
        /// Sum of the minimum (and pinned) column widths.
        required: f64,
        /// Requested table width.
        available: f64,
    },
    /// A pinned column width is narrower than the column content allows.
    PinnedWidthTooNarrow {
        /// Column index.
        col: usize,
        /// Pinned width.
        pinned: f64,
        /// Minimum width required by the column's cells.
        minimum: f64,
    },
    /// Layout was requested before the table width was assigned.
    TableWidthUnset,
    /// A cell height was requested before its width was resolved.
    WidthUnresolved,
}

impl TableError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RaggedRows { .. }
            | Self::HeaderCountMismatch { .. }
            | Self::InvalidCellReference { .. }
            | Self::InvalidSelector { .. }
            | Self::InvalidWidth(_) => ErrorKind::Validation,
            Self::ContentTooWide { .. } | Self::PinnedWidthTooNarrow { .. } => ErrorKind::Layout,
            Self::TableWidthUnset | Self::WidthUnresolved => ErrorKind::Precondition,
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells but the table has {expected} columns"
            ),
            Self::HeaderCountMismatch { expected, found } => write!(
                f,
                "header column count ({found}) does not match data column count ({expected})"
            ),
            Self::InvalidCellReference { col, row } => {
                write!(f, "{col},{row} is not a valid cell reference")
            }
            Self::InvalidSelector { axis, index, count } => write!(
                f,
                "{axis} {index} is out of range (table has {count} {axis}s)"
            ),
            Self::InvalidWidth(width) => write!(f, "invalid width: {width}"),
            Self::ContentTooWide {
                required,
                available,
            } => write!(
                f,
                "table content cannot fit into a table width of {available} (needs {required})"
            ),
            Self::PinnedWidthTooNarrow {
                col,
                pinned,
                minimum,
            } => write!(
                f,
                "column {col} is pinned to {pinned} but its content needs at least {minimum}"
            ),
            Self::TableWidthUnset => write!(
                f,
                "can't calculate column widths without knowing the overall table width"
            ),
            Self::WidthUnresolved => {
                write!(f, "cannot calculate height until cell width is set")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Result alias used throughout the crate.
pub type Result<T, E = TableError> = std::result::Result<T, E>;
