//! Tables: a grid of cells with layered options, laid out and paginated.
//!
//! Options can be set at four levels. When a cell is measured they are
//! merged so that cell options override row options, row options override
//! column options and column options override table-wide options. Header
//! cells take header options in place of row options.
//!
//! Setters that merge an overlay borrow the [`CellOptions`] they are given.
//! [`Table::with_options`] and [`Table::set_headers`] store theirs, so they
//! take it by value.
//!
//! # Example
//!
//! ```
//! use folio_table::canvas::{PageGeometry, RecordingCanvas};
//! use folio_table::options::{Alignment, CellOptions};
//! use folio_table::selector::Selector;
//! use folio_table::table::Table;
//!
//! let mut table = Table::with_options(CellOptions::new().font_size(10.0));
//! table
//!     .set_headers(["Words", "Numbers"], CellOptions::new())
//!     .unwrap()
//!     .set_data(vec![vec!["one", "1"], vec!["two", "2"], vec!["three", "3"]])
//!     .unwrap()
//!     .set_column_options(1_usize, &CellOptions::new().alignment(Alignment::Right))
//!     .unwrap()
//!     .set_row_options(Selector::Even, &CellOptions::new().font_size(8.0))
//!     .unwrap();
//!
//! let mut canvas = RecordingCanvas::new(PageGeometry::new(400.0, 600.0).margins(20.0));
//! let report = table.render(&mut canvas, 20.0, 20.0).unwrap();
//! assert_eq!(report.rows_drawn, 3);
//! assert!(canvas.pages()[0].contains_text("Numbers"));
//! ```

use std::collections::BTreeMap;

use crate::canvas::{Canvas, Document};
use crate::cell::Cell;
use crate::error::{Result, TableError};
use crate::flow::{FlowRow, HeaderPolicy, PageFlow, RenderReport};
use crate::layout::{self, ColumnRange, LayoutConfig};
use crate::measure::Measurer;
use crate::options::{CellOptions, OptionKey};
use crate::selector::Selector;

/// Which row a cell reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    /// The header row.
    Header,
    /// A body row by index.
    Body(usize),
}

/// Resolved geometry from the last layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
struct ResolvedLayout {
    column_widths: Vec<f64>,
    row_heights: Vec<f64>,
    header_height: Option<f64>,
}

fn check_width(width: f64) -> Result<f64> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(TableError::InvalidWidth(width))
    }
}

#[allow(clippy::borrowed_box)]
fn as_cell(cell: &Box<dyn Cell>) -> &dyn Cell {
    cell.as_ref()
}

fn into_cells<R, C>(row: R) -> Vec<Box<dyn Cell>>
where
    R: IntoIterator<Item = C>,
    C: Into<Box<dyn Cell>>,
{
    row.into_iter().map(Into::into).collect()
}

/// A table of cells.
#[derive(Debug, Default)]
pub struct Table {
    cells: Vec<Vec<Box<dyn Cell>>>,
    headers: Option<Vec<Box<dyn Cell>>>,
    table_options: CellOptions,
    column_options: BTreeMap<usize, CellOptions>,
    row_options: BTreeMap<usize, CellOptions>,
    header_options: CellOptions,
    manual_column_widths: BTreeMap<usize, f64>,
    show_headers: HeaderPolicy,
    width: Option<f64>,
    config: LayoutConfig,
    resolved: Option<ResolvedLayout>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with table-wide options.
    #[must_use]
    pub fn with_options(options: CellOptions) -> Self {
        Self {
            table_options: options,
            ..Self::default()
        }
    }

    /// Create a table from rows of data.
    ///
    /// # Errors
    ///
    /// Same as [`set_data`](Self::set_data).
    pub fn from_data<I, R, C>(data: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<Box<dyn Cell>>,
    {
        let mut table = Self::new();
        table.set_data(data)?;
        Ok(table)
    }

    /// Replace the body rows. Values that are not cells become text cells.
    ///
    /// # Errors
    ///
    /// - [`TableError::RaggedRows`] when rows differ in length.
    /// - [`TableError::HeaderCountMismatch`] when headers are set and their
    ///   count differs from the row length.
    pub fn set_data<I, R, C>(&mut self, data: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<Box<dyn Cell>>,
    {
        let cells: Vec<Vec<Box<dyn Cell>>> = data.into_iter().map(into_cells).collect();
        if let Some(first) = cells.first() {
            let expected = first.len();
            if let Some((row, found)) = cells
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != expected)
                .map(|(row, cells)| (row, cells.len()))
            {
                return Err(TableError::RaggedRows {
                    row,
                    expected,
                    found,
                });
            }
            if let Some(headers) = &self.headers {
                if headers.len() != expected {
                    return Err(TableError::HeaderCountMismatch {
                        expected,
                        found: headers.len(),
                    });
                }
            }
        }
        self.cells = cells;
        self.invalidate();
        Ok(self)
    }

    /// Set the header row and its options.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::HeaderCountMismatch`] when data is present and
    /// has a different number of columns.
    pub fn set_headers<R, C>(&mut self, headers: R, options: CellOptions) -> Result<&mut Self>
    where
        R: IntoIterator<Item = C>,
        C: Into<Box<dyn Cell>>,
    {
        let headers = into_cells(headers);
        if let Some(first) = self.cells.first() {
            if first.len() != headers.len() {
                return Err(TableError::HeaderCountMismatch {
                    expected: first.len(),
                    found: headers.len(),
                });
            }
        }
        self.headers = Some(headers);
        self.header_options = options;
        self.invalidate();
        Ok(self)
    }

    /// Remove the header row.
    pub fn clear_headers(&mut self) -> &mut Self {
        self.headers = None;
        self.header_options = CellOptions::default();
        self.invalidate();
        self
    }

    /// Header cells, if any.
    #[must_use]
    pub fn headers(&self) -> Option<&[Box<dyn Cell>]> {
        self.headers.as_deref()
    }

    /// Body rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Box<dyn Cell>>] {
        &self.cells
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.cells
            .first()
            .map(Vec::len)
            .or_else(|| self.headers.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    /// Number of body rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Merge into the table-wide options.
    pub fn set_table_options(&mut self, options: &CellOptions) -> &mut Self {
        self.table_options.merge(options);
        self.invalidate();
        self
    }

    /// Table-wide options.
    #[must_use]
    pub fn table_options(&self) -> &CellOptions {
        &self.table_options
    }

    /// Merge into the header options.
    pub fn set_header_options(&mut self, options: &CellOptions) -> &mut Self {
        self.header_options.merge(options);
        self.invalidate();
        self
    }

    /// Header options.
    #[must_use]
    pub fn header_options(&self) -> &CellOptions {
        &self.header_options
    }

    /// Merge options into every selected column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSelector`] when the selector names a
    /// column the table does not have.
    pub fn set_column_options(
        &mut self,
        columns: impl Into<Selector>,
        options: &CellOptions,
    ) -> Result<&mut Self> {
        let columns = columns.into().resolve("column", self.column_count())?;
        for col in columns {
            self.column_options.entry(col).or_default().merge(options);
        }
        self.invalidate();
        Ok(self)
    }

    /// Merge options into every selected body row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSelector`] when the selector names a row
    /// the table does not have.
    pub fn set_row_options(
        &mut self,
        rows: impl Into<Selector>,
        options: &CellOptions,
    ) -> Result<&mut Self> {
        let rows = rows.into().resolve("row", self.row_count())?;
        for row in rows {
            self.row_options.entry(row).or_default().merge(options);
        }
        self.invalidate();
        Ok(self)
    }

    /// Merge options into one body cell.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCellReference`] for an unknown cell.
    pub fn set_cell_options(
        &mut self,
        col: usize,
        row: usize,
        options: &CellOptions,
    ) -> Result<&mut Self> {
        self.cell_mut(col, row)?.options_mut().merge(options);
        self.invalidate();
        Ok(self)
    }

    /// Remove one table-wide option.
    pub fn remove_table_option(&mut self, key: OptionKey) -> &mut Self {
        self.table_options.remove(key);
        self.invalidate();
        self
    }

    /// Remove one option from the selected columns.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSelector`] for unknown columns.
    pub fn remove_column_option(
        &mut self,
        columns: impl Into<Selector>,
        key: OptionKey,
    ) -> Result<&mut Self> {
        let columns = columns.into().resolve("column", self.column_count())?;
        for col in columns {
            if let Some(options) = self.column_options.get_mut(&col) {
                options.remove(key);
            }
        }
        self.invalidate();
        Ok(self)
    }

    /// Remove one option from the selected rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSelector`] for unknown rows.
    pub fn remove_row_option(
        &mut self,
        rows: impl Into<Selector>,
        key: OptionKey,
    ) -> Result<&mut Self> {
        let rows = rows.into().resolve("row", self.row_count())?;
        for row in rows {
            if let Some(options) = self.row_options.get_mut(&row) {
                options.remove(key);
            }
        }
        self.invalidate();
        Ok(self)
    }

    /// Remove one option from a body cell.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCellReference`] for an unknown cell.
    pub fn remove_cell_option(&mut self, col: usize, row: usize, key: OptionKey) -> Result<&mut Self> {
        self.cell_mut(col, row)?.options_mut().remove(key);
        self.invalidate();
        Ok(self)
    }

    /// Fix the width of the selected columns, bypassing negotiation.
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidWidth`] for a negative or non-finite width.
    /// - [`TableError::InvalidSelector`] for unknown columns.
    pub fn pin_column_width(&mut self, columns: impl Into<Selector>, width: f64) -> Result<&mut Self> {
        let width = check_width(width)?;
        let columns = columns.into().resolve("column", self.column_count())?;
        for col in columns {
            self.manual_column_widths.insert(col, width);
        }
        self.invalidate();
        Ok(self)
    }

    /// Remove every width pin.
    pub fn clear_column_pins(&mut self) -> &mut Self {
        self.manual_column_widths.clear();
        self.invalidate();
        self
    }

    /// Pinned column widths by column index.
    #[must_use]
    pub fn column_pins(&self) -> &BTreeMap<usize, f64> {
        &self.manual_column_widths
    }

    /// Choose when the header row is drawn.
    pub fn set_show_headers(&mut self, policy: HeaderPolicy) -> &mut Self {
        self.show_headers = policy;
        self
    }

    /// Header policy.
    #[must_use]
    pub fn show_headers(&self) -> HeaderPolicy {
        self.show_headers
    }

    /// Set the total table width.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidWidth`] for a negative or non-finite width.
    pub fn set_width(&mut self, width: f64) -> Result<&mut Self> {
        self.width = Some(check_width(width)?);
        self.invalidate();
        Ok(self)
    }

    /// Total table width, if set.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Replace the layout tunables.
    pub fn set_config(&mut self, config: LayoutConfig) -> &mut Self {
        self.config = config;
        self.invalidate();
        self
    }

    /// Layout tunables.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// A body cell.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCellReference`] for an unknown cell.
    pub fn cell(&self, col: usize, row: usize) -> Result<&dyn Cell> {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(as_cell)
            .ok_or(TableError::InvalidCellReference { col, row })
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> Result<&mut Box<dyn Cell>> {
        self.cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(TableError::InvalidCellReference { col, row })
    }

    /// Every body cell, row by row.
    pub fn each_cell(&self) -> impl Iterator<Item = &dyn Cell> {
        self.cells.iter().flatten().map(as_cell)
    }

    /// The options a cell is drawn with: table, column, row (or header) and
    /// cell options merged in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCellReference`] for an unknown cell.
    pub fn options_for(&self, col: usize, row: RowRef) -> Result<CellOptions> {
        let cell = match row {
            RowRef::Body(index) => self.cell(col, index)?,
            RowRef::Header => self
                .headers
                .as_ref()
                .and_then(|headers| headers.get(col))
                .map(as_cell)
                .ok_or(TableError::InvalidCellReference { col, row: 0 })?,
        };
        Ok(self.inherited_options(col, row).combine(cell.options()))
    }

    /// Options every overlay but the cell's own contributes.
    fn inherited_options(&self, col: usize, row: RowRef) -> CellOptions {
        let mut options = self.table_options.clone();
        if let Some(column) = self.column_options.get(&col) {
            options.merge(column);
        }
        match row {
            RowRef::Header => options.merge(&self.header_options),
            RowRef::Body(index) => {
                if let Some(row_options) = self.row_options.get(&index) {
                    options.merge(row_options);
                }
            }
        }
        options
    }

    /// Resolved column widths from the last layout.
    #[must_use]
    pub fn column_widths(&self) -> Option<&[f64]> {
        self.resolved.as_ref().map(|layout| layout.column_widths.as_slice())
    }

    /// Resolved body row heights from the last layout.
    #[must_use]
    pub fn row_heights(&self) -> Option<&[f64]> {
        self.resolved.as_ref().map(|layout| layout.row_heights.as_slice())
    }

    /// Resolved header row height from the last layout.
    #[must_use]
    pub fn header_height(&self) -> Option<f64> {
        self.resolved.as_ref().and_then(|layout| layout.header_height)
    }

    fn invalidate(&mut self) {
        if self.resolved.take().is_some() {
            log::trace!("table layout invalidated");
        }
        for cell in self.cells.iter_mut().flatten() {
            cell.reset_layout();
        }
        for cell in self.headers.iter_mut().flatten() {
            cell.reset_layout();
        }
    }

    /// Measure every cell and resolve column widths and row heights for the
    /// table width set with [`set_width`](Self::set_width).
    ///
    /// # Errors
    ///
    /// - [`TableError::TableWidthUnset`] when no width is set.
    /// - [`TableError::ContentTooWide`] or
    ///   [`TableError::PinnedWidthTooNarrow`] when the content does not fit.
    pub fn calculate_dimensions(&mut self, measurer: &dyn Measurer) -> Result<()> {
        let width = self.width.ok_or(TableError::TableWidthUnset)?;
        self.layout(measurer, width)
    }

    fn layout(&mut self, measurer: &dyn Measurer, width: f64) -> Result<()> {
        self.invalidate();
        let columns = self.column_count();

        let mut ranges = vec![ColumnRange::default(); columns];
        for row in 0..self.cells.len() {
            for (col, range) in ranges.iter_mut().enumerate() {
                let inherited = self.inherited_options(col, RowRef::Body(row));
                let cell = &mut self.cells[row][col];
                cell.calculate_width_range(measurer, &inherited, &self.config);
                range.include(&cell.geometry().column_range());
            }
        }
        if self.headers.is_some() {
            for (col, range) in ranges.iter_mut().enumerate() {
                let inherited = self.inherited_options(col, RowRef::Header);
                if let Some(cell) = self.headers.as_mut().and_then(|headers| headers.get_mut(col)) {
                    cell.calculate_width_range(measurer, &inherited, &self.config);
                    range.include(&cell.geometry().column_range());
                }
            }
        }

        let widths = layout::resolve_column_widths(
            &ranges,
            &self.manual_column_widths,
            width,
            self.config.growth_step,
        )?;

        let config = self.config;
        let mut cell_heights = Vec::with_capacity(self.cells.len());
        for row in &mut self.cells {
            cell_heights.push(Self::measure_row(row, &widths, measurer, &config)?);
        }
        let row_heights = layout::resolve_row_heights(&cell_heights);
        for (row, height) in self.cells.iter_mut().zip(&row_heights) {
            Self::set_row_height(row, *height);
        }

        let header_height = match self.headers.as_mut() {
            Some(headers) => {
                let heights = Self::measure_row(headers, &widths, measurer, &config)?;
                let height = layout::resolve_row_height(heights);
                Self::set_row_height(headers, height);
                Some(height)
            }
            None => None,
        };

        log::debug!(
            "table laid out: {columns} columns, {} rows, widths {widths:?}",
            row_heights.len()
        );
        self.resolved = Some(ResolvedLayout {
            column_widths: widths,
            row_heights,
            header_height,
        });
        Ok(())
    }

    fn measure_row(
        row: &mut [Box<dyn Cell>],
        widths: &[f64],
        measurer: &dyn Measurer,
        config: &LayoutConfig,
    ) -> Result<Vec<f64>> {
        row.iter_mut()
            .zip(widths)
            .map(|(cell, width)| {
                cell.geometry_mut().width = Some(*width);
                cell.calculate_height(measurer, config)
            })
            .collect()
    }

    fn set_row_height(row: &mut [Box<dyn Cell>], height: f64) {
        for cell in row {
            cell.geometry_mut().height = Some(height);
        }
    }

    /// Lay out and draw the table with its top-left corner at `(left, top)`.
    ///
    /// Layout always runs from scratch. Without a width set, the table
    /// spans from `left` to the document's right margin. Nothing is drawn
    /// when layout fails.
    ///
    /// # Errors
    ///
    /// Returns the layout errors of
    /// [`calculate_dimensions`](Self::calculate_dimensions), or
    /// [`TableError::InvalidWidth`] when the default width is negative.
    pub fn render<D: Document>(&mut self, doc: &mut D, left: f64, top: f64) -> Result<RenderReport> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("table_render", left, top).entered();

        let width = self.width.unwrap_or_else(|| doc.right_margin_x() - left);
        self.layout(&*doc, width)?;

        let row_heights = self.row_heights().map(<[f64]>::to_vec).unwrap_or_default();
        let rows: Vec<FlowRow<'_>> = self
            .cells
            .iter()
            .zip(row_heights)
            .map(|(cells, height)| FlowRow {
                cells: cells.as_slice(),
                height,
            })
            .collect();
        let header = self
            .headers
            .as_deref()
            .zip(self.header_height())
            .map(|(cells, height)| FlowRow { cells, height });

        PageFlow::new(left, top, header, self.show_headers, &self.config).run(doc, &rows)
    }
}

/// Where [`draw_table`] puts a table. Unset fields fall back to the
/// document: the cursor for the position, the right margin for the width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TablePlacement {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
}

impl TablePlacement {
    /// Place at the cursor, spanning to the right margin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Left edge.
    #[must_use]
    pub fn left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    /// Top edge.
    #[must_use]
    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    /// Total width.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// Draw `table` onto `doc`, filling unset placement fields from the
/// document. The resolved width is stored on the table.
///
/// # Errors
///
/// Same as [`Table::render`], plus [`TableError::InvalidWidth`] for an
/// invalid placement width.
pub fn draw_table<D: Document>(
    doc: &mut D,
    table: &mut Table,
    placement: TablePlacement,
) -> Result<RenderReport> {
    let (cursor_x, cursor_y) = doc.current_cursor();
    let left = placement.left.unwrap_or(cursor_x);
    let top = placement.top.unwrap_or(cursor_y);
    let width = placement
        .width
        .unwrap_or_else(|| doc.right_margin_x() - left);
    table.set_width(width)?;
    table.render(doc, left, top)
}
