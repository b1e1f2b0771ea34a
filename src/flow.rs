//! Page flow: drawing resolved rows onto a paginated canvas.
//!
//! Rendering is a small state machine:
//!
//! ```text
//! BeforeTable ──► RenderingHeaderRow ──► RenderingBodyRow ──► Done
//!      │                  ▲                 │      ▲
//!      └──────────────────┼─────────────────┘      │
//!                         │                 ▼      │
//!                         └────────── PageBreakPending
//! ```
//!
//! A row that does not fit above the bottom margin moves to a new page,
//! unless the current page holds no body row of this table yet. Such a row
//! could not fit anywhere, so it is drawn where it is and allowed to
//! overflow.

use crate::canvas::Canvas;
use crate::cell::Cell;
use crate::error::Result;
use crate::layout::LayoutConfig;

/// Tolerance for comparing positions against margins.
const EPSILON: f64 = 1e-9;

/// Whether and where the header row is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Never draw the header row.
    Never,
    /// Draw the header row on the first page of the table only.
    Once,
    /// Draw the header row at the top of every page the table spans.
    #[default]
    EveryPage,
}

/// Current step of the page flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing drawn yet.
    BeforeTable,
    /// About to draw the header row.
    RenderingHeaderRow,
    /// About to draw the next body row.
    RenderingBodyRow,
    /// The next body row needs a new page.
    PageBreakPending,
    /// Every row has been drawn.
    Done,
}

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderReport {
    /// Page breaks issued to the canvas.
    pub pages_started: usize,
    /// Body rows drawn.
    pub rows_drawn: usize,
    /// Header rows drawn, one per page that shows headers.
    pub header_rows_drawn: usize,
    /// Cursor position after the table.
    pub cursor: (f64, f64),
}

/// A row of cells with its resolved height.
#[derive(Debug, Clone, Copy)]
pub struct FlowRow<'a> {
    pub cells: &'a [Box<dyn Cell>],
    pub height: f64,
}

/// Drives [`FlowState`] over a table's rows.
#[derive(Debug)]
pub struct PageFlow<'a> {
    left: f64,
    top: f64,
    header: Option<FlowRow<'a>>,
    policy: HeaderPolicy,
    config: &'a LayoutConfig,
    state: FlowState,
    y: f64,
    next_row: usize,
    page_has_rows: bool,
    report: RenderReport,
}

impl<'a> PageFlow<'a> {
    /// Prepare to draw a table whose top-left corner is at `(left, top)`.
    #[must_use]
    pub fn new(
        left: f64,
        top: f64,
        header: Option<FlowRow<'a>>,
        policy: HeaderPolicy,
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            left,
            top,
            header,
            policy,
            config,
            state: FlowState::BeforeTable,
            y: top,
            next_row: 0,
            page_has_rows: false,
            report: RenderReport::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Draw every row, breaking pages as needed.
    ///
    /// # Errors
    ///
    /// Propagates errors from drawing a cell, which only happen when the
    /// rows were not laid out first.
    pub fn run(mut self, canvas: &mut dyn Canvas, rows: &[FlowRow<'_>]) -> Result<RenderReport> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("page_flow", rows = rows.len()).entered();

        while self.state != FlowState::Done {
            self.state = self.step(canvas, rows)?;
        }
        canvas.move_cursor(self.left, self.y);
        self.report.cursor = (self.left, self.y);
        log::debug!(
            "table drawn: {} rows, {} page breaks, {} header rows",
            self.report.rows_drawn,
            self.report.pages_started,
            self.report.header_rows_drawn
        );
        Ok(self.report)
    }

    fn step(&mut self, canvas: &mut dyn Canvas, rows: &[FlowRow<'_>]) -> Result<FlowState> {
        let next = match self.state {
            FlowState::BeforeTable => {
                canvas.move_cursor(self.left, self.top);
                // A table starting at the top margin owns a fresh page.
                self.page_has_rows = self.top > canvas.top_margin_y() + EPSILON;
                if self.header.is_some() && self.policy != HeaderPolicy::Never {
                    FlowState::RenderingHeaderRow
                } else {
                    FlowState::RenderingBodyRow
                }
            }
            FlowState::RenderingHeaderRow => {
                if let Some(header) = self.header {
                    self.draw_row(canvas, header)?;
                    self.report.header_rows_drawn += 1;
                }
                FlowState::RenderingBodyRow
            }
            FlowState::RenderingBodyRow => match rows.get(self.next_row) {
                None => FlowState::Done,
                Some(row) => {
                    let fits = self.y + row.height <= canvas.bottom_margin_y() + EPSILON;
                    if !fits && self.page_has_rows {
                        FlowState::PageBreakPending
                    } else {
                        if !fits {
                            log::warn!(
                                "row {} is {:.2} tall and overflows the page bottom at {:.2}",
                                self.next_row,
                                row.height,
                                canvas.bottom_margin_y()
                            );
                        }
                        self.draw_row(canvas, *row)?;
                        self.page_has_rows = true;
                        self.report.rows_drawn += 1;
                        self.next_row += 1;
                        FlowState::RenderingBodyRow
                    }
                }
            },
            FlowState::PageBreakPending => {
                canvas.start_new_page();
                self.report.pages_started += 1;
                self.y = canvas.top_margin_y();
                self.page_has_rows = false;
                canvas.move_cursor(self.left, self.y);
                log::trace!("page break before row {}", self.next_row);
                if self.header.is_some() && self.policy == HeaderPolicy::EveryPage {
                    FlowState::RenderingHeaderRow
                } else {
                    FlowState::RenderingBodyRow
                }
            }
            FlowState::Done => FlowState::Done,
        };
        Ok(next)
    }

    fn draw_row(&mut self, canvas: &mut dyn Canvas, row: FlowRow<'_>) -> Result<()> {
        let mut x = self.left;
        for cell in row.cells {
            cell.draw(canvas, x, self.y, self.config)?;
            x += cell.geometry().width.unwrap_or_default();
        }
        self.y += row.height;
        canvas.move_cursor(self.left, self.y);
        Ok(())
    }
}
