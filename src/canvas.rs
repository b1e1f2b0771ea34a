//! Canvas collaborator contract and an in-memory display list.
//!
//! Coordinates are in document units with the origin at the top-left of the
//! page and `y` growing downwards, so a table flows from `top` towards
//! [`Canvas::bottom_margin_y`].

use std::path::PathBuf;

use crate::measure::{Measurer, MonospaceMeasurer};
use crate::options::CellOptions;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// How an image is fitted into its box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// Box the image must stay inside.
    pub rect: Rect,
    /// Keep the aspect ratio when scaling.
    pub proportional: bool,
    /// Center the scaled image in the box.
    pub center: bool,
}

/// Drawing surface for one document being composed.
///
/// The table is the sole writer while it renders and leaves the cursor at
/// its left edge just below the last row.
pub trait Canvas {
    /// Current cursor position.
    fn current_cursor(&self) -> (f64, f64);

    /// Move the cursor.
    fn move_cursor(&mut self, x: f64, y: f64);

    /// Draw `text` inside `rect`, including fill and border per `options`.
    fn draw_text_in_box(&mut self, text: &str, rect: Rect, options: &CellOptions);

    /// Draw the image at `source` fitted per `placement`.
    fn draw_image(&mut self, source: &std::path::Path, placement: &ImagePlacement);

    /// Finish the current page and start a new one, cursor at its top-left margin.
    fn start_new_page(&mut self);

    /// Lowest `y` content may reach on the current page.
    fn bottom_margin_y(&self) -> f64;

    /// Leftmost `x` of the content area.
    fn left_margin_x(&self) -> f64;

    /// Highest `y` of the content area.
    fn top_margin_y(&self) -> f64;

    /// Rightmost `x` of the content area.
    fn right_margin_x(&self) -> f64;
}

/// A document being composed: something that can both draw and measure.
///
/// Implemented automatically for every type that is both.
pub trait Document: Canvas + Measurer {}

impl<T: Canvas + Measurer + ?Sized> Document for T {}

/// Page size and margins for a [`RecordingCanvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl Default for PageGeometry {
    /// A4 portrait in points with 5% margins.
    fn default() -> Self {
        Self::new(595.28, 841.89).margins(29.76)
    }
}

impl PageGeometry {
    /// A page of the given size with no margins.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
        }
    }

    /// Set all four margins.
    #[must_use]
    pub const fn margins(mut self, margin: f64) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Text {
        text: String,
        rect: Rect,
        options: CellOptions,
    },
    Image {
        source: PathBuf,
        placement: ImagePlacement,
    },
}

/// Commands drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    /// Text of every text command, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            Command::Text { text, .. } => Some(text.as_str()),
            Command::Image { .. } => None,
        })
    }

    /// Whether any text command on this page contains `needle`.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Canvas that records commands per page instead of rasterizing them.
///
/// Text is measured with a [`MonospaceMeasurer`], so a recording canvas is a
/// complete [`Document`].
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    cursor: (f64, f64),
    measurer: MonospaceMeasurer,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

impl RecordingCanvas {
    /// Create a canvas with one empty page, cursor at the top-left margin.
    #[must_use]
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            cursor: (geometry.margin_left, geometry.margin_top),
            measurer: MonospaceMeasurer::default(),
        }
    }

    /// Replace the measurer.
    #[must_use]
    pub fn with_measurer(mut self, measurer: MonospaceMeasurer) -> Self {
        self.measurer = measurer;
        self
    }

    /// The measurer used for text.
    #[must_use]
    pub fn measurer(&self) -> &MonospaceMeasurer {
        &self.measurer
    }

    /// Page size and margins.
    #[must_use]
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// All pages so far, the current one last.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of recorded commands on every page.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.pages.iter().map(|page| page.commands.len()).sum()
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl Canvas for RecordingCanvas {
    fn current_cursor(&self) -> (f64, f64) {
        self.cursor
    }

    fn move_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    fn draw_text_in_box(&mut self, text: &str, rect: Rect, options: &CellOptions) {
        self.current_page().commands.push(Command::Text {
            text: text.to_string(),
            rect,
            options: options.clone(),
        });
    }

    fn draw_image(&mut self, source: &std::path::Path, placement: &ImagePlacement) {
        self.current_page().commands.push(Command::Image {
            source: source.to_path_buf(),
            placement: placement.clone(),
        });
    }

    fn start_new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = (self.geometry.margin_left, self.geometry.margin_top);
    }

    fn bottom_margin_y(&self) -> f64 {
        self.geometry.height - self.geometry.margin_bottom
    }

    fn left_margin_x(&self) -> f64 {
        self.geometry.margin_left
    }

    fn top_margin_y(&self) -> f64 {
        self.geometry.margin_top
    }

    fn right_margin_x(&self) -> f64 {
        self.geometry.width - self.geometry.margin_right
    }
}

impl Measurer for RecordingCanvas {
    fn measure_min_width(&self, text: &str, options: &CellOptions) -> f64 {
        self.measurer.measure_min_width(text, options)
    }

    fn measure_natural_width(&self, text: &str, options: &CellOptions) -> f64 {
        self.measurer.measure_natural_width(text, options)
    }

    fn measure_height(&self, text: &str, width: f64, options: &CellOptions) -> f64 {
        self.measurer.measure_height(text, width, options)
    }
}
