//! Table cells.
//!
//! A cell measures its own width range, its height once a width has been
//! assigned, and draws itself onto a [`Canvas`]. The table stores cells as
//! `Box<dyn Cell>`, so custom content types can sit next to the two built-in
//! variants:
//!
//! - [`TextCell`]: wrapped text inside a padded box.
//! - [`TextImageCell`]: a fixed-size box with text on top and an image in
//!   the space below it.
//!
//! Plain values convert into cells, which is how raw table data becomes a
//! grid of cells:
//!
//! ```
//! use folio_table::cell::Cell;
//!
//! let cell: Box<dyn Cell> = "hello".into();
//! assert_eq!(cell.text(), "hello");
//! let number: Box<dyn Cell> = 42_i32.into();
//! assert_eq!(number.text(), "42");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, ImagePlacement, Rect};
use crate::error::{Result, TableError};
use crate::layout::{ColumnRange, LayoutConfig};
use crate::markup;
use crate::measure::{Measurement, Measurer};
use crate::options::CellOptions;

/// Measured and resolved geometry of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellGeometry {
    /// Narrowest width the content fits in.
    pub min_width: f64,
    /// Width of the content without wrapping.
    pub natural_width: f64,
    /// Width assigned by column negotiation.
    pub width: Option<f64>,
    /// Height assigned by row unification.
    pub height: Option<f64>,
}

impl CellGeometry {
    /// The width range as seen by column negotiation.
    #[must_use]
    pub fn column_range(&self) -> ColumnRange {
        ColumnRange::new(self.min_width, self.natural_width)
    }
}

/// A piece of table content.
pub trait Cell: fmt::Debug {
    /// Text drawn in the cell.
    fn text(&self) -> &str;

    /// Options set on this cell itself, the innermost overlay.
    fn options(&self) -> &CellOptions;

    /// Mutable access to the cell's own options.
    fn options_mut(&mut self) -> &mut CellOptions;

    /// Options merged from every overlay, captured by
    /// [`calculate_width_range`](Self::calculate_width_range).
    fn resolved_options(&self) -> &CellOptions;

    /// Current geometry.
    fn geometry(&self) -> &CellGeometry;

    /// Mutable geometry, for the resolvers.
    fn geometry_mut(&mut self) -> &mut CellGeometry;

    /// Capture the merged options (`inherited` overlaid with the cell's own)
    /// and measure the width range.
    fn calculate_width_range(
        &mut self,
        measurer: &dyn Measurer,
        inherited: &CellOptions,
        config: &LayoutConfig,
    );

    /// Measure the height at the assigned width and return it.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::WidthUnresolved`] when no width has been assigned.
    fn calculate_height(&mut self, measurer: &dyn Measurer, config: &LayoutConfig) -> Result<f64>;

    /// Draw at `(x, y)` using the resolved geometry.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::WidthUnresolved`] when the geometry has not
    /// been resolved.
    fn draw(&self, canvas: &mut dyn Canvas, x: f64, y: f64, config: &LayoutConfig) -> Result<()>;

    /// Image drawn by this cell, if any.
    fn image(&self) -> Option<&Path> {
        None
    }

    /// Forget resolved geometry so the next layout starts from scratch.
    fn reset_layout(&mut self) {
        let geometry = self.geometry_mut();
        geometry.width = None;
        geometry.height = None;
    }
}

fn padding_of(options: &CellOptions, config: &LayoutConfig) -> f64 {
    options.padding.unwrap_or(config.default_padding)
}

/// Height of `text` wrapped into `width` plus vertical padding.
fn padded_text_height(
    measurer: &dyn Measurer,
    text: &str,
    width: f64,
    options: &CellOptions,
    config: &LayoutConfig,
) -> f64 {
    let padding = padding_of(options, config);
    let inner = (width - 2.0 * padding).max(0.0);
    measurer.measure_height(text, inner, &options.text_options()) + 2.0 * padding
}

fn resolved_box(geometry: &CellGeometry, x: f64, y: f64) -> Result<Rect> {
    match (geometry.width, geometry.height) {
        (Some(width), Some(height)) => Ok(Rect::new(x, y, width, height)),
        _ => Err(TableError::WidthUnresolved),
    }
}

/// A cell holding (optionally marked-up) text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextCell {
    text: String,
    options: CellOptions,
    resolved: CellOptions,
    geometry: CellGeometry,
}

impl TextCell {
    /// Create a text cell.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the cell's own options.
    #[must_use]
    pub fn with_options(mut self, options: CellOptions) -> Self {
        self.options = options;
        self
    }

    /// Width range of the text with padding applied.
    ///
    /// Markup is stripped before measuring so tags never widen a column.
    #[must_use]
    pub fn measure(
        &self,
        measurer: &dyn Measurer,
        options: &CellOptions,
        config: &LayoutConfig,
    ) -> Measurement {
        let mut text_options = options.text_options();
        let visible = if text_options.has_markup() {
            text_options.markup = Some(false);
            markup::visible_text(&self.text)
        } else {
            self.text.clone()
        };
        let padding = padding_of(options, config) * config.padding_multiplier;
        measurer.measure(&visible, &text_options).add(padding)
    }
}

impl Cell for TextCell {
    fn text(&self) -> &str {
        &self.text
    }

    fn options(&self) -> &CellOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut CellOptions {
        &mut self.options
    }

    fn resolved_options(&self) -> &CellOptions {
        &self.resolved
    }

    fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut CellGeometry {
        &mut self.geometry
    }

    fn calculate_width_range(
        &mut self,
        measurer: &dyn Measurer,
        inherited: &CellOptions,
        config: &LayoutConfig,
    ) {
        self.resolved = inherited.combine(&self.options);
        let measurement = self.measure(measurer, &self.resolved, config);
        self.geometry.min_width = measurement.minimum;
        self.geometry.natural_width = measurement.natural;
    }

    fn calculate_height(&mut self, measurer: &dyn Measurer, config: &LayoutConfig) -> Result<f64> {
        let width = self.geometry.width.ok_or(TableError::WidthUnresolved)?;
        let height = padded_text_height(measurer, &self.text, width, &self.resolved, config);
        self.geometry.height = Some(height);
        Ok(height)
    }

    fn draw(&self, canvas: &mut dyn Canvas, x: f64, y: f64, _config: &LayoutConfig) -> Result<()> {
        let rect = resolved_box(&self.geometry, x, y)?;
        canvas.draw_text_in_box(&self.text, rect, &self.resolved);
        Ok(())
    }
}

/// A fixed-size cell with text above an image.
///
/// The width range collapses to the constructor width and the height never
/// changes. Negotiation may still widen the column; the image fills the
/// space left below the text, scaled proportionally and centered.
#[derive(Debug, Clone, PartialEq)]
pub struct TextImageCell {
    text: String,
    image: PathBuf,
    options: CellOptions,
    resolved: CellOptions,
    geometry: CellGeometry,
    fixed_height: f64,
    text_height: Option<f64>,
}

impl TextImageCell {
    /// Create a cell of a fixed `width` × `height`.
    #[must_use]
    pub fn new(text: impl Into<String>, image: impl Into<PathBuf>, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            image: image.into(),
            options: CellOptions::default(),
            resolved: CellOptions::default(),
            geometry: Self::fixed_geometry(width, height),
            fixed_height: height,
            text_height: None,
        }
    }

    /// Set the cell's own options.
    #[must_use]
    pub fn with_options(mut self, options: CellOptions) -> Self {
        self.options = options;
        self
    }

    fn fixed_geometry(width: f64, height: f64) -> CellGeometry {
        CellGeometry {
            min_width: width,
            natural_width: width,
            width: None,
            height: Some(height),
        }
    }

    /// Where the image goes for a cell drawn at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::WidthUnresolved`] before the height pass has run.
    pub fn image_placement(&self, x: f64, y: f64, config: &LayoutConfig) -> Result<ImagePlacement> {
        let rect = resolved_box(&self.geometry, x, y)?;
        let text_height = self.text_height.ok_or(TableError::WidthUnresolved)?;
        let offset = text_height + config.image_gap;
        Ok(ImagePlacement {
            rect: Rect::new(x, y + offset, rect.width, (rect.height - offset).max(0.0)),
            proportional: true,
            center: true,
        })
    }
}

impl Cell for TextImageCell {
    fn text(&self) -> &str {
        &self.text
    }

    fn options(&self) -> &CellOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut CellOptions {
        &mut self.options
    }

    fn resolved_options(&self) -> &CellOptions {
        &self.resolved
    }

    fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut CellGeometry {
        &mut self.geometry
    }

    fn calculate_width_range(
        &mut self,
        _measurer: &dyn Measurer,
        inherited: &CellOptions,
        _config: &LayoutConfig,
    ) {
        self.resolved = inherited.combine(&self.options);
    }

    fn calculate_height(&mut self, measurer: &dyn Measurer, config: &LayoutConfig) -> Result<f64> {
        let width = self.geometry.width.ok_or(TableError::WidthUnresolved)?;
        self.text_height = Some(padded_text_height(
            measurer,
            &self.text,
            width,
            &self.resolved,
            config,
        ));
        self.geometry.height = Some(self.fixed_height);
        Ok(self.fixed_height)
    }

    fn draw(&self, canvas: &mut dyn Canvas, x: f64, y: f64, config: &LayoutConfig) -> Result<()> {
        let rect = resolved_box(&self.geometry, x, y)?;
        let placement = self.image_placement(x, y, config)?;
        canvas.draw_text_in_box(&self.text, rect, &self.resolved);
        canvas.draw_image(&self.image, &placement);
        Ok(())
    }

    fn image(&self) -> Option<&Path> {
        Some(&self.image)
    }

    fn reset_layout(&mut self) {
        // row unification may have stretched the height
        self.geometry.width = None;
        self.geometry.height = Some(self.fixed_height);
        self.text_height = None;
    }
}

impl From<TextCell> for Box<dyn Cell> {
    fn from(cell: TextCell) -> Self {
        Box::new(cell)
    }
}

impl From<TextImageCell> for Box<dyn Cell> {
    fn from(cell: TextImageCell) -> Self {
        Box::new(cell)
    }
}

impl From<&str> for Box<dyn Cell> {
    fn from(text: &str) -> Self {
        Box::new(TextCell::new(text))
    }
}

impl From<String> for Box<dyn Cell> {
    fn from(text: String) -> Self {
        Box::new(TextCell::new(text))
    }
}

impl From<&String> for Box<dyn Cell> {
    fn from(text: &String) -> Self {
        Box::new(TextCell::new(text.as_str()))
    }
}

macro_rules! impl_cell_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Box<dyn Cell> {
                fn from(value: $ty) -> Self {
                    Box::new(TextCell::new(value.to_string()))
                }
            }
        )*
    };
}

impl_cell_from_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Command, PageGeometry, RecordingCanvas};
    use crate::measure::MonospaceMeasurer;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 10-unit font, 5-unit advance, 10-unit lines.
    fn measurer() -> MonospaceMeasurer {
        MonospaceMeasurer::new()
            .font_size(10.0)
            .advance_ratio(0.5)
            .line_height_ratio(1.0)
    }

    #[test]
    fn test_text_cell_width_range_includes_padding() {
        let mut cell = TextCell::new("hello");
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &LayoutConfig::default());
        // 3 padding × 4
        assert!(approx(cell.geometry().min_width, 5.0 + 12.0));
        assert!(approx(cell.geometry().natural_width, 25.0 + 12.0));
    }

    #[test]
    fn test_padding_option_and_multiplier() {
        let mut cell = TextCell::new("ab").with_options(CellOptions::new().padding(1.0));
        let config = LayoutConfig::default().padding_multiplier(2.0);
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &config);
        assert!(approx(cell.geometry().natural_width, 10.0 + 2.0));
    }

    #[test]
    fn test_markup_stripped_for_both_widths() {
        let mut cell = TextCell::new("<b>ab</b>&amp;");
        let inherited = CellOptions::new().markup(true);
        cell.calculate_width_range(&measurer(), &inherited, &LayoutConfig::default());
        assert!(approx(cell.geometry().natural_width, 15.0 + 12.0));
        assert!(approx(cell.geometry().min_width, 5.0 + 12.0));
        assert_eq!(cell.resolved_options().markup, Some(true));
    }

    #[test]
    fn test_own_options_win_over_inherited() {
        let mut cell = TextCell::new("x").with_options(CellOptions::new().font_size(20.0));
        let inherited = CellOptions::new().font_size(8.0).padding(1.0);
        cell.calculate_width_range(&measurer(), &inherited, &LayoutConfig::default());
        assert_eq!(cell.resolved_options().font_size, Some(20.0));
        assert_eq!(cell.resolved_options().padding, Some(1.0));
    }

    #[test]
    fn test_height_requires_width() {
        let mut cell = TextCell::new("hello");
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &LayoutConfig::default());
        assert_eq!(
            cell.calculate_height(&measurer(), &LayoutConfig::default()),
            Err(TableError::WidthUnresolved)
        );
    }

    #[test]
    fn test_height_wraps_inside_padding() {
        let config = LayoutConfig::default();
        let mut cell = TextCell::new("hello world");
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &config);

        cell.geometry_mut().width = Some(55.0 + 6.0);
        assert!(approx(cell.calculate_height(&measurer(), &config).unwrap(), 16.0));

        cell.geometry_mut().width = Some(50.0 + 6.0);
        assert!(approx(cell.calculate_height(&measurer(), &config).unwrap(), 26.0));
    }

    #[test]
    fn test_draw_uses_resolved_options() {
        let config = LayoutConfig::default();
        let mut cell = TextCell::new("hi");
        cell.calculate_width_range(&measurer(), &CellOptions::new().font_size(10.0), &config);
        cell.geometry_mut().width = Some(40.0);
        cell.geometry_mut().height = Some(16.0);

        let mut canvas = RecordingCanvas::new(PageGeometry::new(200.0, 200.0));
        cell.draw(&mut canvas, 5.0, 7.0, &config).unwrap();
        match &canvas.pages()[0].commands[0] {
            Command::Text {
                text,
                rect,
                options,
            } => {
                assert_eq!(text, "hi");
                assert_eq!(*rect, Rect::new(5.0, 7.0, 40.0, 16.0));
                assert_eq!(options.font_size, Some(10.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_draw_without_geometry_fails() {
        let cell = TextCell::new("hi");
        let mut canvas = RecordingCanvas::default();
        assert_eq!(
            cell.draw(&mut canvas, 0.0, 0.0, &LayoutConfig::default()),
            Err(TableError::WidthUnresolved)
        );
        assert_eq!(canvas.command_count(), 0);
    }

    #[test]
    fn test_text_image_cell_is_fixed() {
        let config = LayoutConfig::default();
        let mut cell = TextImageCell::new("caption", "photo.png", 80.0, 120.0);
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &config);
        let range = cell.geometry().column_range();
        assert!(approx(range.min, 80.0));
        assert!(approx(range.natural, 80.0));

        cell.geometry_mut().width = Some(80.0);
        assert!(approx(cell.calculate_height(&measurer(), &config).unwrap(), 120.0));
        assert_eq!(cell.geometry().height, Some(120.0));
    }

    #[test]
    fn test_text_image_cell_places_image_below_text() {
        let config = LayoutConfig::default();
        let mut cell = TextImageCell::new("caption", "photo.png", 80.0, 120.0);
        cell.calculate_width_range(&measurer(), &CellOptions::new(), &config);
        cell.geometry_mut().width = Some(80.0);
        cell.calculate_height(&measurer(), &config).unwrap();

        let mut canvas = RecordingCanvas::new(PageGeometry::new(300.0, 300.0));
        cell.draw(&mut canvas, 10.0, 20.0, &config).unwrap();
        let commands = &canvas.pages()[0].commands;
        assert_eq!(commands.len(), 2);
        match &commands[1] {
            Command::Image { source, placement } => {
                assert_eq!(source, &PathBuf::from("photo.png"));
                // one line of text (10) + padding 2×3 + gap 4
                assert_eq!(placement.rect, Rect::new(10.0, 40.0, 80.0, 100.0));
                assert!(placement.proportional);
                assert!(placement.center);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_reset_keeps_image_cell_height() {
        let mut cell = TextImageCell::new("", "a.png", 10.0, 30.0);
        cell.geometry_mut().width = Some(10.0);
        cell.geometry_mut().height = Some(45.0);
        cell.reset_layout();
        assert_eq!(cell.geometry().width, None);
        assert_eq!(cell.geometry().height, Some(30.0));

        let mut text = TextCell::new("x");
        text.geometry_mut().height = Some(5.0);
        text.reset_layout();
        assert_eq!(text.geometry().height, None);
    }

    #[test]
    fn test_conversions() {
        let cells: Vec<Box<dyn Cell>> = vec![
            "a".into(),
            String::from("b").into(),
            7_u32.into(),
            1.5_f64.into(),
            TextImageCell::new("c", "c.png", 1.0, 1.0).into(),
        ];
        let texts: Vec<&str> = cells.iter().map(|cell| cell.text()).collect();
        assert_eq!(texts, vec!["a", "b", "7", "1.5", "c"]);
        assert!(cells[4].image().is_some());
        assert!(cells[0].image().is_none());
    }
}
