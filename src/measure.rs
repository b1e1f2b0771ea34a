//! Measurement protocol for cell content.
//!
//! The table never shapes text itself. It asks a [`Measurer`] three
//! questions about a string and its style options:
//!
//! - how narrow can this text get when a break is allowed everywhere
//!   ([`Measurer::measure_min_width`]),
//! - how wide is it on a single unwrapped line
//!   ([`Measurer::measure_natural_width`]),
//! - how tall is it once wrapped into a given width
//!   ([`Measurer::measure_height`]).
//!
//! Document layers implement the trait on top of their text engine.
//! [`MonospaceMeasurer`] is a self-contained implementation with fixed
//! character advances, used by the test suite and handy for previews.

use crate::cells;
use crate::markup;
use crate::options::CellOptions;

/// Width range of a piece of content.
///
/// `minimum` is the narrowest the content can be compressed to, `natural`
/// is how wide it is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    /// Narrowest feasible width.
    pub minimum: f64,
    /// Unwrapped width.
    pub natural: f64,
}

impl Measurement {
    /// Create a new measurement, swapping reversed bounds.
    #[must_use]
    pub fn new(minimum: f64, natural: f64) -> Self {
        if minimum <= natural {
            Self { minimum, natural }
        } else {
            Self {
                minimum: natural,
                natural: minimum,
            }
        }
    }

    /// Add a constant width to both bounds.
    #[must_use]
    pub fn add(&self, width: f64) -> Self {
        Self {
            minimum: self.minimum + width,
            natural: self.natural + width,
        }
    }
}

/// Text measurement capability provided by the document's text engine.
pub trait Measurer {
    /// Width of `text` rendered with a line break allowed between every
    /// character.
    fn measure_min_width(&self, text: &str, options: &CellOptions) -> f64;

    /// Width of `text` rendered without any forced wrapping.
    fn measure_natural_width(&self, text: &str, options: &CellOptions) -> f64;

    /// Height of `text` wrapped into `width`.
    fn measure_height(&self, text: &str, width: f64, options: &CellOptions) -> f64;

    /// Both width bounds at once.
    fn measure(&self, text: &str, options: &CellOptions) -> Measurement {
        Measurement::new(
            self.measure_min_width(text, options),
            self.measure_natural_width(text, options),
        )
    }
}

impl<T: Measurer + ?Sized> Measurer for &T {
    fn measure_min_width(&self, text: &str, options: &CellOptions) -> f64 {
        (**self).measure_min_width(text, options)
    }

    fn measure_natural_width(&self, text: &str, options: &CellOptions) -> f64 {
        (**self).measure_natural_width(text, options)
    }

    fn measure_height(&self, text: &str, width: f64, options: &CellOptions) -> f64 {
        (**self).measure_height(text, width, options)
    }
}

/// Fixed-advance text measurement.
///
/// Every character cell is `font_size * advance_ratio` wide (wide
/// characters take two cells) and every line is
/// `font_size * line_height_ratio` tall plus the `spacing` option between
/// lines. When the options enable markup, tags are stripped and entities
/// unescaped before measuring.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceMeasurer {
    font_size: f64,
    advance_ratio: f64,
    line_height_ratio: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl MonospaceMeasurer {
    /// Create a measurer with a 12-unit default font.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Font size used when the options do not set one.
    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Character advance as a fraction of the font size.
    #[must_use]
    pub fn advance_ratio(mut self, ratio: f64) -> Self {
        self.advance_ratio = ratio;
        self
    }

    /// Line height as a fraction of the font size.
    #[must_use]
    pub fn line_height_ratio(mut self, ratio: f64) -> Self {
        self.line_height_ratio = ratio;
        self
    }

    /// Width of one character cell under `options`.
    #[must_use]
    pub fn advance(&self, options: &CellOptions) -> f64 {
        options.font_size.unwrap_or(self.font_size) * self.advance_ratio
    }

    /// Height of one line under `options`.
    #[must_use]
    pub fn line_height(&self, options: &CellOptions) -> f64 {
        options.font_size.unwrap_or(self.font_size) * self.line_height_ratio
    }

    fn visible<'a>(text: &'a str, options: &CellOptions) -> std::borrow::Cow<'a, str> {
        if options.has_markup() {
            std::borrow::Cow::Owned(markup::visible_text(text))
        } else {
            std::borrow::Cow::Borrowed(text)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
impl Measurer for MonospaceMeasurer {
    fn measure_min_width(&self, text: &str, options: &CellOptions) -> f64 {
        let text = Self::visible(text, options);
        cells::widest_char(&text) as f64 * self.advance(options)
    }

    fn measure_natural_width(&self, text: &str, options: &CellOptions) -> f64 {
        let text = Self::visible(text, options);
        cells::longest_line(&text) as f64 * self.advance(options)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn measure_height(&self, text: &str, width: f64, options: &CellOptions) -> f64 {
        let text = Self::visible(text, options);
        let advance = self.advance(options);
        // A hair of tolerance so a width computed as n * advance still fits n cells.
        let max_cells = if advance > 0.0 {
            ((width / advance) + 1e-9).floor().max(0.0) as usize
        } else {
            usize::MAX
        };
        let lines = cells::wrapped_line_count(&text, max_cells) as f64;
        let spacing = options.spacing.unwrap_or(0.0);
        lines * self.line_height(options) + (lines - 1.0).max(0.0) * spacing
    }
}
