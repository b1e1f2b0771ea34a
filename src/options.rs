//! Cell style options and their layered merging.
//!
//! A [`CellOptions`] value is a sparse set of style keys: every field is
//! optional, and an unset field means "inherit from the layer below". Tables
//! keep one layer per scope (table, column, row, cell) and merge them with
//! [`CellOptions::combine`], where the right-hand side wins for every key it
//! sets.
//!
//! ```
//! use folio_table::options::{Alignment, CellOptions};
//!
//! let table = CellOptions::new().font_size(10.0).alignment(Alignment::Left);
//! let cell = CellOptions::new().alignment(Alignment::Right);
//!
//! let merged = table.combine(&cell);
//! assert_eq!(merged.font_size, Some(10.0));
//! assert_eq!(merged.alignment, Some(Alignment::Right));
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::color::Color;

/// Padding applied when no layer sets one.
pub const DEFAULT_PADDING: f64 = 3.0;

bitflags! {
    /// Which sides of a cell get a border line.
    ///
    /// Parses from the `"tblr"` letter notation, in any order and case.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Border: u8 {
        /// Top edge.
        const TOP    = 1 << 0;
        /// Bottom edge.
        const BOTTOM = 1 << 1;
        /// Left edge.
        const LEFT   = 1 << 2;
        /// Right edge.
        const RIGHT  = 1 << 3;
    }
}

impl Border {
    /// Letters in `"tblr"` order for the sides that are set.
    #[must_use]
    pub fn to_letters(&self) -> String {
        [
            (Self::TOP, 't'),
            (Self::BOTTOM, 'b'),
            (Self::LEFT, 'l'),
            (Self::RIGHT, 'r'),
        ]
        .iter()
        .filter(|(side, _)| self.contains(*side))
        .map(|(_, letter)| *letter)
        .collect()
    }
}

impl FromStr for Border {
    type Err = BorderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().try_fold(Self::empty(), |acc, ch| {
            let side = match ch.to_ascii_lowercase() {
                't' => Self::TOP,
                'b' => Self::BOTTOM,
                'l' => Self::LEFT,
                'r' => Self::RIGHT,
                other => return Err(BorderParseError(other)),
            };
            Ok(acc | side)
        })
    }
}

/// A border string contained a letter other than `t`, `b`, `l` or `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderParseError(pub char);

impl fmt::Display for BorderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid border side '{}', expected one of tblr", self.0)
    }
}

impl std::error::Error for BorderParseError {}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the text engine may break lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Break at word boundaries only.
    Word,
    /// Break between any two characters.
    Char,
    /// Break at words, falling back to characters for over-long words.
    #[default]
    WordChar,
}

/// Names a single key of [`CellOptions`], used to remove one override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Font,
    FontSize,
    Alignment,
    Justify,
    Spacing,
    Wrap,
    Color,
    Markup,
    FillColor,
    Padding,
    Border,
    BorderWidth,
    BorderColor,
    Radius,
}

/// Sparse style options for a cell.
///
/// Text-engine keys (`font` through `markup`) are what the measurer sees;
/// box keys (`fill_color` through `radius`) only matter to the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellOptions {
    /// Font family name.
    pub font: Option<String>,
    /// Font size in document units.
    pub font_size: Option<f64>,
    /// Horizontal alignment.
    pub alignment: Option<Alignment>,
    /// Justify wrapped lines.
    pub justify: Option<bool>,
    /// Extra spacing between lines.
    pub spacing: Option<f64>,
    /// Line breaking mode.
    pub wrap: Option<WrapMode>,
    /// Text color.
    pub color: Option<Color>,
    /// Content carries inline markup tags.
    pub markup: Option<bool>,
    /// Background fill.
    pub fill_color: Option<Color>,
    /// Padding between the cell edge and its text, per side.
    pub padding: Option<f64>,
    /// Bordered sides.
    pub border: Option<Border>,
    /// Border line width.
    pub border_width: Option<f64>,
    /// Border line color.
    pub border_color: Option<Color>,
    /// Rounded-corner radius; implies a full border.
    pub radius: Option<f64>,
}

impl CellOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family.
    #[must_use]
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set the font size.
    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Enable or disable justification.
    #[must_use]
    pub fn justify(mut self, justify: bool) -> Self {
        self.justify = Some(justify);
        self
    }

    /// Set line spacing.
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = Some(wrap);
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Mark the content as carrying inline markup.
    #[must_use]
    pub fn markup(mut self, markup: bool) -> Self {
        self.markup = Some(markup);
        self
    }

    /// Set the background fill.
    #[must_use]
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Set the bordered sides.
    #[must_use]
    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Set the border line width.
    #[must_use]
    pub fn border_width(mut self, width: f64) -> Self {
        self.border_width = Some(width);
        self
    }

    /// Set the border color.
    #[must_use]
    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Set the corner radius.
    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Merge `other` on top of `self`; keys set in `other` win.
    #[must_use]
    pub fn combine(&self, other: &CellOptions) -> CellOptions {
        CellOptions {
            font: other.font.clone().or_else(|| self.font.clone()),
            font_size: other.font_size.or(self.font_size),
            alignment: other.alignment.or(self.alignment),
            justify: other.justify.or(self.justify),
            spacing: other.spacing.or(self.spacing),
            wrap: other.wrap.or(self.wrap),
            color: other.color.or(self.color),
            markup: other.markup.or(self.markup),
            fill_color: other.fill_color.or(self.fill_color),
            padding: other.padding.or(self.padding),
            border: other.border.or(self.border),
            border_width: other.border_width.or(self.border_width),
            border_color: other.border_color.or(self.border_color),
            radius: other.radius.or(self.radius),
        }
    }

    /// In-place form of [`combine`](Self::combine).
    pub fn merge(&mut self, other: &CellOptions) {
        *self = self.combine(other);
    }

    /// Clear one key so the layer below shows through again.
    pub fn remove(&mut self, key: OptionKey) {
        match key {
            OptionKey::Font => self.font = None,
            OptionKey::FontSize => self.font_size = None,
            OptionKey::Alignment => self.alignment = None,
            OptionKey::Justify => self.justify = None,
            OptionKey::Spacing => self.spacing = None,
            OptionKey::Wrap => self.wrap = None,
            OptionKey::Color => self.color = None,
            OptionKey::Markup => self.markup = None,
            OptionKey::FillColor => self.fill_color = None,
            OptionKey::Padding => self.padding = None,
            OptionKey::Border => self.border = None,
            OptionKey::BorderWidth => self.border_width = None,
            OptionKey::BorderColor => self.border_color = None,
            OptionKey::Radius => self.radius = None,
        }
    }

    /// True when no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether content should be treated as markup.
    #[must_use]
    pub fn has_markup(&self) -> bool {
        self.markup.unwrap_or(false)
    }

    /// The subset of keys the text engine consumes.
    ///
    /// Box keys are dropped so the measurer cannot depend on them.
    #[must_use]
    pub fn text_options(&self) -> CellOptions {
        CellOptions {
            font: self.font.clone(),
            font_size: self.font_size,
            alignment: self.alignment,
            justify: self.justify,
            spacing: self.spacing,
            wrap: self.wrap,
            color: self.color,
            markup: self.markup,
            ..CellOptions::default()
        }
    }
}
