//! Shared documents, measurers and tables.

use std::collections::HashMap;

use folio_table::prelude::*;

/// Character advance used by [`test_document`].
pub const ADVANCE: f64 = 5.0;

/// Line height used by [`test_document`].
pub const LINE_HEIGHT: f64 = 10.0;

/// Height of a single-line text row: one line plus default padding above
/// and below.
pub const ROW_HEIGHT: f64 = LINE_HEIGHT + 6.0;

/// Measurer with 5-unit characters and 10-unit lines.
pub fn test_measurer() -> MonospaceMeasurer {
    MonospaceMeasurer::new()
        .font_size(10.0)
        .advance_ratio(0.5)
        .line_height_ratio(1.0)
}

/// A document whose body holds exactly `rows_per_page` single-line rows.
pub fn test_document(width: f64, rows_per_page: usize, margin: f64) -> RecordingCanvas {
    #[allow(clippy::cast_precision_loss)]
    let body = rows_per_page as f64 * ROW_HEIGHT;
    RecordingCanvas::new(PageGeometry::new(width, body + 2.0 * margin).margins(margin))
        .with_measurer(test_measurer())
}

/// Rows of `["row {i}", "{i * 3}"]`.
pub fn numbered_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| vec![format!("row {i}"), (i * 3).to_string()])
        .collect()
}

/// Measurer that reports fixed widths per text, for exercising column
/// negotiation with exact numbers.
#[derive(Debug, Default)]
pub struct FixedMeasurer {
    widths: HashMap<String, (f64, f64)>,
}

impl FixedMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, min: f64, natural: f64) -> Self {
        self.widths.insert(text.to_string(), (min, natural));
        self
    }
}

impl Measurer for FixedMeasurer {
    fn measure_min_width(&self, text: &str, _options: &CellOptions) -> f64 {
        self.widths.get(text).map_or(0.0, |(min, _)| *min)
    }

    fn measure_natural_width(&self, text: &str, _options: &CellOptions) -> f64 {
        self.widths.get(text).map_or(0.0, |(_, natural)| *natural)
    }

    fn measure_height(&self, _text: &str, _width: f64, _options: &CellOptions) -> f64 {
        LINE_HEIGHT
    }
}
