//! # folio_table
//!
//! Table layout for paginated documents: column width negotiation, row
//! height unification and page flow with repeating headers.
//!
//! The crate never shapes glyphs or writes file formats. A document layer
//! supplies two capabilities: a [`Measurer`](measure::Measurer) that sizes
//! text, and a [`Canvas`](canvas::Canvas) that draws boxes of text and
//! images and breaks pages. [`RecordingCanvas`](canvas::RecordingCanvas)
//! provides both in memory.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_table::prelude::*;
//!
//! let mut table = Table::from_data(vec![
//!     vec!["one", "1"],
//!     vec!["two", "2"],
//!     vec!["three", "3"],
//! ])
//! .unwrap();
//! table
//!     .set_headers(["Words", "Numbers"], CellOptions::new().font_size(14.0))
//!     .unwrap();
//!
//! let mut doc = RecordingCanvas::new(PageGeometry::default());
//! let report = draw_table(&mut doc, &mut table, TablePlacement::new()).unwrap();
//! assert_eq!(report.rows_drawn, 3);
//! ```
//!
//! ## Core Concepts
//!
//! - **Cell**: content that measures its width range and height and draws itself
//! - **Options**: style keys layered table → column → row → cell
//! - **Layout**: columns grow from their minimum width in small steps until
//!   they fill the table width
//! - **Flow**: rows are drawn top to bottom, breaking pages and repeating
//!   headers as configured

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod cell;
pub mod cells;
pub mod color;
pub mod error;
pub mod flow;
pub mod layout;
pub mod markup;
pub mod measure;
pub mod options;
pub mod selector;
pub mod sync;
pub mod table;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::canvas::{
        Canvas, Command, Document, ImagePlacement, Page, PageGeometry, RecordingCanvas, Rect,
    };
    pub use crate::cell::{Cell, CellGeometry, TextCell, TextImageCell};
    pub use crate::color::Color;
    pub use crate::error::{ErrorKind, Result, TableError};
    pub use crate::flow::{FlowState, HeaderPolicy, RenderReport};
    pub use crate::layout::{ColumnRange, LayoutConfig};
    pub use crate::measure::{Measurement, Measurer, MonospaceMeasurer};
    pub use crate::options::{Alignment, Border, CellOptions, OptionKey, WrapMode};
    pub use crate::selector::Selector;
    pub use crate::table::{RowRef, Table, TablePlacement, draw_table};
}

// Re-export key types at crate root
pub use cell::{Cell, TextCell, TextImageCell};
pub use error::{ErrorKind, TableError};
pub use options::CellOptions;
pub use table::{Table, TablePlacement, draw_table};
