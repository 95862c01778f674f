//! Printable barcode label sheets.
//!
//! Plans a sheet of labels for a set of items: which symbology each value
//! should be rendered in, how many copies, how many columns, and which
//! physical label stock the page is laid out for. Rasterizing the actual
//! barcode images is left to the rendering side.

pub mod sheet;

pub use sheet::{
    plan_sheet, select_symbology, Label, LabelDimensions, LabelSheet, SheetOptions, SheetPreset,
};
