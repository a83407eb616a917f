//! Emitters consuming resolved tables.
//!
//! A real document emitter writes one ODT/DOCX cell per grid position; the
//! emitters here render text views of the same walk.

pub mod base;
pub mod diagram;
pub mod naming;
pub mod style_list;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputType {
    /// Span map as a text grid
    #[default]
    Diagram,
    /// Named cell styles and their assignment to cells
    Styles,
}
