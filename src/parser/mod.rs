//! Readers turning markup elements into table definitions.

pub mod block_table;
pub mod color;
pub mod table_style;

use anyhow::Result;
use thiserror::Error;

use crate::markup::Element;
use block_table::{BlockTableParser, TableDefinition};
use table_style::StyleSheet;

/// Errors raised while reading a single style command or cell attribute.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("<{tag}> requires the \"{name}\" attribute")]
    MissingAttribute { tag: String, name: String },
    #[error("<{tag}> has an invalid \"{name}\" attribute: \"{value}\"")]
    InvalidAttribute {
        tag: String,
        name: String,
        value: String,
    },
    #[error("Invalid color: \"{0}\"")]
    InvalidColor(String),
}

/// Reads every `blockTable` under `root` (nested tables included, in document order).
///
/// Table styles declared anywhere in the document may be referenced by id.
pub fn parse_tables(root: &Element) -> Result<Vec<TableDefinition>> {
    let parser = BlockTableParser::new()?;
    let sheet = StyleSheet::collect(root, parser.style_parser())?;
    let mut tables = Vec::new();
    collect_tables(root, &parser, &sheet, &mut tables)?;
    Ok(tables)
}

fn collect_tables(
    element: &Element,
    parser: &BlockTableParser,
    sheet: &StyleSheet,
    tables: &mut Vec<TableDefinition>,
) -> Result<()> {
    if element.tag == "blockTable" {
        tables.push(parser.parse(element, sheet)?);
    }
    for child in &element.children {
        collect_tables(child, parser, sheet, tables)?;
    }
    Ok(())
}

/// Parses a length attribute into points (`12`, `12pt`, `1cm`, `5mm`, `0.5in`).
pub(crate) fn parse_length(tag: &str, name: &str, value: &str) -> Result<f32, CommandError> {
    let value = value.trim();
    let (number, factor) = match value {
        v if v.ends_with("pt") => (&v[..v.len() - 2], 1.0),
        v if v.ends_with("in") => (&v[..v.len() - 2], 72.0),
        v if v.ends_with("cm") => (&v[..v.len() - 2], 72.0 / 2.54),
        v if v.ends_with("mm") => (&v[..v.len() - 2], 72.0 / 25.4),
        v => (v, 1.0),
    };
    number
        .trim()
        .parse::<f32>()
        .map(|n| n * factor)
        .map_err(|_| CommandError::InvalidAttribute {
            tag: tag.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        })
}
