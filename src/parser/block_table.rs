use anyhow::Result;
use log::warn;

use crate::layout::command::CommandSet;
use crate::layout::coord::{GridPos, GridSize};
use crate::layout::dimension::{ColumnWidth, TableDimensions};
use crate::layout::style::{CellOverride, CellOverrides};
use crate::layout::value::{Alignment, Edge};
use crate::layout::{ResolveOptions, ResolvedTable, TableError, TableLayout};
use crate::markup::Element;
use crate::parser::color::ColorParser;
use crate::parser::table_style::{parse_vertical_alignment, StyleSheet, TableStyleParser};
use crate::parser::{parse_length, CommandError};

/// Everything needed to resolve one `blockTable`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub grid: GridSize,
    pub dimensions: TableDimensions,
    pub commands: CommandSet,
    pub overrides: CellOverrides,
}

impl TableDefinition {
    pub fn resolve(&self, options: ResolveOptions) -> Result<ResolvedTable, TableError> {
        TableLayout::new(self.grid, &self.commands)
            .with_overrides(&self.overrides)
            .with_dimensions(&self.dimensions)
            .with_options(options)
            .resolve()
    }
}

/// Reads a `blockTable` element: grid extent, style commands and cell overrides.
pub struct BlockTableParser {
    styles: TableStyleParser,
    colors: ColorParser,
}

impl BlockTableParser {
    pub fn new() -> Result<Self> {
        Ok(BlockTableParser {
            styles: TableStyleParser::new()?,
            colors: ColorParser::new()?,
        })
    }

    pub fn style_parser(&self) -> &TableStyleParser {
        &self.styles
    }

    /// Parses `element`, looking up its `style` attribute in `sheet`.
    ///
    /// Commands of the referenced style come first, followed by those of any
    /// `blockTableStyle` declared directly inside the table. A style id missing
    /// from `sheet` contributes no commands.
    pub fn parse(&self, element: &Element, sheet: &StyleSheet) -> Result<TableDefinition> {
        let mut commands = CommandSet::new();
        if let Some(style_id) = element.attr("style") {
            match sheet.get(style_id) {
                Some(referenced) => commands.extend(referenced.iter().cloned()),
                None => warn!("table style \"{}\" is not declared; using defaults", style_id),
            }
        }
        for inline in element.children_named("blockTableStyle") {
            commands.extend(self.styles.parse(inline)?.iter().cloned());
        }

        let mut overrides = CellOverrides::new();
        let grid = match element.children_named("bulkData").next() {
            Some(bulk) => bulk_data_grid(&bulk.text),
            None => {
                let rows: Vec<&Element> = element.children_named("tr").collect();
                let mut columns = 0;
                for (row, tr) in rows.iter().enumerate() {
                    let cells: Vec<&Element> = tr.children_named("td").collect();
                    columns = columns.max(cells.len());
                    for (col, td) in cells.iter().enumerate() {
                        let patch = self.cell_override(td)?;
                        if !patch.is_empty() {
                            overrides.insert(GridPos::new(col, row), patch);
                        }
                    }
                }
                GridSize::new(columns, rows.len())
            }
        };

        let widths = match element.attr("colWidths") {
            Some(value) => column_widths(element, value)?,
            None => Vec::new(),
        };
        let heights = match element.attr("rowHeights") {
            Some(value) => row_heights(element, value)?,
            None => Vec::new(),
        };

        Ok(TableDefinition {
            grid,
            dimensions: TableDimensions::fit(grid, &widths, &heights),
            commands,
            overrides,
        })
    }

    /// Reads the style attributes set directly on a `td`.
    fn cell_override(&self, td: &Element) -> Result<CellOverride, CommandError> {
        let mut patch = CellOverride::default();
        for (name, value) in &td.attributes {
            match name.as_str() {
                "background" => patch.background = self.colors.parse(value)?,
                "fontColor" => patch.font_color = self.colors.parse(value)?,
                "fontName" => patch.font_name = Some(value.clone()),
                "fontSize" => patch.font_size = Some(length(td, name, value)?),
                "leading" => patch.leading = Some(length(td, name, value)?),
                "align" => patch.align = Some(cell_alignment(td, name, value)?),
                "vAlign" => {
                    patch.vertical_align = Some(
                        parse_vertical_alignment(value).ok_or_else(|| invalid(td, name, value))?,
                    )
                }
                "leftPadding" => patch.padding.set(Edge::Left, Some(length(td, name, value)?)),
                "rightPadding" => patch.padding.set(Edge::Right, Some(length(td, name, value)?)),
                "topPadding" => patch.padding.set(Edge::Top, Some(length(td, name, value)?)),
                "bottomPadding" => patch.padding.set(Edge::Bottom, Some(length(td, name, value)?)),
                _ => {}
            }
        }
        Ok(patch)
    }
}

/// One row per non-empty line, one cell per comma-separated field.
fn bulk_data_grid(text: &str) -> GridSize {
    let rows: Vec<usize> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').count())
        .collect();
    GridSize::new(rows.iter().copied().max().unwrap_or(0), rows.len())
}

/// Entries of a `colWidths` or `rowHeights` list; `None` and `*` mark an unset entry.
fn list_entries(value: &str) -> impl Iterator<Item = Option<&str>> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry {
            "*" => None,
            e if e.eq_ignore_ascii_case("none") => None,
            e => Some(e),
        })
}

/// Parses `colWidths`: `N%` is relative, anything else a length in points.
fn column_widths(table: &Element, value: &str) -> Result<Vec<ColumnWidth>, CommandError> {
    list_entries(value)
        .map(|entry| match entry {
            None => Ok(ColumnWidth::Auto),
            Some(width) => match width.strip_suffix('%') {
                Some(percent) => percent
                    .trim()
                    .parse::<f32>()
                    .map(ColumnWidth::Relative)
                    .map_err(|_| invalid(table, "colWidths", value)),
                None => parse_length(&table.tag, "colWidths", width).map(ColumnWidth::Absolute),
            },
        })
        .collect()
}

fn row_heights(table: &Element, value: &str) -> Result<Vec<Option<f32>>, CommandError> {
    list_entries(value)
        .map(|entry| {
            entry
                .map(|height| parse_length(&table.tag, "rowHeights", height))
                .transpose()
        })
        .collect()
}

fn length(td: &Element, name: &str, value: &str) -> Result<f32, CommandError> {
    parse_length(&td.tag, name, value)
}

fn cell_alignment(td: &Element, name: &str, value: &str) -> Result<Alignment, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Ok(Alignment::Left),
        "center" | "centre" => Ok(Alignment::Center),
        "right" | "decimal" => Ok(Alignment::Right),
        "justify" => Ok(Alignment::Justify),
        _ => Err(invalid(td, name, value)),
    }
}

fn invalid(element: &Element, name: &str, value: &str) -> CommandError {
    CommandError::InvalidAttribute {
        tag: element.tag.clone(),
        name: name.to_string(),
        value: value.to_string(),
    }
}
