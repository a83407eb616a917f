//! Table layout resolution.
//!
//! Turns a grid extent plus an ordered list of range commands into a per-cell
//! span classification ([`span::SpanMap`]) and a per-cell style record
//! ([`style::StyleMap`]) that a cell-at-a-time emitter can consume.

pub mod border;
pub mod command;
pub mod coord;
pub mod dimension;
pub mod span;
pub mod style;
pub mod value;

use clap::ValueEnum;
use log::{debug, warn};
use thiserror::Error;

use command::{CommandSet, RangeCommand};
use coord::{CellRange, CoordError, GridPos, GridSize};
use dimension::TableDimensions;
use span::{SpanInfo, SpanMap};
use style::{CellOverrides, CellStyle, StyleMap};

/// Errors that stop a table from being resolved at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("Empty table: a table needs at least one row")]
    EmptyTable,
}

/// How overlapping `SPAN` commands are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SpanPolicy {
    /// Apply every span in declaration order; the last span touching a cell wins.
    #[default]
    Compatible,
    /// Skip a span whose rectangle touches a cell already claimed by an earlier span.
    Strict,
}

/// Options for [`TableLayout::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub span_policy: SpanPolicy,
}

/// A fully resolved table: read-only span and style maps.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    grid: GridSize,
    dimensions: TableDimensions,
    spans: SpanMap,
    styles: StyleMap,
}

impl ResolvedTable {
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn dimensions(&self) -> &TableDimensions {
        &self.dimensions
    }

    pub fn spans(&self) -> &SpanMap {
        &self.spans
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Span classification and finished style of one cell.
    pub fn cell(&self, pos: GridPos) -> Option<(&SpanInfo, &CellStyle)> {
        Some((self.spans.get(pos)?, self.styles.get(pos)?))
    }
}

/// The inputs of one table resolution.
pub struct TableLayout<'a> {
    grid: GridSize,
    commands: &'a CommandSet,
    overrides: Option<&'a CellOverrides>,
    dimensions: Option<&'a TableDimensions>,
    options: ResolveOptions,
}

impl<'a> TableLayout<'a> {
    /// Creates a layout with no overrides, auto dimensions and default options.
    ///
    /// # Arguments
    ///
    /// * `grid` - The extent of the table, fixed before any command is applied.
    /// * `commands` - The range commands of the table style, in declaration order.
    ///
    /// # Returns
    ///
    /// A layout ready for [`TableLayout::resolve`]. Overrides, dimensions and
    /// options are added with the `with_*` builders.
    pub fn new(grid: GridSize, commands: &'a CommandSet) -> Self {
        TableLayout {
            grid,
            commands,
            overrides: None,
            dimensions: None,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: &'a CellOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_dimensions(mut self, dimensions: &'a TableDimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the span map, then the style map, then applies local overrides.
    pub fn resolve(&self) -> Result<ResolvedTable, TableError> {
        if self.grid.rows == 0 {
            return Err(TableError::EmptyTable);
        }

        let spans = SpanMap::build(self.grid, self.commands, self.options.span_policy);
        let mut styles = StyleMap::build(self.grid, self.commands, &spans);
        if let Some(overrides) = self.overrides {
            styles.apply_overrides(overrides);
        }

        debug!(
            "resolved {}x{} table from {} commands",
            self.grid.columns,
            self.grid.rows,
            self.commands.len()
        );

        let dimensions = match self.dimensions {
            Some(dimensions) => dimensions.clone(),
            None => TableDimensions::new(self.grid),
        };

        Ok(ResolvedTable {
            grid: self.grid,
            dimensions,
            spans,
            styles,
        })
    }
}

/// Normalizes the rectangle of `command`, or reports why the command is skipped.
pub(crate) fn command_range(command: &RangeCommand, grid: GridSize) -> Option<CellRange> {
    match CellRange::normalize(&command.start, &command.stop, grid) {
        Ok(range) => Some(range),
        Err(CoordError::UnsupportedCoordinate(symbol)) => {
            debug!(
                "skipping {:?} command {} -> {}: unsupported coordinate \"{}\"",
                command.kind(),
                command.start,
                command.stop,
                symbol
            );
            None
        }
        Err(err) => {
            warn!(
                "skipping {:?} command {} -> {}: {}",
                command.kind(),
                command.start,
                command.stop,
                err
            );
            None
        }
    }
}
