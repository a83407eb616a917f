use std::collections::BTreeMap;

use log::warn;

use crate::layout::border;
use crate::layout::command::{CommandProps, CommandSet, ZebraAxis};
use crate::layout::coord::{CellRange, GridPos, GridSize};
use crate::layout::span::{SpanInfo, SpanMap};
use crate::layout::value::{Alignment, Border, Color, Edge, Edges, VerticalAlignment};
use crate::layout::command_range;

/// Properties of the table cell itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellProps {
    pub background: Option<Color>,
    pub vertical_align: Option<VerticalAlignment>,
    pub borders: Edges<Option<Border>>,
    pub padding: Edges<Option<f32>>,
}

/// Properties of the paragraphs inside a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    pub align: Option<Alignment>,
    /// Line spacing in points.
    pub line_spacing: Option<f32>,
}

/// Properties of the text runs inside a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProps {
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<f32>,
    pub color: Option<Color>,
}

/// The accumulated style of one cell.
///
/// Only line commands write borders, so an edge with a border is exactly an edge
/// some line command reached. Between commands the later one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub cell: CellProps,
    pub paragraph: ParagraphProps,
    pub text: TextProps,
}

impl CellStyle {
    pub fn border(&self, edge: Edge) -> Option<&Border> {
        self.cell.borders.get(edge).as_ref()
    }

    pub fn set_border(&mut self, edge: Edge, border: Border) {
        self.cell.borders.set(edge, Some(border));
    }

    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }
}

/// Style attributes set directly on one cell, applied after all range commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellOverride {
    pub background: Option<Color>,
    pub align: Option<Alignment>,
    pub vertical_align: Option<VerticalAlignment>,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub font_color: Option<Color>,
    pub leading: Option<f32>,
    pub padding: Edges<Option<f32>>,
}

impl CellOverride {
    pub fn is_empty(&self) -> bool {
        *self == CellOverride::default()
    }

    fn apply_to(&self, style: &mut CellStyle) {
        if let Some(color) = self.background {
            style.cell.background = Some(color);
        }
        if let Some(valign) = self.vertical_align {
            style.cell.vertical_align = Some(valign);
        }
        for edge in Edge::ALL {
            if let Some(length) = *self.padding.get(edge) {
                style.cell.padding.set(edge, Some(length));
            }
        }
        if let Some(align) = self.align {
            style.paragraph.align = Some(align);
        }
        if let Some(leading) = self.leading {
            style.paragraph.line_spacing = Some(leading);
        }
        if let Some(name) = &self.font_name {
            style.text.font_name = Some(name.clone());
        }
        if let Some(size) = self.font_size {
            style.text.font_size = Some(size);
        }
        if let Some(color) = self.font_color {
            style.text.color = Some(color);
        }
    }
}

/// Local overrides keyed by cell position.
pub type CellOverrides = BTreeMap<GridPos, CellOverride>;

/// Per-cell style records for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMap {
    grid: GridSize,
    cells: Vec<CellStyle>,
}

impl StyleMap {
    /// A map of default (empty) styles.
    pub fn new(grid: GridSize) -> Self {
        StyleMap {
            grid,
            cells: vec![CellStyle::default(); grid.cell_count()],
        }
    }

    /// Applies every non-span command of `commands` in declaration order.
    ///
    /// # Arguments
    ///
    /// * `grid` - The table extent coordinates are normalized against.
    /// * `commands` - The command set; `Span` commands are skipped.
    /// * `spans` - The finished span map, consulted by zebra and line commands.
    ///
    /// # Returns
    ///
    /// A map with one style per cell, where a later command overwrites any property
    /// an earlier one set on the same cell. Local overrides are applied afterwards
    /// with [`StyleMap::apply_overrides`].
    pub fn build(grid: GridSize, commands: &CommandSet, spans: &SpanMap) -> Self {
        let mut map = StyleMap::new(grid);
        for command in commands.iter() {
            if command.props == CommandProps::Span {
                continue;
            }
            let Some(range) = command_range(command, grid) else {
                continue;
            };
            map.apply(range, &command.props, spans);
        }
        map
    }

    fn apply(&mut self, range: CellRange, props: &CommandProps, spans: &SpanMap) {
        match props {
            CommandProps::Span => {}
            CommandProps::Align(align) => {
                self.for_each(range, |style| style.paragraph.align = Some(*align))
            }
            CommandProps::Valign(valign) => {
                self.for_each(range, |style| style.cell.vertical_align = Some(*valign))
            }
            CommandProps::Background(color) => {
                self.for_each(range, |style| style.cell.background = *color)
            }
            CommandProps::Zebra { axis, colors } => self.apply_zebra(range, *axis, colors, spans),
            CommandProps::Font {
                name,
                size,
                leading,
            } => self.for_each(range, |style| {
                if let Some(name) = name {
                    style.text.font_name = Some(name.clone());
                }
                if let Some(size) = size {
                    style.text.font_size = Some(*size);
                }
                if let Some(leading) = leading {
                    style.paragraph.line_spacing = Some(*leading);
                }
            }),
            CommandProps::TextColor(color) => {
                self.for_each(range, |style| style.text.color = *color)
            }
            CommandProps::Leading(length) => {
                self.for_each(range, |style| style.paragraph.line_spacing = Some(*length))
            }
            CommandProps::Padding { edge, length } => {
                self.for_each(range, |style| style.cell.padding.set(*edge, Some(*length)))
            }
            CommandProps::Line { kind, border: stroke } => {
                border::apply_line(self, spans, range, *kind, stroke)
            }
        }
    }

    /// Cycles `colors` across the rows (or columns) of `range`.
    ///
    /// The color index follows the logical row/column offset from the start of
    /// the range, so it advances once per row/column whatever the range width.
    /// Hidden cells keep the stripe of their origin.
    fn apply_zebra(
        &mut self,
        range: CellRange,
        axis: ZebraAxis,
        colors: &[Option<Color>],
        spans: &SpanMap,
    ) {
        if colors.is_empty() {
            return;
        }
        for pos in range.cells() {
            if matches!(spans.get(pos), Some(SpanInfo::Hidden { .. })) {
                continue;
            }
            let index = match axis {
                ZebraAxis::Rows => pos.row - range.top(),
                ZebraAxis::Columns => pos.col - range.left(),
            };
            let color = colors[index % colors.len()];
            if let Some(style) = self.get_mut(pos) {
                style.cell.background = color;
            }
        }
    }

    /// Patches the cells named in `overrides`; every other cell is untouched.
    pub fn apply_overrides(&mut self, overrides: &CellOverrides) {
        for (pos, patch) in overrides {
            match self.get_mut(*pos) {
                Some(style) => patch.apply_to(style),
                None => warn!("ignoring style override for {}: outside the table", pos),
            }
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn get(&self, pos: GridPos) -> Option<&CellStyle> {
        if !self.grid.contains(pos) {
            return None;
        }
        self.cells.get(self.grid.offset(pos))
    }

    pub(crate) fn get_mut(&mut self, pos: GridPos) -> Option<&mut CellStyle> {
        if !self.grid.contains(pos) {
            return None;
        }
        let offset = self.grid.offset(pos);
        self.cells.get_mut(offset)
    }

    /// Iterates `(position, style)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &CellStyle)> {
        self.grid.positions().zip(self.cells.iter())
    }

    fn for_each<F: FnMut(&mut CellStyle)>(&mut self, range: CellRange, mut f: F) {
        for pos in range.cells() {
            if let Some(style) = self.get_mut(pos) {
                f(style);
            }
        }
    }
}
