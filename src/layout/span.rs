use log::warn;

use crate::layout::command::{CommandKind, CommandSet};
use crate::layout::coord::{CellRange, GridPos, GridSize};
use crate::layout::{command_range, SpanPolicy};

/// Merge classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanInfo {
    #[default]
    Regular,
    /// Top-left cell of a merged rectangle.
    Origin {
        col_span: usize,
        row_span: usize,
        bottom_right: GridPos,
    },
    /// A cell swallowed by the merge whose top-left cell is `origin`.
    Hidden { origin: GridPos },
}

/// Per-cell merge classification for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMap {
    grid: GridSize,
    cells: Vec<SpanInfo>,
}

impl SpanMap {
    /// A map where every cell is `Regular`.
    pub fn new(grid: GridSize) -> Self {
        SpanMap {
            grid,
            cells: vec![SpanInfo::Regular; grid.cell_count()],
        }
    }

    /// Applies every `SPAN` command of `commands` in declaration order.
    ///
    /// # Arguments
    ///
    /// * `grid` - The table extent coordinates are normalized against.
    /// * `commands` - The command set; only its `Span` commands are read.
    /// * `policy` - Whether a span overlapping an earlier one is applied or skipped.
    ///
    /// # Returns
    ///
    /// A map with one classification per cell. Spans with an unsupported or
    /// out-of-range coordinate, and 1x1 spans, leave it unchanged.
    pub fn build(grid: GridSize, commands: &CommandSet, policy: SpanPolicy) -> Self {
        let mut map = SpanMap::new(grid);
        for command in commands.of_kind(CommandKind::Span) {
            let Some(range) = command_range(command, grid) else {
                continue;
            };
            if range.is_single_cell() {
                continue;
            }
            if policy == SpanPolicy::Strict && map.is_claimed(range) {
                warn!("skipping span {}: overlaps an earlier span", range);
                continue;
            }
            map.merge(range);
        }
        map
    }

    /// Marks `range` as one merged cell. A 1x1 range is a no-op.
    ///
    /// Overlaps are not checked: cells already covered by another span are
    /// simply re-tagged.
    pub fn merge(&mut self, range: CellRange) {
        if range.is_single_cell() {
            return;
        }
        for pos in range.cells() {
            self.set(pos, SpanInfo::Hidden { origin: range.start });
        }
        self.set(
            range.start,
            SpanInfo::Origin {
                col_span: range.col_span(),
                row_span: range.row_span(),
                bottom_right: range.stop,
            },
        );
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn get(&self, pos: GridPos) -> Option<&SpanInfo> {
        if !self.grid.contains(pos) {
            return None;
        }
        self.cells.get(self.grid.offset(pos))
    }

    /// The cell that will actually be emitted for `pos`.
    pub fn origin_of(&self, pos: GridPos) -> GridPos {
        match self.get(pos) {
            Some(SpanInfo::Hidden { origin }) => *origin,
            _ => pos,
        }
    }

    /// Bottom-right corner of the merged region containing `pos`.
    ///
    /// A hidden cell whose origin was re-tagged by a later overlapping span
    /// falls back to its own position.
    pub fn bottom_right_of(&self, pos: GridPos) -> GridPos {
        match self.get(pos) {
            Some(SpanInfo::Origin { bottom_right, .. }) => *bottom_right,
            Some(SpanInfo::Hidden { origin }) => match self.get(*origin) {
                Some(SpanInfo::Origin { bottom_right, .. }) => *bottom_right,
                _ => pos,
            },
            _ => pos,
        }
    }

    /// Iterates `(position, span)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &SpanInfo)> {
        self.grid.positions().zip(self.cells.iter())
    }

    fn is_claimed(&self, range: CellRange) -> bool {
        range
            .cells()
            .any(|pos| !matches!(self.get(pos), Some(SpanInfo::Regular)))
    }

    fn set(&mut self, pos: GridPos, info: SpanInfo) {
        let offset = self.grid.offset(pos);
        if let Some(cell) = self.cells.get_mut(offset) {
            *cell = info;
        }
    }
}
