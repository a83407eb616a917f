use anyhow::Result;

use crate::layout::coord::GridPos;
use crate::layout::span::SpanInfo;
use crate::layout::style::CellStyle;
use crate::layout::ResolvedTable;

/// Receives a resolved table one cell at a time, row by row.
pub trait CellEmitter {
    /// Called once before the first row, with table-wide data such as dimensions.
    fn begin_table(&mut self, _table: &ResolvedTable) -> Result<()> {
        Ok(())
    }

    fn begin_row(&mut self, _row: usize) -> Result<()> {
        Ok(())
    }

    fn emit_cell(&mut self, pos: GridPos, span: &SpanInfo, style: &CellStyle) -> Result<()>;

    fn end_row(&mut self, _row: usize) -> Result<()> {
        Ok(())
    }
}

/// Walks `table` in row-major order, handing every cell to `emitter`.
pub fn emit_table(table: &ResolvedTable, emitter: &mut dyn CellEmitter) -> Result<()> {
    let grid = table.grid();
    emitter.begin_table(table)?;
    for row in 0..grid.rows {
        emitter.begin_row(row)?;
        for col in 0..grid.columns {
            let pos = GridPos::new(col, row);
            let (span, style) = table
                .cell(pos)
                .ok_or_else(|| anyhow::anyhow!("cell {} is outside the table", pos))?;
            emitter.emit_cell(pos, span, style)?;
        }
        emitter.end_row(row)?;
    }
    Ok(())
}
