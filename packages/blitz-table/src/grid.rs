//! The cell grid
//!
//! A rectangular array of slots, one per (row, column). A cell spanning several rows or
//! columns is referenced from every slot it covers, so "is this the same cell" is a plain
//! id comparison. The grid only ever grows.

use crate::cell::CellId;

/// Rows allocated up front
const INITIAL_ROWS: usize = 5;
/// Extra rows allocated whenever a cell runs past the allocated rows
const SPARE_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct CellGrid {
    /// Allocated rows, each `total_cols` wide. May be longer than `total_rows`.
    slots: Vec<Vec<Option<CellId>>>,
    total_rows: usize,
    total_cols: usize,
    /// Insertion cursor
    row: usize,
    col: usize,
}

impl Default for CellGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CellGrid {
    pub fn new() -> Self {
        Self {
            slots: vec![Vec::new(); INITIAL_ROWS],
            total_rows: 0,
            total_cols: 0,
            row: 0,
            col: 0,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn total_cols(&self) -> usize {
        self.total_cols
    }

    pub fn allocated_rows(&self) -> usize {
        self.slots.len()
    }

    /// The row new cells are currently added to
    pub fn current_row(&self) -> usize {
        self.row
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellId> {
        self.slots.get(row)?.get(col).copied().flatten()
    }

    /// Begin a new row (`<tr>`).
    ///
    /// The cursor only moves down if the current row holds anything, either cells added
    /// to it or slots covered by a rowspan from above.
    pub fn start_row(&mut self) {
        while self.col < self.total_cols && self.get(self.row, self.col).is_some() {
            self.col += 1;
        }
        if self.col > 0 {
            self.row += 1;
        }
        self.col = 0;
        if self.row > self.total_rows {
            self.total_rows = self.row;
        }
        if self.row >= self.slots.len() {
            self.add_rows(self.row + 1 - self.slots.len() + SPARE_ROWS);
        }
    }

    /// The first slot in the current row not covered by an earlier cell
    pub fn next_free_slot(&mut self) -> (usize, usize) {
        while self.col < self.total_cols && self.get(self.row, self.col).is_some() {
            self.col += 1;
        }
        (self.row, self.col)
    }

    /// How many of the `span` slots starting at (`row`, `col`) are free before the first
    /// occupied one. Slots past the last column are free.
    pub fn free_span(&self, row: usize, col: usize, span: usize) -> usize {
        (col..col + span)
            .take_while(|&slot| self.get(row, slot).is_none())
            .count()
    }

    /// Reference `id` from every slot of the `row_span` × `col_span` block at (`row`, `col`)
    /// and move the cursor past its first column.
    ///
    /// Callers grow the columns first so the per-column data stays in step; rows are grown here.
    pub fn place(
        &mut self,
        id: CellId,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
    ) {
        let end_row = row + row_span.max(1);
        let end_col = col + col_span.max(1);

        if end_col > self.total_cols {
            self.add_columns(end_col - self.total_cols);
        }
        if end_row >= self.slots.len() {
            self.add_rows(end_row - self.slots.len() + SPARE_ROWS);
        }
        if end_row > self.total_rows {
            self.total_rows = end_row;
        }

        for slot_row in &mut self.slots[row..end_row] {
            for slot in &mut slot_row[col..end_col] {
                debug_assert!(
                    slot.is_none(),
                    "grid insertion never lands on an occupied slot"
                );
                *slot = Some(id);
            }
        }

        if row == self.row {
            self.col = col + 1;
        }
    }

    /// Allocate `num` more rows, all empty
    pub fn add_rows(&mut self, num: usize) {
        let width = self.total_cols;
        self.slots
            .extend(std::iter::repeat_with(|| vec![None; width]).take(num));
    }

    /// Widen every allocated row by `num` empty slots
    pub fn add_columns(&mut self, num: usize) {
        self.total_cols += num;
        for slot_row in &mut self.slots {
            slot_row.resize(self.total_cols, None);
        }
    }

    /// Whether the slot at (`row`, `col`) is not the last slot of its cell to the right or below
    fn repeats(&self, row: usize, col: usize, id: CellId) -> bool {
        (col + 1 < self.total_cols && self.get(row, col + 1) == Some(id))
            || (row + 1 < self.total_rows && self.get(row + 1, col) == Some(id))
    }

    /// Every cell whose bottom edge is `row`, with the column of its right-most slot
    pub fn cells_ending_in_row(&self, row: usize) -> impl Iterator<Item = (usize, CellId)> + '_ {
        (0..self.total_cols).filter_map(move |col| {
            let id = self.get(row, col)?;
            if self.repeats(row, col, id) {
                None
            } else {
                Some((col, id))
            }
        })
    }

    /// Every distinct cell exactly once, as (row, col, id) of its bottom-right slot,
    /// scanning rows then columns in increasing order
    pub fn distinct_cells(&self) -> impl Iterator<Item = (usize, usize, CellId)> + '_ {
        (0..self.total_rows).flat_map(move |row| {
            self.cells_ending_in_row(row)
                .map(move |(col, id)| (row, col, id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(grid: &mut CellGrid, id: usize, row_span: usize, col_span: usize) -> (usize, usize) {
        let (row, col) = grid.next_free_slot();
        grid.place(CellId(id), row, col, row_span, col_span);
        (row, col)
    }

    #[test]
    fn test_cells_fill_rows_left_to_right() {
        let mut grid = CellGrid::new();
        grid.start_row();
        assert_eq!(add(&mut grid, 0, 1, 1), (0, 0));
        assert_eq!(add(&mut grid, 1, 1, 2), (0, 1));
        grid.start_row();
        assert_eq!(add(&mut grid, 2, 1, 1), (1, 0));

        assert_eq!(grid.total_cols(), 3);
        assert_eq!(grid.total_rows(), 2);
        assert_eq!(grid.get(0, 1), Some(CellId(1)));
        assert_eq!(grid.get(0, 2), Some(CellId(1)));
        assert_eq!(grid.get(1, 1), None);
    }

    #[test]
    fn test_rowspan_slots_are_skipped() {
        let mut grid = CellGrid::new();
        grid.start_row();
        add(&mut grid, 0, 2, 1);
        add(&mut grid, 1, 1, 1);
        grid.start_row();
        // Column 0 is still covered by cell 0
        assert_eq!(add(&mut grid, 2, 1, 1), (1, 1));
        assert_eq!(grid.get(1, 0), Some(CellId(0)));
    }

    #[test]
    fn test_empty_row_does_not_advance() {
        let mut grid = CellGrid::new();
        grid.start_row();
        grid.start_row();
        assert_eq!(grid.current_row(), 0);
        add(&mut grid, 0, 1, 1);
        grid.start_row();
        assert_eq!(grid.current_row(), 1);
    }

    #[test]
    fn test_distinct_cells_visits_each_span_once() {
        let mut grid = CellGrid::new();
        grid.start_row();
        add(&mut grid, 0, 2, 2);
        add(&mut grid, 1, 1, 1);
        grid.start_row();
        add(&mut grid, 2, 1, 1);

        let visited: Vec<_> = grid.distinct_cells().collect();
        assert_eq!(
            visited,
            vec![(0, 2, CellId(1)), (1, 1, CellId(0)), (1, 2, CellId(2))]
        );
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut grid = CellGrid::new();
        grid.start_row();
        add(&mut grid, 0, 1, 1);
        grid.add_columns(4);
        grid.add_rows(20);
        assert_eq!(grid.get(0, 0), Some(CellId(0)));
        assert_eq!(grid.total_cols(), 5);
        assert!(grid.allocated_rows() >= 25);
        assert!((0..5).skip(1).all(|c| grid.get(0, c).is_none()));
    }

    #[test]
    fn test_rows_grow_with_spare_capacity() {
        let mut grid = CellGrid::new();
        grid.start_row();
        add(&mut grid, 0, 7, 1);
        assert_eq!(grid.total_rows(), 7);
        assert!(grid.allocated_rows() > 7);
        assert_eq!(grid.get(6, 0), Some(CellId(0)));
    }

    #[test]
    fn test_free_span_stops_at_rowspan_from_above() {
        let mut grid = CellGrid::new();
        grid.start_row();
        add(&mut grid, 0, 1, 1);
        add(&mut grid, 1, 2, 1);
        grid.start_row();
        let (row, col) = grid.next_free_slot();
        assert_eq!((row, col), (1, 0));
        assert_eq!(grid.free_span(row, col, 3), 1);
        assert_eq!(grid.free_span(0, 2, 4), 4);
    }
}
