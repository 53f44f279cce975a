//! The table layout driver
//!
//! [`Table`] owns the cells, the grid, the column constraints and the solver, and runs
//! them in the order the two-pass box protocol asks for:
//!
//!  1. `calc_min_max_width`: measure cells, collect their constraints, resolve column
//!     min/max and the table width (phases A–C).
//!  2. `set_available_width`: distribute the table width over the columns (phases D–E)
//!     and hand every cell its content width.
//!  3. `layout`: lay out the cells, refine while cells ask for more room, then stack
//!     the rows and position every cell.
//!
//! Every structural change throws away what was computed; results are recomputed lazily.

use blitz_traits::{ContentWidths, LayoutBox, LayoutStatus};
use slab::Slab;
use taffy::geometry::{Point, Size};

use crate::cell::{Cell, CellId, CellSpec};
use crate::col_info::{ColInfoTable, ColumnDecl, ColumnGroupDecl};
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::grid::CellGrid;
use crate::length::Length;
use crate::rows::{RowCell, RowHeights, vertical_extras};
use crate::solver::{ColumnSolver, SolverParams};

/// Upper bound on solve/layout passes in one `layout` call
const MAX_LAYOUT_PASSES: usize = 8;

/// How far a table got since it was last changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutState {
    #[default]
    NotLaidOut,
    /// Column widths are known and have been pushed to the cells
    ColumnsSolved,
    /// Row heights are known and every cell has its geometry
    CellsPositioned,
    LaidOut,
}

pub struct Table {
    config: TableConfig,

    cells: Slab<Cell>,
    grid: CellGrid,
    col_infos: ColInfoTable,
    solver: ColumnSolver,
    rows: RowHeights,

    caption: Option<Box<dyn LayoutBox>>,
    caption_height: i32,

    /// Column the next `<col>` declaration starts at
    next_decl_col: usize,
    has_col_decls: bool,
    /// Columns have been positioned from their declarations alone
    declared_layout: bool,

    state: LayoutState,
    min_max_known: bool,
    available_width: i32,
    /// Whether an available width has been set at all, so that a first width of 0 still counts
    width_set: bool,
    layout_in_progress: bool,
    /// One-shot request for another solve pass, raised while a layout is running
    relayout_requested: bool,
    parsing: bool,

    size: Size<i32>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("config", &self.config)
            .field("total_rows", &self.grid.total_rows())
            .field("total_cols", &self.grid.total_cols())
            .field("state", &self.state)
            .field("available_width", &self.available_width)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        let columns = config.columns;
        let mut table = Self {
            config,
            cells: Slab::new(),
            grid: CellGrid::new(),
            col_infos: ColInfoTable::new(),
            solver: ColumnSolver::new(),
            rows: RowHeights::new(),
            caption: None,
            caption_height: 0,
            next_decl_col: 0,
            has_col_decls: false,
            declared_layout: false,
            state: LayoutState::NotLaidOut,
            min_max_known: false,
            available_width: 0,
            width_set: false,
            layout_in_progress: false,
            relayout_requested: false,
            parsing: true,
            size: Size {
                width: 0,
                height: 0,
            },
        };
        table.add_columns(columns);
        table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Whether rows may still be added (until [`close`](Self::close))
    pub fn is_parsing(&self) -> bool {
        self.parsing
    }

    pub fn total_rows(&self) -> usize {
        self.grid.total_rows()
    }

    pub fn total_cols(&self) -> usize {
        self.grid.total_cols()
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn col_infos(&self) -> &ColInfoTable {
        &self.col_infos
    }

    /// Per-column widths and table totals from the last solve
    pub fn columns(&self) -> &ColumnSolver {
        &self.solver
    }

    pub fn col_min_width(&self) -> &[i32] {
        self.solver.col_min_width()
    }

    pub fn col_max_width(&self) -> &[i32] {
        self.solver.col_max_width()
    }

    pub fn act_col_width(&self) -> &[i32] {
        self.solver.act_col_width()
    }

    pub fn column_pos(&self) -> &[i32] {
        self.solver.column_pos()
    }

    /// Row edges from the last layout, relative to the top of the table
    pub fn row_heights(&self) -> &[i32] {
        self.rows.heights()
    }

    pub fn row_baselines(&self) -> &[i32] {
        self.rows.baselines()
    }

    pub fn min_width(&self) -> i32 {
        self.solver.min_width()
    }

    pub fn max_width(&self) -> i32 {
        self.solver.max_width()
    }

    pub fn available_width(&self) -> i32 {
        self.available_width
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn size(&self) -> Size<i32> {
        self.size
    }

    pub fn caption_height(&self) -> i32 {
        self.caption_height
    }

    pub fn cell(&self, id: CellId) -> TableResult<&Cell> {
        self.cells
            .get(id.index())
            .ok_or_else(|| TableError::cell_not_found(id))
    }

    /// Mutable access to a cell. The table assumes the content changed and re-measures.
    pub fn cell_mut(&mut self, id: CellId) -> TableResult<&mut Cell> {
        if !self.cells.contains(id.index()) {
            return Err(TableError::cell_not_found(id));
        }
        self.mark_dirty();
        self.cells
            .get_mut(id.index())
            .ok_or_else(|| TableError::cell_not_found(id))
    }

    /// The cell covering the slot at (`row`, `col`)
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        let id = self.grid.get(row, col)?;
        self.cells.get(id.index())
    }

    /// Every cell in insertion order
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().map(|(index, cell)| (CellId(index), cell))
    }

    pub fn set_caption(&mut self, caption: Box<dyn LayoutBox>) {
        self.caption = Some(caption);
        self.mark_dirty();
    }

    pub fn caption(&self) -> Option<&dyn LayoutBox> {
        self.caption.as_deref()
    }

    /// Begin a new row (`<tr>`)
    pub fn start_row(&mut self) {
        if self.parsing && self.has_col_decls && self.cells.is_empty() && !self.declared_layout {
            let params = self.solver_params();
            self.declared_layout = self.solver.calc_declared_widths(&self.col_infos, &params);

            #[cfg(feature = "tracing")]
            if self.declared_layout {
                tracing::debug!(
                    "Positioned {} declared columns ahead of the first row: {:?}",
                    self.total_cols(),
                    self.solver.column_pos()
                );
            }
        }
        self.grid.start_row();
    }

    /// Add a cell to the current row, in the first slot not covered by an earlier cell
    pub fn add_cell(&mut self, spec: CellSpec, content: Box<dyn LayoutBox>) -> CellId {
        let mut cell = Cell::new(spec, content);
        let (row, col) = self.grid.next_free_slot();
        let row_span = cell.row_span();

        // A cell never overlaps one spanning down from an earlier row
        let col_span = self.grid.free_span(row, col, cell.col_span());
        if col_span < cell.col_span() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Cell colspan {} at ({}, {}) overlaps a rowspan, clamped to {}",
                cell.col_span(),
                row,
                col,
                col_span
            );
            cell.spec.col_span = col_span;
        }

        let end_col = col + col_span;
        if end_col > self.total_cols() {
            self.add_columns(end_col - self.total_cols());
        }

        cell.row = row;
        cell.col = col;
        let id = CellId(self.cells.insert(cell));
        self.grid.place(id, row, col, row_span, col_span);
        self.mark_dirty();

        if self.declared_layout {
            let (spacing, padding) = (self.config.spacing, self.config.padding);
            if let Some(cell) = self.cells.get_mut(id.index()) {
                let width = content_width(self.solver.column_pos(), cell, spacing, padding);
                cell.set_available_width(width);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "Added cell {} at ({}, {}) spanning {}x{}",
            id.index(),
            row,
            col,
            row_span,
            col_span
        );

        id
    }

    /// Grow the table by `num` empty columns
    pub fn add_columns(&mut self, num: usize) {
        if num == 0 {
            return;
        }
        self.grid.add_columns(num);
        self.col_infos.add_columns(num);
        self.solver.add_columns(num);
        self.declared_layout = false;
        self.mark_dirty();
    }

    /// Allocate `num` more rows ahead of time
    pub fn add_rows(&mut self, num: usize) {
        self.grid.add_rows(num);
    }

    /// Declare columns with a `<col>` element
    pub fn add_column(&mut self, column: ColumnDecl) {
        self.declare_columns(column.span, column.width);
    }

    /// Declare columns with a `<colgroup>` element
    pub fn add_column_group(&mut self, group: ColumnGroupDecl) {
        for (span, width) in group.declared_runs() {
            self.declare_columns(span, width);
        }
    }

    fn declare_columns(&mut self, span: usize, width: Length) {
        let start = self.next_decl_col;
        let end = start + span.max(1);
        if end > self.total_cols() {
            self.add_columns(end - self.total_cols());
        }
        for col in start..end {
            self.col_infos.add(col, 1, ContentWidths::ZERO, width, None);
        }
        self.next_decl_col = end;
        self.has_col_decls = true;
        self.mark_dirty();
    }

    /// Intrinsic widths of the table, borders and spacing included.
    ///
    /// Memoised until the table changes or is given a different available width.
    pub fn calc_min_max_width(&mut self) -> ContentWidths {
        if !self.min_max_known {
            let padding = 2 * self.config.padding;

            for (index, cell) in self.cells.iter_mut() {
                if cell.calc_min_max_width() {
                    self.col_infos.add(
                        cell.col,
                        cell.col_span(),
                        padded(cell.widths(), padding),
                        cell.spec.width,
                        Some(CellId(index)),
                    );
                }
            }

            let cells = &self.cells;
            self.col_infos
                .refresh(|id| cells.get(id.index()).map(|cell| padded(cell.widths(), padding)));

            let params = self.solver_params();
            self.solver.calc_min_max(&self.col_infos, &params);
            self.min_max_known = true;
        }

        ContentWidths::new(self.solver.min_width(), self.solver.max_width())
    }

    /// Give the table the width of its containing block.
    ///
    /// An unchanged width is ignored. A width of 0 only measures; columns are distributed
    /// by the next layout.
    pub fn set_available_width(&mut self, width: i32) {
        let width = width.max(0);
        if self.width_set && width == self.available_width {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "Table available width {} -> {}",
            self.available_width,
            width
        );

        self.width_set = true;
        self.available_width = width;
        self.state = LayoutState::NotLaidOut;
        self.min_max_known = false;
        self.calc_min_max_width();

        if width > 0 {
            self.distribute_widths();
        }
        // Pushing widths may change what the cells report
        self.min_max_known = false;
    }

    /// Lay the table out within its available width.
    ///
    /// Cells are laid out when `deep` is set; otherwise their last layout is reused.
    pub fn layout(&mut self, deep: bool) -> LayoutStatus {
        if self.state == LayoutState::LaidOut && !self.relayout_requested {
            return self.outbound_status();
        }

        self.layout_in_progress = true;
        let mut last_pushed: Option<i32> = None;
        let mut retried = false;

        for _pass in 0..MAX_LAYOUT_PASSES {
            self.relayout_requested = false;
            self.calc_min_max_width();
            let pushed = self.distribute_widths();

            // Cells asked for more room last pass: lay them out again only while that gives
            // them more width, plus one last try
            if let Some(last) = last_pushed {
                if pushed <= last {
                    if retried {
                        break;
                    }
                    retried = true;
                }
            }
            last_pushed = Some(pushed);

            if deep && self.layout_cells(deep).needs_resize() {
                self.relayout_requested = true;
            }
            if !self.relayout_requested {
                break;
            }
            self.min_max_known = false;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Table relayout requested after pushing {}px to cells (pass {})",
                pushed,
                _pass
            );
        }

        self.caption_height = self.layout_caption(deep);
        self.position_cells();

        self.layout_in_progress = false;
        self.relayout_requested = false;
        self.state = LayoutState::LaidOut;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Table laid out: {}x{} ({} rows, {} cols)",
            self.size.width,
            self.size.height,
            self.total_rows(),
            self.total_cols()
        );

        self.outbound_status()
    }

    /// End of the table's markup: no more rows will be added
    pub fn close(&mut self) -> LayoutStatus {
        self.parsing = false;
        self.declared_layout = false;
        self.mark_dirty();
        self.calc_min_max_width();

        if self.available_width == 0 {
            return LayoutStatus::Done;
        }
        self.update_size()
    }

    /// Content somewhere in the table changed size.
    ///
    /// During a layout this only requests another pass. Otherwise the table is measured
    /// again; if it still fits its available width it is laid out, if not the parent is
    /// told it needs more room.
    pub fn update_size(&mut self) -> LayoutStatus {
        if self.layout_in_progress {
            self.relayout_requested = true;
            return LayoutStatus::Done;
        }

        self.mark_dirty();
        self.calc_min_max_width();
        match self.outbound_status() {
            LayoutStatus::Done => self.layout(true),
            LayoutStatus::NeedsResize => LayoutStatus::NeedsResize,
        }
    }

    fn mark_dirty(&mut self) {
        self.min_max_known = false;
        self.state = LayoutState::NotLaidOut;
    }

    fn outbound_status(&self) -> LayoutStatus {
        if self.available_width > 0 && self.solver.min_width() > self.available_width {
            LayoutStatus::NeedsResize
        } else {
            LayoutStatus::Done
        }
    }

    fn solver_params(&self) -> SolverParams {
        SolverParams {
            available_width: self.available_width,
            spacing: self.config.spacing,
            left_border: self.config.left_border(),
            right_border: self.config.right_border(),
            declared_width: self.config.width,
        }
    }

    /// Phases D–E, then hand every cell its content width. Returns the total width handed out.
    fn distribute_widths(&mut self) -> i32 {
        let params = self.solver_params();
        self.solver.calc_widths(&params);
        self.state = LayoutState::ColumnsSolved;

        let (spacing, padding) = (self.config.spacing, self.config.padding);
        let mut pushed = 0;
        for (_, _, id) in self.grid.distinct_cells() {
            let Some(cell) = self.cells.get_mut(id.index()) else {
                continue;
            };
            let width = content_width(self.solver.column_pos(), cell, spacing, padding);
            cell.set_available_width(width);
            pushed += cell.geometry.available_width;
        }
        pushed
    }

    fn layout_cells(&mut self, deep: bool) -> LayoutStatus {
        let mut status = LayoutStatus::Done;
        for (_, _, id) in self.grid.distinct_cells() {
            if let Some(cell) = self.cells.get_mut(id.index()) {
                status = status.merge(cell.layout(deep));
            }
        }
        status
    }

    fn layout_caption(&mut self, deep: bool) -> i32 {
        let width = self.solver.width();
        let Some(caption) = self.caption.as_mut() else {
            return 0;
        };
        caption.calc_min_max_width();
        caption.set_available_width(width);
        if deep {
            caption.layout(deep);
        }
        caption.height()
    }

    /// Stack the rows and give every cell its position, size and alignment extras
    fn position_cells(&mut self) {
        let spacing = self.config.spacing;
        let padding = self.config.padding;
        let total_rows = self.total_rows();

        self.rows.reset(
            total_rows,
            self.caption_height + self.config.top_border() + spacing,
        );
        for row in 0..total_rows {
            let cells = &self.cells;
            let ending = self
                .grid
                .cells_ending_in_row(row)
                .filter_map(|(_, id)| cells.get(id.index()))
                .map(|cell| RowCell {
                    top_row: cell.row,
                    height: cell.box_height(padding),
                    baseline: cell
                        .is_baseline_aligned()
                        .then(|| cell.baseline_offset(padding)),
                });
            self.rows.calc_row(row, ending, spacing);
        }
        self.state = LayoutState::CellsPositioned;

        let column_pos = self.solver.column_pos();
        for (row, _, id) in self.grid.distinct_cells() {
            let Some(cell) = self.cells.get_mut(id.index()) else {
                continue;
            };
            let x = column_pos[cell.col];
            let y = self.rows.row_top(cell.row);
            let width = column_pos[cell.col + cell.col_span()] - x - spacing;
            let band_height = self.rows.row_top(row + 1) - y - spacing;

            let (top_extra, bottom_extra) = vertical_extras(
                cell.spec.valign,
                band_height,
                cell.box_height(padding),
                self.rows.row_baseline(row),
                cell.baseline_offset(padding),
            );

            cell.geometry.position = Point { x, y };
            cell.geometry.size = Size {
                width,
                height: band_height,
            };
            cell.geometry.top_extra = top_extra;
            cell.geometry.bottom_extra = bottom_extra;
        }

        let height = self.rows.bottom() + self.config.bottom_border();
        self.size = Size {
            width: self.solver.width(),
            height: height.max(self.config.height.resolve(self.available_width)),
        };
    }
}

impl LayoutBox for Table {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        Table::calc_min_max_width(self)
    }

    fn set_available_width(&mut self, width: i32) {
        Table::set_available_width(self, width);
    }

    fn layout(&mut self, deep: bool) -> LayoutStatus {
        Table::layout(self, deep)
    }

    fn width(&self) -> i32 {
        Table::width(self)
    }

    fn height(&self) -> i32 {
        Table::height(self)
    }

    fn update_size(&mut self) -> LayoutStatus {
        Table::update_size(self)
    }
}

fn padded(widths: ContentWidths, padding: i32) -> ContentWidths {
    ContentWidths::new(widths.min + padding, widths.max + padding)
}

/// Width available to a cell's content: the columns it spans minus spacing and padding
fn content_width(column_pos: &[i32], cell: &Cell, spacing: i32, padding: i32) -> i32 {
    let start = cell.col;
    let end = start + cell.col_span();
    column_pos[end] - column_pos[start] - spacing - 2 * padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::InlineBox;

    fn text(words: &[i32]) -> Box<dyn LayoutBox> {
        Box::new(InlineBox::new(words.iter().copied(), 4, 10, 8))
    }

    #[test]
    fn test_state_follows_layout_and_mutation() {
        let mut table = Table::new(TableConfig::for_testing());
        table.start_row();
        table.add_cell(CellSpec::new(), text(&[20, 30]));
        assert_eq!(table.state(), LayoutState::NotLaidOut);

        table.set_available_width(200);
        assert_eq!(table.state(), LayoutState::ColumnsSolved);

        table.layout(true);
        assert_eq!(table.state(), LayoutState::LaidOut);

        table.add_cell(CellSpec::new(), text(&[10]));
        assert_eq!(table.state(), LayoutState::NotLaidOut);

        table.layout(true);
        table.close();
        assert_eq!(table.state(), LayoutState::LaidOut);
        assert!(!table.is_parsing());
    }

    #[test]
    fn test_min_max_is_memoised() {
        let mut table = Table::new(TableConfig::for_testing());
        table.start_row();
        table.add_cell(CellSpec::new(), text(&[20, 30]));

        let first = table.calc_min_max_width();
        assert!(table.min_max_known);
        assert_eq!(first, ContentWidths::new(30, 54));
        assert_eq!(table.calc_min_max_width(), first);
    }

    #[test]
    fn test_cells_know_their_slot() {
        let mut table = Table::new(TableConfig::for_testing());
        table.start_row();
        let a = table.add_cell(CellSpec::new().with_row_span(2), text(&[5]));
        let b = table.add_cell(CellSpec::new(), text(&[5]));
        table.start_row();
        let c = table.add_cell(CellSpec::new(), text(&[5]));

        assert_eq!(table.cell(a).map(|cell| (cell.row(), cell.col())).ok(), Some((0, 0)));
        assert_eq!(table.cell(b).map(|cell| (cell.row(), cell.col())).ok(), Some((0, 1)));
        assert_eq!(table.cell(c).map(|cell| (cell.row(), cell.col())).ok(), Some((1, 1)));
        assert_eq!(table.cell_at(1, 0).map(Cell::row), Some(0));
    }

    #[test]
    fn test_unknown_cell_is_an_error() {
        let mut table = Table::default();
        assert!(matches!(
            table.cell(CellId(3)),
            Err(TableError::CellNotFound { id: 3 })
        ));
        assert!(table.cell_mut(CellId(0)).is_err());
    }

    #[test]
    fn test_zero_width_defers_distribution() {
        let mut table = Table::new(TableConfig::for_testing());
        table.start_row();
        let id = table.add_cell(CellSpec::new(), text(&[20]));
        table.set_available_width(0);

        assert_eq!(table.min_width(), 20);
        assert_eq!(table.state(), LayoutState::NotLaidOut);
        assert_eq!(
            table.cell(id).map(|cell| cell.geometry().available_width).ok(),
            Some(0)
        );
    }

    #[test]
    fn test_update_size_during_layout_is_deferred() {
        let mut table = Table::new(TableConfig::for_testing());
        table.layout_in_progress = true;
        assert_eq!(table.update_size(), LayoutStatus::Done);
        assert!(table.relayout_requested);
    }
}
