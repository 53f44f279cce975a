//! The column constraint table
//!
//! Every cell (and every `<col>` declaration) contributes a constraint for the exact
//! (start column, span) range it covers. Constraints for the same range are merged by
//! keeping the tightest single requirement, never by summing: two cells of 40px in the
//! same column still only need 40px.

use blitz_traits::ContentWidths;

use crate::cell::CellId;
use crate::length::{Length, LengthKind};

/// Aggregated width constraint for one (start column, span) range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColInfo {
    pub span: usize,
    pub start: usize,
    pub min: i32,
    pub max: i32,
    /// Value of the most specific width declared for the range
    pub value: i32,
    pub kind: LengthKind,
    /// Cell that produced `min`, if it came from a cell
    pub min_cell: Option<CellId>,
    /// Cell that produced `max`, if it came from a cell
    pub max_cell: Option<CellId>,
    /// Every cell that contributed to the range
    cells: Vec<CellId>,
    /// Widest contribution that did not come from a cell
    fixed: ContentWidths,
}

impl ColInfo {
    fn new(start: usize, span: usize, cell: Option<CellId>) -> Self {
        Self {
            span,
            start,
            min: 0,
            max: 0,
            value: 0,
            kind: LengthKind::Undefined,
            min_cell: cell,
            max_cell: cell,
            cells: Vec::new(),
            fixed: ContentWidths::ZERO,
        }
    }

    /// Cells that contributed to the range, in the order they were added
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Recompute min/max as the widest of every contribution, using the current widths of
    /// the contributing cells
    fn refresh(&mut self, widths: &impl Fn(CellId) -> Option<ContentWidths>) {
        if self.cells.is_empty() {
            return;
        }
        self.min = self.fixed.min;
        self.max = self.fixed.max;
        self.min_cell = None;
        self.max_cell = None;
        for &id in &self.cells {
            let Some(current) = widths(id) else {
                continue;
            };
            if current.min > self.min || (self.min_cell.is_none() && current.min == self.min) {
                self.min = current.min;
                self.min_cell = Some(id);
            }
            if current.max > self.max || (self.max_cell.is_none() && current.max == self.max) {
                self.max = current.max;
                self.max_cell = Some(id);
            }
        }
    }

    fn merge(&mut self, min: i32, max: i32, width: Length, cell: Option<CellId>) {
        match cell {
            Some(id) if !self.cells.contains(&id) => self.cells.push(id),
            Some(_) => {}
            None => {
                self.fixed.min = self.fixed.min.max(min);
                self.fixed.max = self.fixed.max.max(max);
            }
        }
        if min > self.min {
            self.min = min;
            self.min_cell = cell;
        }
        if max > self.max {
            self.max = max;
            self.max_cell = cell;
        }

        let value = match width.kind {
            LengthKind::Percent => width.value.min(100),
            _ => width.value,
        };
        if width.kind > self.kind {
            self.kind = width.kind;
            self.value = value;
        } else if width.kind == self.kind && value > self.value {
            self.value = value;
        }
    }
}

/// All [`ColInfo`] records of a table, bucketed by span.
///
/// `buckets[span - 1][start]` holds the record for columns `start..start + span`. There is
/// one bucket per span width seen so far, each as wide as the table.
#[derive(Debug, Clone, Default)]
pub struct ColInfoTable {
    buckets: Vec<Vec<Option<ColInfo>>>,
    total_cols: usize,
}

impl ColInfoTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_cols(&self) -> usize {
        self.total_cols
    }

    /// Widest span recorded so far
    pub fn max_col_span(&self) -> usize {
        self.buckets.len()
    }

    /// Length of every span bucket, which always equals the column count
    pub fn bucket_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    pub fn add_columns(&mut self, num: usize) {
        self.total_cols += num;
        for bucket in &mut self.buckets {
            bucket.resize(self.total_cols, None);
        }
    }

    pub fn get(&self, start: usize, span: usize) -> Option<&ColInfo> {
        self.buckets.get(span.checked_sub(1)?)?.get(start)?.as_ref()
    }

    /// Record a constraint for `start..start + span`. The caller grows the table first.
    pub fn add(
        &mut self,
        start: usize,
        span: usize,
        widths: ContentWidths,
        width: Length,
        cell: Option<CellId>,
    ) {
        let span = span.max(1);
        debug_assert!(start + span <= self.total_cols);

        while self.buckets.len() < span {
            self.buckets.push(vec![None; self.total_cols]);
        }

        let record =
            self.buckets[span - 1][start].get_or_insert_with(|| ColInfo::new(start, span, cell));
        record.merge(widths.min, widths.max, width, cell);
    }

    /// Refresh every record from the current widths of all the cells that contributed to it
    pub fn refresh(&mut self, widths: impl Fn(CellId) -> Option<ContentWidths>) {
        for record in self.buckets.iter_mut().flatten().flatten() {
            record.refresh(&widths);
        }
    }

    /// Records in solving order: narrow spans first, then by start column
    pub fn iter(&self) -> impl Iterator<Item = &ColInfo> {
        self.buckets.iter().flatten().flatten()
    }
}

/// A `<col>` declaration: `span` columns sharing one declared width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDecl {
    pub span: usize,
    /// `Undefined` inherits the width of the enclosing group
    pub width: Length,
}

impl Default for ColumnDecl {
    fn default() -> Self {
        Self {
            span: 1,
            width: Length::undefined(),
        }
    }
}

impl ColumnDecl {
    pub fn new(width: Length) -> Self {
        Self { span: 1, width }
    }

    /// Spans below one are treated as one
    pub fn with_span(mut self, span: i32) -> Self {
        self.span = span.max(1) as usize;
        self
    }
}

/// A `<colgroup>` declaration.
///
/// A group without child columns declares `span` columns of its own width. A group with
/// children declares exactly its children, which inherit the group width when they do
/// not declare one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroupDecl {
    pub span: usize,
    pub width: Length,
    pub columns: Vec<ColumnDecl>,
}

impl Default for ColumnGroupDecl {
    fn default() -> Self {
        Self {
            span: 1,
            width: Length::undefined(),
            columns: Vec::new(),
        }
    }
}

impl ColumnGroupDecl {
    pub fn new(width: Length) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Spans below one are treated as one
    pub fn with_span(mut self, span: i32) -> Self {
        self.span = span.max(1) as usize;
        self
    }

    pub fn with_column(mut self, column: ColumnDecl) -> Self {
        self.columns.push(column);
        self
    }

    /// The (span, width) runs this group declares, in column order
    pub fn declared_runs(&self) -> Vec<(usize, Length)> {
        if self.columns.is_empty() {
            return vec![(self.span.max(1), self.width)];
        }
        self.columns
            .iter()
            .map(|column| {
                let width = if column.width.is_undefined() {
                    self.width
                } else {
                    column.width
                };
                (column.span.max(1), width)
            })
            .collect()
    }
}
