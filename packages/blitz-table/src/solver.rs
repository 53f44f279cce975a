//! Column width solver
//!
//! Turns the column constraint table into concrete column widths in five phases:
//!
//!  - A: collapse every constraint onto single columns. Spanning constraints are spread
//!    over the columns they cover, preferring the least specific columns.
//!  - B: resolve the table width from the column totals and the declared table width.
//!  - C: now that the table width is known, give percent and relative columns their
//!    final maximum width.
//!  - D: start every column at its minimum and hand out the remaining width, first up to
//!    each column's maximum (fixed, percent, relative, variable), then proportionally.
//!  - E: accumulate column positions.
//!
//! Phases A–C run in [`ColumnSolver::calc_min_max`], D–E in [`ColumnSolver::calc_widths`].
//! All arithmetic is in whole pixels; every division is guarded against a zero divisor.

use crate::col_info::{ColInfo, ColInfoTable};
use crate::length::{Length, LengthKind, mul_div};

/// Table-level inputs of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParams {
    pub available_width: i32,
    pub spacing: i32,
    pub left_border: i32,
    pub right_border: i32,
    /// Width declared on the table itself
    pub declared_width: Length,
}

impl SolverParams {
    fn borders(&self) -> i32 {
        self.left_border + self.right_border
    }
}

/// Width totals for one kind of column
#[derive(Debug, Clone, Copy, Default)]
struct KindTotals {
    count: i32,
    max: i32,
}

/// Per-column widths and the table width derived from them
#[derive(Debug, Clone)]
pub struct ColumnSolver {
    col_min_width: Vec<i32>,
    col_max_width: Vec<i32>,
    col_value: Vec<i32>,
    col_type: Vec<LengthKind>,
    act_col_width: Vec<i32>,
    /// Left edge of every column plus the right edge of the last one
    column_pos: Vec<i32>,

    min_width: i32,
    max_width: i32,
    width: i32,
    total_percent: i32,
    total_relative: i32,
}

impl Default for ColumnSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnSolver {
    pub fn new() -> Self {
        Self {
            col_min_width: Vec::new(),
            col_max_width: Vec::new(),
            col_value: Vec::new(),
            col_type: Vec::new(),
            act_col_width: Vec::new(),
            column_pos: vec![0],
            min_width: 0,
            max_width: 0,
            width: 0,
            total_percent: 0,
            total_relative: 0,
        }
    }

    pub fn total_cols(&self) -> usize {
        self.col_type.len()
    }

    /// Grow every per-column array by `num` zeroed (variable) columns
    pub fn add_columns(&mut self, num: usize) {
        let cols = self.total_cols() + num;
        self.col_min_width.resize(cols, 0);
        self.col_max_width.resize(cols, 0);
        self.col_value.resize(cols, 0);
        self.col_type.resize(cols, LengthKind::Variable);
        self.act_col_width.resize(cols, 0);
        self.column_pos.resize(cols + 1, 0);
    }

    pub fn col_min_width(&self) -> &[i32] {
        &self.col_min_width
    }

    pub fn col_max_width(&self) -> &[i32] {
        &self.col_max_width
    }

    pub fn col_value(&self) -> &[i32] {
        &self.col_value
    }

    pub fn col_type(&self) -> &[LengthKind] {
        &self.col_type
    }

    pub fn act_col_width(&self) -> &[i32] {
        &self.act_col_width
    }

    pub fn column_pos(&self) -> &[i32] {
        &self.column_pos
    }

    pub fn min_width(&self) -> i32 {
        self.min_width
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    /// Resolved table width, borders and spacing included
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn total_percent(&self) -> i32 {
        self.total_percent
    }

    pub fn total_relative(&self) -> i32 {
        self.total_relative
    }

    /// Run every phase
    pub fn solve(&mut self, infos: &ColInfoTable, params: &SolverParams) {
        self.calc_min_max(infos, params);
        self.calc_widths(params);
    }

    /// Phases A–C: column min/max widths and the table width
    pub fn calc_min_max(&mut self, infos: &ColInfoTable, params: &SolverParams) {
        self.col_min_width.fill(0);
        self.col_max_width.fill(0);
        self.col_value.fill(0);
        self.col_type.fill(LengthKind::Variable);

        // Phase A
        for info in infos.iter() {
            self.calc_single_col_min_max(info, params.spacing);
        }

        // Phase B
        self.calc_table_width(params);

        // Phase C
        for info in infos.iter() {
            let kind = info.kind.normalized();
            if info.span < 2 && matches!(kind, LengthKind::Fixed | LengthKind::Variable) {
                continue;
            }
            self.calc_final_col_max(info, params.spacing);
        }

        if params.declared_width.is_fixed() {
            self.min_width = self.width;
            self.max_width = self.width;
        } else {
            self.max_width = params.spacing
                + params.borders()
                + self
                    .col_max_width
                    .iter()
                    .map(|max| max + params.spacing)
                    .sum::<i32>();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Resolved {} columns: min {} max {} width {} (percent {}, relative {})",
            self.total_cols(),
            self.min_width,
            self.max_width,
            self.width,
            self.total_percent,
            self.total_relative
        );
    }

    /// Phases D–E: actual column widths and positions. Needs [`calc_min_max`](Self::calc_min_max) first.
    pub fn calc_widths(&mut self, params: &SolverParams) {
        self.act_col_width.clone_from(&self.col_min_width);

        let mut totals = [KindTotals::default(); 4];
        for (kind, max) in self.col_type.iter().zip(&self.col_max_width) {
            let bucket = &mut totals[kind_index(*kind)];
            bucket.count += 1;
            bucket.max += max;
        }

        let used = params.spacing
            + params.borders()
            + self
                .act_col_width
                .iter()
                .map(|width| width + params.spacing)
                .sum::<i32>();
        let mut slack = self.width - used;

        // Grow columns towards their maximum, most specific kind first
        for kind in [
            LengthKind::Fixed,
            LengthKind::Percent,
            LengthKind::Relative,
            LengthKind::Variable,
        ] {
            slack = self.distribute_width(slack, kind, totals[kind_index(kind)].count);
        }

        // Anything left goes to the flexible columns, in proportion to their maximum
        for kind in [
            LengthKind::Variable,
            LengthKind::Relative,
            LengthKind::Percent,
        ] {
            slack = self.distribute_rest(slack, kind, totals[kind_index(kind)].max);
        }

        #[cfg(feature = "tracing")]
        if slack != 0 {
            tracing::debug!("{}px of the {}px table width left undistributed", slack, self.width);
        }

        self.calc_column_positions(params);
    }

    /// Position columns from declared widths alone, before any row has been seen.
    ///
    /// Only possible when every column is declared and at most one of them is flexible;
    /// that column takes whatever the declared table width leaves. Returns whether the
    /// columns could be positioned.
    pub fn calc_declared_widths(&mut self, infos: &ColInfoTable, params: &SolverParams) -> bool {
        let cols = self.total_cols();
        if cols == 0 {
            return false;
        }

        self.col_value.fill(0);
        self.col_type.fill(LengthKind::Variable);
        for info in infos.iter().filter(|info| info.span == 1) {
            self.col_type[info.start] = info.kind.normalized();
            self.col_value[info.start] = info.value;
        }

        let mut width = params.declared_width.resolve(params.available_width);
        let mut remaining = width - params.borders() - (cols as i32 + 1) * params.spacing;
        let mut flexible = None;
        let mut flexible_count = 0;

        for col in 0..cols {
            self.act_col_width[col] = match self.col_type[col] {
                LengthKind::Fixed => self.col_value[col],
                LengthKind::Percent => {
                    mul_div(self.col_value[col], params.available_width, 100)
                }
                LengthKind::Relative | LengthKind::Variable | LengthKind::Undefined => {
                    flexible.get_or_insert(col);
                    flexible_count += 1;
                    0
                }
            };
            remaining -= self.act_col_width[col];
        }

        if flexible_count > 1 || (width == 0 && flexible_count > 0) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Declared columns need a full layout ({} flexible, table width {})",
                flexible_count,
                width
            );
            return false;
        }

        if remaining < 0 {
            width -= remaining;
            remaining = 0;
        }
        if let Some(col) = flexible {
            self.act_col_width[col] = remaining;
        }

        self.col_min_width.clone_from(&self.act_col_width);
        self.col_max_width.clone_from(&self.act_col_width);
        self.width = width;
        self.calc_column_positions(params);
        true
    }

    fn calc_column_positions(&mut self, params: &SolverParams) {
        let mut pos = params.left_border + params.spacing;
        self.column_pos[0] = pos;
        for (col, width) in self.act_col_width.iter().enumerate() {
            pos += width + params.spacing;
            self.column_pos[col + 1] = pos;
        }
    }

    fn calc_single_col_min_max(&mut self, info: &ColInfo, spacing: i32) {
        let start = info.start;
        let span = info.span;
        let kind = info.kind.normalized();

        let smin = info.min;
        let smax = if kind == LengthKind::Fixed {
            info.value
        } else {
            info.max
        };
        let smax = smax.max(smin);

        if span == 1 {
            self.col_min_width[start] = self.col_min_width[start].max(smin);
            self.col_max_width[start] = self.col_max_width[start].max(smax);
            self.col_value[start] = info.value;
            self.col_type[start] = kind;
        } else {
            let old_min: i32 = self.col_min_width[start..start + span].iter().sum();
            let spread_min = smin - old_min - (span as i32 - 1) * spacing;
            self.spread_span_min_max(start, span, spread_min, 0, kind);
        }
    }

    fn calc_table_width(&mut self, params: &SolverParams) {
        let spacing = params.spacing;
        let cols = self.total_cols() as i32;

        self.total_percent = 0;
        self.total_relative = 0;

        let mut max_fixed = 0;
        let mut min_rel = 0;
        let mut min_var = 0;
        let mut percent_widest = 0;
        let mut has_fixed = false;
        let mut has_percent = false;

        self.min_width = spacing + params.borders();
        self.max_width = spacing + params.borders();

        for col in 0..self.col_type.len() {
            let min = self.col_min_width[col];
            let max = self.col_max_width[col];
            let value = self.col_value[col];
            self.min_width += min + spacing;
            self.max_width += max + spacing;

            match self.col_type[col] {
                LengthKind::Fixed => {
                    max_fixed += max + spacing;
                    has_fixed = true;
                }
                LengthKind::Percent => {
                    has_percent = true;
                    self.total_percent += value;
                    if value > 0 {
                        percent_widest = percent_widest.max(mul_div(max, 100, value));
                    }
                }
                LengthKind::Relative => {
                    self.total_relative += value;
                    min_rel += min + spacing;
                }
                LengthKind::Variable | LengthKind::Undefined => {
                    min_var += min + spacing;
                }
            }
        }

        let available = params.available_width;
        let declared = params.declared_width;

        let width = if declared.kind >= LengthKind::Percent {
            declared.resolve(available).max(self.min_width)
        } else if has_percent && !has_fixed {
            // Size the table so the widest percent column gets its share
            let mut width = percent_widest + (cols + 1) * spacing + params.borders() + 1;
            let percent = self.total_percent.min(99);
            width = width.max(mul_div(min_var + min_rel, 100, 100 - percent));
            width = width.min(available);
            self.total_percent = self.total_percent.max(100);
            width
        } else if has_percent && has_fixed {
            self.total_percent = self.total_percent.min(99);
            mul_div(max_fixed + min_var + min_rel, 100, 100 - self.total_percent).min(available)
        } else {
            available.min(self.max_width)
        };

        self.width = width.max(self.min_width);
    }

    fn calc_final_col_max(&mut self, info: &ColInfo, spacing: i32) {
        let start = info.start;
        let span = info.span;
        let kind = info.kind.normalized();

        let old_min: i32 = self.col_min_width[start..start + span].iter().sum();
        let old_max: i32 = self.col_max_width[start..start + span].iter().sum();

        let smax = match kind {
            LengthKind::Fixed => info.min.max(info.value),
            LengthKind::Percent => {
                mul_div(self.width, info.value, self.total_percent.max(100))
            }
            LengthKind::Relative if self.total_relative > 0 => {
                mul_div(self.width, info.value, self.total_relative)
            }
            _ => info.max,
        };
        let smax = smax.max(old_min).min(self.width);

        if span == 1 {
            self.col_max_width[start] = smax;
            self.col_type[start] = kind;
        } else {
            let spread_max = smax - old_max - (span as i32 - 1) * spacing;
            self.spread_span_min_max(start, span, 0, spread_max, kind);
        }
    }

    /// Spread a spanning constraint's excess min and max width over the columns it covers.
    ///
    /// Only columns no more specific than the spanning constraint take part. Max width is
    /// spread evenly, with the rounding remainder going to the column the round-robin walk
    /// is on when it runs out. Min width is spread tier by tier (variable, relative,
    /// percent, fixed), first within each column's headroom below its max, then forced.
    fn spread_span_min_max(
        &mut self,
        start: usize,
        span: usize,
        dist_min: i32,
        dist_max: i32,
        kind: LengthKind,
    ) {
        if dist_min < 1 && dist_max < 1 {
            return;
        }
        let dist_min = dist_min.max(0);
        let dist_max = dist_max.max(0);
        let end = start + span;
        let span_len = span as i32;

        if !self.col_type[start..end].iter().any(|col_kind| *col_kind <= kind) {
            #[cfg(feature = "tracing")]
            tracing::trace!("No {:?} column in {}..{} can absorb the span", kind, start, end);
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "Spreading min {} max {} over {}..{} as {:?}",
            dist_min,
            dist_max,
            start,
            end,
            kind
        );

        let share = dist_max / span_len;
        let mut remaining_max = dist_max;
        let mut col = start;
        while remaining_max > 0 {
            if self.col_type[col] <= kind {
                self.col_max_width[col] += share;
                remaining_max -= share;
                if remaining_max < span_len {
                    self.col_max_width[col] += remaining_max;
                    self.col_type[col] = kind;
                    remaining_max = 0;
                }
            }
            col += 1;
            if col == end {
                col = start;
            }
        }

        let mut remaining_min = dist_min;
        for limit_to_max in [true, false] {
            for tier in LengthKind::SPREAD_ORDER {
                if tier > kind || remaining_min == 0 {
                    break;
                }
                remaining_min =
                    self.distribute_min_width(remaining_min, kind, tier, start, span, limit_to_max);
            }
        }

        for col in start..end {
            self.col_max_width[col] = self.col_max_width[col].max(self.col_min_width[col]);
        }
    }

    /// Hand `distrib` pixels of min width to the `to_kind` columns of a span, round-robin.
    /// Returns what could not be placed.
    fn distribute_min_width(
        &mut self,
        distrib: i32,
        dist_kind: LengthKind,
        to_kind: LengthKind,
        start: usize,
        span: usize,
        limit_to_max: bool,
    ) -> i32 {
        let end = start + span;
        let share = distrib / span as i32;
        let mut remaining = distrib;
        let mut last_round = 0;
        let mut col = start;

        while remaining > 0 {
            if self.col_type[col] == to_kind {
                let headroom = self.col_max_width[col] - self.col_min_width[col];
                let mut delta = share;
                if limit_to_max {
                    delta = delta.min(headroom);
                }
                delta = delta.min(remaining).max(0);
                if delta == 0 && (!limit_to_max || headroom > 0) {
                    delta = 1;
                }
                if delta > 0 {
                    self.col_min_width[col] += delta;
                    self.col_type[col] = dist_kind;
                    remaining -= delta;
                }
            }
            col += 1;
            if col == end {
                col = start;
                if last_round == remaining {
                    break;
                }
                last_round = remaining;
            }
        }

        remaining
    }

    /// Grow the `kind` columns towards their max width, an equal share at a time.
    /// Returns what could not be placed.
    fn distribute_width(&mut self, distrib: i32, kind: LengthKind, type_cols: i32) -> i32 {
        if type_cols == 0 || distrib <= 0 {
            return distrib;
        }

        let cols = self.total_cols();
        let share = distrib / type_cols;
        let mut remaining = distrib;
        let mut last_round = 0;
        let mut col = 0;

        while remaining > 0 {
            if self.col_type[col] == kind {
                let headroom = self.col_max_width[col] - self.act_col_width[col];
                let mut delta = share.min(headroom).min(remaining).max(0);
                if delta == 0 && headroom > 0 {
                    delta = 1;
                }
                self.act_col_width[col] += delta;
                remaining -= delta;
            }
            col += 1;
            if col == cols {
                col = 0;
                if last_round == remaining {
                    break;
                }
                last_round = remaining;
            }
        }

        remaining
    }

    /// Hand out leftover width to the `kind` columns in proportion to their max width.
    /// `divider` is the sum of those max widths. Returns what could not be placed.
    fn distribute_rest(&mut self, distrib: i32, kind: LengthKind, divider: i32) -> i32 {
        if divider == 0 || distrib <= 0 {
            return distrib;
        }

        let cols = self.total_cols();
        let mut remaining = distrib;
        let mut last_round = 0;
        let mut col = 0;

        while remaining > 0 {
            if self.col_type[col] == kind {
                let delta = mul_div(self.col_max_width[col], distrib, divider)
                    .min(remaining)
                    .max(1);
                self.act_col_width[col] += delta;
                remaining -= delta;
            }
            col += 1;
            if col == cols {
                col = 0;
                if last_round == remaining {
                    break;
                }
                last_round = remaining;
            }
        }

        remaining
    }
}

fn kind_index(kind: LengthKind) -> usize {
    match kind {
        LengthKind::Fixed => 0,
        LengthKind::Percent => 1,
        LengthKind::Relative => 2,
        LengthKind::Variable | LengthKind::Undefined => 3,
    }
}
