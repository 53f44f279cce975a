//! Row heights and vertical alignment

use crate::cell::VerticalAlign;

/// What the row accumulator needs to know about a cell ending in the row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCell {
    /// First row covered by the cell
    pub top_row: usize,
    /// Height of the cell box, padding included
    pub height: i32,
    /// Baseline offset from the top of the cell box, for baseline-aligned cells only
    pub baseline: Option<i32>,
}

/// Row edge positions, accumulated top to bottom.
///
/// `heights[r]` is the y position of the top of row `r`; `heights[total_rows]` is the
/// bottom of the last row. Rows are monotonic: a row is never above the previous one.
#[derive(Debug, Clone, Default)]
pub struct RowHeights {
    heights: Vec<i32>,
    baselines: Vec<i32>,
}

impl RowHeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop previous results and start a table of `rows` rows whose first row begins at `top`
    pub fn reset(&mut self, rows: usize, top: i32) {
        self.heights.clear();
        self.heights.resize(rows + 1, 0);
        self.heights[0] = top;
        self.baselines.clear();
        self.baselines.resize(rows, 0);
    }

    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    pub fn baselines(&self) -> &[i32] {
        &self.baselines
    }

    pub fn row_top(&self, row: usize) -> i32 {
        self.heights[row]
    }

    pub fn row_baseline(&self, row: usize) -> i32 {
        self.baselines[row]
    }

    /// Bottom edge of the last row
    pub fn bottom(&self) -> i32 {
        self.heights.last().copied().unwrap_or(0)
    }

    /// Compute the bottom edge of `row` from the cells whose last row it is.
    /// Rows above it must be computed first.
    pub fn calc_row(&mut self, row: usize, cells: impl IntoIterator<Item = RowCell>, spacing: i32) {
        let mut bottom = 0;
        let mut baseline = 0;
        let mut descent = 0;
        let mut has_baseline = false;

        for cell in cells {
            let top = self.heights[cell.top_row];
            bottom = bottom.max(top + cell.height + spacing);

            if let Some(offset) = cell.baseline {
                has_baseline = true;
                baseline = baseline.max(offset);
                descent = descent.max(top + cell.height - offset);
            }
        }

        if has_baseline {
            bottom = bottom.max(baseline + descent + spacing);
            self.baselines[row] = baseline;
        }

        self.heights[row + 1] = bottom.max(self.heights[row]);
    }
}

/// Split the free space of a row band into the space above and below a cell's box.
///
/// `band_height` is the height of the rows the cell spans, `row_baseline` the baseline
/// of the cell's last row.
pub fn vertical_extras(
    valign: VerticalAlign,
    band_height: i32,
    cell_height: i32,
    row_baseline: i32,
    cell_baseline: i32,
) -> (i32, i32) {
    let top = match valign {
        VerticalAlign::None => return (0, 0),
        VerticalAlign::Top => 0,
        VerticalAlign::Middle => (band_height - cell_height) / 2,
        VerticalAlign::Bottom => band_height - cell_height,
        VerticalAlign::Baseline => row_baseline - cell_baseline,
    };
    let top = top.max(0);
    (top, (band_height - cell_height - top).max(0))
}
