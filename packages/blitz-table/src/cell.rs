//! Table cells
//!
//! A cell pairs the attributes declared on a `<td>`/`<th>` with the box that holds its
//! content. The content is opaque to the table: it is measured and laid out only through
//! [`LayoutBox`].

use std::fmt;

use blitz_traits::{ContentWidths, LayoutBox, LayoutStatus};
use taffy::geometry::{Point, Size};

use crate::length::{Length, LengthKind};

/// Index of a cell in its table's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<CellId> for usize {
    fn from(id: CellId) -> Self {
        id.0
    }
}

/// Vertical placement of a cell's content within its row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
    /// Align the first line of every baseline cell in the row
    Baseline,
    /// No alignment: content stays at the top and no extras are computed for it
    None,
}

/// Attributes declared on a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    pub row_span: usize,
    pub col_span: usize,
    pub width: Length,
    pub height: Length,
    pub valign: VerticalAlign,
    pub no_wrap: bool,
}

impl Default for CellSpec {
    fn default() -> Self {
        Self {
            row_span: 1,
            col_span: 1,
            width: Length::variable(),
            height: Length::variable(),
            valign: VerticalAlign::default(),
            no_wrap: false,
        }
    }
}

impl CellSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans below one are treated as one
    pub fn with_col_span(mut self, span: i32) -> Self {
        self.col_span = span.max(1) as usize;
        self
    }

    /// Spans below one are treated as one
    pub fn with_row_span(mut self, span: i32) -> Self {
        self.row_span = span.max(1) as usize;
        self
    }

    pub fn with_width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: Length) -> Self {
        self.height = height;
        self
    }

    pub fn with_valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn with_no_wrap(mut self, no_wrap: bool) -> Self {
        self.no_wrap = no_wrap;
        self
    }

    fn normalize(&mut self) {
        self.row_span = self.row_span.max(1);
        self.col_span = self.col_span.max(1);
        if self.width.is_undefined() {
            self.width = Length::variable();
        }
    }
}

/// Where a cell ended up after the table was laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellGeometry {
    /// Top-left corner of the cell box, relative to the table
    pub position: Point<i32>,
    /// Width of the cell box and height of the row band it occupies
    pub size: Size<i32>,
    /// Width handed to the content (cell width minus padding)
    pub available_width: i32,
    /// Space above the content introduced by vertical alignment
    pub top_extra: i32,
    /// Space below the content left over after vertical alignment
    pub bottom_extra: i32,
}

pub struct Cell {
    pub(crate) spec: CellSpec,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) content: Box<dyn LayoutBox>,
    /// Intrinsic widths of the content as last reported, after the `nowrap` rule
    pub(crate) widths: ContentWidths,
    pub(crate) widths_known: bool,
    /// Whether `geometry.available_width` has been handed to the content yet
    pub(crate) width_pushed: bool,
    pub(crate) geometry: CellGeometry,
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("spec", &self.spec)
            .field("row", &self.row)
            .field("col", &self.col)
            .field("widths", &self.widths)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl Cell {
    pub(crate) fn new(mut spec: CellSpec, content: Box<dyn LayoutBox>) -> Self {
        spec.normalize();
        Self {
            spec,
            row: 0,
            col: 0,
            content,
            widths: ContentWidths::ZERO,
            widths_known: false,
            width_pushed: false,
            geometry: CellGeometry::default(),
        }
    }

    pub fn spec(&self) -> &CellSpec {
        &self.spec
    }

    /// First grid row covered by the cell
    pub fn row(&self) -> usize {
        self.row
    }

    /// First grid column covered by the cell
    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row_span(&self) -> usize {
        self.spec.row_span
    }

    pub fn col_span(&self) -> usize {
        self.spec.col_span
    }

    pub fn widths(&self) -> ContentWidths {
        self.widths
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    pub fn content(&self) -> &dyn LayoutBox {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn LayoutBox {
        self.content.as_mut()
    }

    /// Swap in new content and return the old one. The new content is measured and given
    /// its width by the next layout.
    pub fn set_content(&mut self, content: Box<dyn LayoutBox>) -> Box<dyn LayoutBox> {
        self.widths_known = false;
        self.width_pushed = false;
        std::mem::replace(&mut self.content, content)
    }

    /// Measure the content again. Returns whether the intrinsic widths changed.
    pub(crate) fn calc_min_max_width(&mut self) -> bool {
        let mut widths = self.content.calc_min_max_width();
        // A cell that may not wrap is as wide as its longest line, unless its width is pinned
        if self.spec.no_wrap && self.spec.width.kind != LengthKind::Fixed {
            widths.min = widths.max;
        }
        let changed = !self.widths_known || widths != self.widths;
        self.widths = widths;
        self.widths_known = true;
        changed
    }

    /// Hand the content its width. Returns `false` when the width did not change.
    pub(crate) fn set_available_width(&mut self, width: i32) -> bool {
        let width = width.max(0);
        if self.width_pushed && self.geometry.available_width == width {
            return false;
        }
        self.width_pushed = true;
        self.geometry.available_width = width;
        self.content.set_available_width(width);
        true
    }

    pub(crate) fn layout(&mut self, deep: bool) -> LayoutStatus {
        self.content.layout(deep)
    }

    /// Height of the cell box: content plus vertical padding, or the declared height if larger
    pub(crate) fn box_height(&self, padding: i32) -> i32 {
        let declared = self.spec.height.resolve(0);
        (self.content.height() + 2 * padding).max(declared)
    }

    /// Baseline of the first line, measured from the top of the cell box
    pub(crate) fn baseline_offset(&self, padding: i32) -> i32 {
        padding
            + self
                .content
                .baseline_offset()
                .unwrap_or_else(|| self.content.height())
    }

    pub(crate) fn is_baseline_aligned(&self) -> bool {
        self.spec.valign == VerticalAlign::Baseline
    }
}
