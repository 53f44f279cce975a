use bitflags::bitflags;

use crate::length::Length;

bitflags! {
    /// Which sides of the table carry the outer border (the HTML `frame` attribute)
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Frame: u8 {
        const ABOVE = 1 << 0;
        const BELOW = 1 << 1;
        const LHS = 1 << 2;
        const RHS = 1 << 3;
        const HSIDES = Self::ABOVE.bits() | Self::BELOW.bits();
        const VSIDES = Self::LHS.bits() | Self::RHS.bits();
        const BOX = Self::HSIDES.bits() | Self::VSIDES.bits();
    }
}

impl Frame {
    pub const VOID: Frame = Frame::empty();
}

/// Which internal rules are drawn between cells (the HTML `rules` attribute).
///
/// Layout does not depend on it; it is carried for whoever paints the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rules {
    #[default]
    None,
    Groups,
    Rows,
    Cols,
    All,
}

/// Options used when constructing a [`Table`](crate::Table)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Declared table width
    pub width: Length,
    /// Declared table height
    pub height: Length,
    /// Space between cells and between the outer cells and the border (`cellspacing`)
    pub spacing: i32,
    /// Space between a cell's edge and its content, on every side (`cellpadding`)
    pub padding: i32,
    /// Width of the outer border
    pub border: i32,
    /// Sides the outer border is drawn on
    pub frame: Frame,
    pub rules: Rules,
    /// Number of columns announced up front (`cols`), created before any cell arrives
    pub columns: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: Length::variable(),
            height: Length::variable(),
            spacing: 2,
            padding: 1,
            border: 0,
            frame: Frame::VOID,
            rules: Rules::None,
            columns: 0,
        }
    }
}

impl TableConfig {
    /// Set the border width the way the `border` attribute does: a visible border
    /// switches on the box frame and all rules, a zero border switches both off.
    pub fn set_border(&mut self, border: i32) {
        self.border = border.max(0);
        if self.border == 0 {
            self.frame = Frame::VOID;
            self.rules = Rules::None;
        } else {
            self.frame = Frame::BOX;
            self.rules = Rules::All;
        }
    }

    pub fn with_border(mut self, border: i32) -> Self {
        self.set_border(border);
        self
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing.max(0);
        self
    }

    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding.max(0);
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

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub(crate) fn left_border(&self) -> i32 {
        self.side_border(Frame::LHS)
    }

    pub(crate) fn right_border(&self) -> i32 {
        self.side_border(Frame::RHS)
    }

    pub(crate) fn top_border(&self) -> i32 {
        self.side_border(Frame::ABOVE)
    }

    pub(crate) fn bottom_border(&self) -> i32 {
        self.side_border(Frame::BELOW)
    }

    fn side_border(&self, side: Frame) -> i32 {
        if self.frame.contains(side) { self.border } else { 0 }
    }
}

#[cfg(test)]
impl TableConfig {
    /// Config without spacing, padding or border, so tests can reason in plain column widths
    pub fn for_testing() -> Self {
        Self {
            spacing: 0,
            padding: 0,
            ..Default::default()
        }
    }
}
