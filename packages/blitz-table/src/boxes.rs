//! Boxes a table cell can hold
//!
//! The table itself only talks to [`LayoutBox`]. These are the box kinds the engine
//! ships with, enough to put text, stacked blocks and nested tables into cells.

use blitz_traits::{ContentWidths, LayoutBox, LayoutStatus};

use crate::table::Table;

/// A box in a cell's content tree
#[derive(Debug)]
pub enum BoxNode {
    Block(BlockBox),
    Inline(InlineBox),
    Table(Box<Table>),
}

impl BoxNode {
    fn as_layout_box(&self) -> &dyn LayoutBox {
        match self {
            BoxNode::Block(block) => block,
            BoxNode::Inline(inline) => inline,
            BoxNode::Table(table) => table.as_ref(),
        }
    }

    fn as_layout_box_mut(&mut self) -> &mut dyn LayoutBox {
        match self {
            BoxNode::Block(block) => block,
            BoxNode::Inline(inline) => inline,
            BoxNode::Table(table) => table.as_mut(),
        }
    }
}

impl From<BlockBox> for BoxNode {
    fn from(block: BlockBox) -> Self {
        BoxNode::Block(block)
    }
}

impl From<InlineBox> for BoxNode {
    fn from(inline: InlineBox) -> Self {
        BoxNode::Inline(inline)
    }
}

impl From<Table> for BoxNode {
    fn from(table: Table) -> Self {
        BoxNode::Table(Box::new(table))
    }
}

impl LayoutBox for BoxNode {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        self.as_layout_box_mut().calc_min_max_width()
    }

    fn set_available_width(&mut self, width: i32) {
        self.as_layout_box_mut().set_available_width(width);
    }

    fn layout(&mut self, deep: bool) -> LayoutStatus {
        self.as_layout_box_mut().layout(deep)
    }

    fn width(&self) -> i32 {
        self.as_layout_box().width()
    }

    fn height(&self) -> i32 {
        self.as_layout_box().height()
    }

    fn baseline_offset(&self) -> Option<i32> {
        self.as_layout_box().baseline_offset()
    }

    fn update_size(&mut self) -> LayoutStatus {
        self.as_layout_box_mut().update_size()
    }
}

/// Children stacked top to bottom, each as wide as the block
#[derive(Debug, Default)]
pub struct BlockBox {
    children: Vec<BoxNode>,
    /// Top edge of every child after layout
    offsets: Vec<i32>,
    available_width: i32,
    width: i32,
    height: i32,
}

impl BlockBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, child: impl Into<BoxNode>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<BoxNode>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[BoxNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [BoxNode] {
        &mut self.children
    }

    pub fn child_offsets(&self) -> &[i32] {
        &self.offsets
    }
}

impl LayoutBox for BlockBox {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        let (min, max) = self
            .children
            .iter_mut()
            .map(LayoutBox::calc_min_max_width)
            .fold((0, 0), |(min, max), widths| {
                (min.max(widths.min), max.max(widths.max))
            });
        ContentWidths::new(min, max)
    }

    fn set_available_width(&mut self, width: i32) {
        self.available_width = width;
        for child in &mut self.children {
            child.set_available_width(width);
        }
    }

    fn layout(&mut self, deep: bool) -> LayoutStatus {
        let mut status = LayoutStatus::Done;
        let mut y = 0;
        let mut width = self.available_width;

        self.offsets.clear();
        for child in &mut self.children {
            if deep {
                status = status.merge(child.layout(deep));
            }
            self.offsets.push(y);
            y += child.height();
            width = width.max(child.width());
        }

        self.width = width;
        self.height = y;
        status
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn baseline_offset(&self) -> Option<i32> {
        self.children.iter().zip(&self.offsets).find_map(|(child, y)| {
            child.baseline_offset().map(|baseline| y + baseline)
        })
    }
}

/// A run of words wrapped greedily into lines of equal height.
///
/// Words are measured up front; the box never breaks inside a word.
#[derive(Debug, Clone, Default)]
pub struct InlineBox {
    words: Vec<i32>,
    space_width: i32,
    line_height: i32,
    /// Distance from the top of a line to its baseline
    ascent: i32,

    available_width: i32,
    /// Width of every line after layout
    lines: Vec<i32>,
}

impl InlineBox {
    pub fn new(
        words: impl IntoIterator<Item = i32>,
        space_width: i32,
        line_height: i32,
        ascent: i32,
    ) -> Self {
        Self {
            words: words.into_iter().map(|word| word.max(0)).collect(),
            space_width: space_width.max(0),
            line_height: line_height.max(0),
            ascent: ascent.clamp(0, line_height.max(0)),
            available_width: 0,
            lines: Vec::new(),
        }
    }

    /// Text in a monospace font: every character is `char_width` wide, a space included
    pub fn monospace(text: &str, char_width: i32, line_height: i32, ascent: i32) -> Self {
        let words = text
            .split_whitespace()
            .map(|word| word.chars().count() as i32 * char_width);
        Self::new(words, char_width, line_height, ascent)
    }

    /// Line widths from the last layout
    pub fn lines(&self) -> &[i32] {
        &self.lines
    }

    fn widest_word(&self) -> i32 {
        self.words.iter().copied().max().unwrap_or(0)
    }
}

impl LayoutBox for InlineBox {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        let spaces = self.words.len().saturating_sub(1) as i32 * self.space_width;
        let max = self.words.iter().sum::<i32>() + spaces;
        ContentWidths::new(self.widest_word(), max)
    }

    fn set_available_width(&mut self, width: i32) {
        self.available_width = width;
    }

    fn layout(&mut self, _deep: bool) -> LayoutStatus {
        self.lines.clear();
        let mut line: Option<i32> = None;

        for &word in &self.words {
            line = match line {
                Some(current) if current + self.space_width + word <= self.available_width => {
                    Some(current + self.space_width + word)
                }
                Some(current) => {
                    self.lines.push(current);
                    Some(word)
                }
                None => Some(word),
            };
        }
        self.lines.extend(line);

        if self.widest_word() > self.available_width {
            LayoutStatus::NeedsResize
        } else {
            LayoutStatus::Done
        }
    }

    fn width(&self) -> i32 {
        self.lines.iter().copied().max().unwrap_or(0)
    }

    fn height(&self) -> i32 {
        self.lines.len() as i32 * self.line_height
    }

    fn baseline_offset(&self) -> Option<i32> {
        (!self.lines.is_empty()).then_some(self.ascent)
    }
}
