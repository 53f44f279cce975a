//! Helpers shared by the integration tests

#![allow(dead_code)]

use blitz_table::{ContentWidths, LayoutBox, LayoutStatus};

/// Content with fixed intrinsic widths and a fixed height, as wide as it is allowed to be
#[derive(Debug, Clone)]
pub struct FixedContent {
    pub widths: ContentWidths,
    pub height: i32,
    pub baseline: Option<i32>,
    pub available_width: i32,
    pub layouts: usize,
}

impl FixedContent {
    pub fn new(min: i32, max: i32, height: i32) -> Self {
        Self {
            widths: ContentWidths::new(min, max),
            height,
            baseline: None,
            available_width: 0,
            layouts: 0,
        }
    }

    pub fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn boxed(self) -> Box<dyn LayoutBox> {
        Box::new(self)
    }
}

impl LayoutBox for FixedContent {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        self.widths
    }

    fn set_available_width(&mut self, width: i32) {
        self.available_width = width;
    }

    fn layout(&mut self, _deep: bool) -> LayoutStatus {
        self.layouts += 1;
        if self.widths.min > self.available_width {
            LayoutStatus::NeedsResize
        } else {
            LayoutStatus::Done
        }
    }

    fn width(&self) -> i32 {
        self.available_width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn baseline_offset(&self) -> Option<i32> {
        self.baseline
    }
}

pub fn content(min: i32, max: i32) -> Box<dyn LayoutBox> {
    FixedContent::new(min, max, 10).boxed()
}

pub fn tall(min: i32, max: i32, height: i32) -> Box<dyn LayoutBox> {
    FixedContent::new(min, max, height).boxed()
}

/// Route engine logs to the test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
