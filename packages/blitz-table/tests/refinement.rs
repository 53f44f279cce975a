//! The measure/solve/layout protocol between a table and its cells

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use blitz_table::boxes::{BlockBox, BoxNode, InlineBox};
use blitz_table::{CellSpec, ContentWidths, LayoutBox, LayoutStatus, Table, TableConfig};
use common::content;
use mockall::mock;
use mockall::predicate::eq;

mock! {
    pub Content {}

    impl LayoutBox for Content {
        fn calc_min_max_width(&mut self) -> ContentWidths;
        fn set_available_width(&mut self, width: i32);
        fn layout(&mut self, deep: bool) -> LayoutStatus;
        fn width(&self) -> i32;
        fn height(&self) -> i32;
        fn baseline_offset(&self) -> Option<i32>;
        fn update_size(&mut self) -> LayoutStatus;
    }
}

fn plain() -> TableConfig {
    TableConfig::default().with_spacing(0).with_padding(0)
}

/// A mock that answers the geometry queries every layout makes
fn mock_content() -> MockContent {
    let mut mock = MockContent::new();
    mock.expect_height().return_const(10);
    mock.expect_width().return_const(0);
    mock.expect_baseline_offset().return_const(None::<i32>);
    mock
}

#[test]
fn test_unchanged_width_is_not_redistributed() {
    let mut mock = mock_content();
    mock.expect_calc_min_max_width()
        .times(1)
        .return_const(ContentWidths::new(10, 10));
    mock.expect_set_available_width()
        .with(eq(10))
        .times(1)
        .return_const(());

    let mut table = Table::new(plain());
    table.start_row();
    table.add_cell(CellSpec::new(), Box::new(mock));

    table.set_available_width(100);
    table.set_available_width(100);
}

#[test]
fn test_layout_twice_is_a_no_op() {
    let mut mock = mock_content();
    mock.expect_calc_min_max_width()
        .return_const(ContentWidths::new(10, 10));
    mock.expect_set_available_width().return_const(());
    mock.expect_layout()
        .with(eq(true))
        .times(1)
        .return_const(LayoutStatus::Done);

    let mut table = Table::new(plain());
    table.start_row();
    table.add_cell(CellSpec::new(), Box::new(mock));

    table.set_available_width(100);
    assert_eq!(table.layout(true), LayoutStatus::Done);
    let size = table.size();
    assert_eq!(table.layout(true), LayoutStatus::Done);
    assert_eq!(table.size(), size);
}

#[test]
fn test_stuck_cell_gets_one_retry() {
    // The content keeps asking for more room but never reports wider widths
    let mut mock = mock_content();
    mock.expect_calc_min_max_width()
        .return_const(ContentWidths::new(10, 10));
    mock.expect_set_available_width().return_const(());
    mock.expect_layout()
        .times(2)
        .return_const(LayoutStatus::NeedsResize);

    let mut table = Table::new(plain());
    table.start_row();
    table.add_cell(CellSpec::new(), Box::new(mock));

    table.set_available_width(100);
    assert_eq!(table.layout(true), LayoutStatus::Done);
    assert_eq!(table.width(), 10);
}

#[test]
fn test_growing_cell_is_relaid_until_it_fits() {
    // Every measurement reports 10px more; the content is satisfied on its fourth layout
    let measured = Arc::new(AtomicI32::new(0));
    let laid_out = Arc::new(AtomicI32::new(0));

    let mut mock = mock_content();
    let calls = measured.clone();
    mock.expect_calc_min_max_width().returning(move || {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        ContentWidths::fixed(10 * call)
    });
    mock.expect_set_available_width().return_const(());
    let calls = laid_out.clone();
    mock.expect_layout().returning(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) + 1 < 4 {
            LayoutStatus::NeedsResize
        } else {
            LayoutStatus::Done
        }
    });

    let mut table = Table::new(plain());
    table.start_row();
    table.add_cell(CellSpec::new(), Box::new(mock));

    table.set_available_width(1000);
    assert_eq!(table.layout(true), LayoutStatus::Done);

    assert_eq!(laid_out.load(Ordering::SeqCst), 4);
    assert_eq!(measured.load(Ordering::SeqCst), 5);
    assert_eq!(table.width(), 50);
}

#[test]
fn test_shallow_layout_leaves_cells_alone() {
    let mut mock = mock_content();
    mock.expect_calc_min_max_width()
        .return_const(ContentWidths::new(10, 10));
    mock.expect_set_available_width().return_const(());
    mock.expect_layout().never();

    let mut table = Table::new(plain());
    table.start_row();
    table.add_cell(CellSpec::new(), Box::new(mock));

    table.set_available_width(100);
    assert_eq!(table.layout(false), LayoutStatus::Done);
    assert_eq!(table.height(), 10);
}

#[test]
fn test_changed_cell_is_measured_again() {
    let mut table = Table::new(plain());
    table.start_row();
    let id = table.add_cell(
        CellSpec::new(),
        Box::new(InlineBox::new([20, 30], 5, 10, 8)),
    );
    table.set_available_width(500);
    table.layout(true);
    assert_eq!(table.width(), 55);

    // Swap in longer text: the cell re-measures and the table grows
    table
        .cell_mut(id)
        .unwrap()
        .set_content(Box::new(InlineBox::new([20, 30, 40], 5, 10, 8)));
    table.layout(true);
    assert_eq!(table.width(), 100);
}

#[test]
fn test_nested_table_in_cell() {
    common::init_tracing();

    let mut inner = Table::new(plain());
    inner.start_row();
    inner.add_cell(CellSpec::new(), content(30, 60));
    inner.add_cell(CellSpec::new(), content(20, 40));
    inner.close();

    let mut outer = Table::new(TableConfig::default());
    outer.start_row();
    let id = outer.add_cell(
        CellSpec::new(),
        Box::new(BlockBox::new().with_child(BoxNode::from(inner))),
    );
    outer.add_cell(CellSpec::new(), content(10, 10));
    outer.close();

    outer.set_available_width(1000);
    assert_eq!(outer.layout(true), LayoutStatus::Done);

    // The inner table is as wide as its max content
    let cell = outer.cell(id).unwrap();
    assert_eq!(cell.geometry().available_width, 100);
    assert_eq!(cell.content().width(), 100);
    assert_eq!(cell.content().height(), 10);
    assert_eq!(outer.min_width(), 2 + (50 + 2) + 2 + (10 + 2) + 2);
}

#[test]
fn test_nested_table_under_pressure() {
    let mut inner = Table::new(plain());
    inner.start_row();
    inner.add_cell(CellSpec::new(), content(30, 300));
    inner.add_cell(CellSpec::new(), content(20, 300));

    let mut outer = Table::new(plain());
    outer.start_row();
    outer.add_cell(CellSpec::new(), Box::new(BoxNode::from(inner)));
    outer.add_cell(CellSpec::new(), content(10, 300));

    outer.set_available_width(200);
    assert_eq!(outer.layout(true), LayoutStatus::Done);
    assert_eq!(outer.width(), 200);

    let widths: i32 = outer.act_col_width().iter().sum();
    assert_eq!(widths, 200);
    assert!(outer.act_col_width()[0] >= 50);
}
