//! Invariants that hold for any table, checked over generated tables

mod common;

use std::collections::HashSet;

use blitz_table::{CellSpec, Length, Table, TableConfig, VerticalAlign};
use common::tall;
use fastrand::Rng;

fn random_width(rng: &mut Rng) -> Length {
    match rng.i32(0..6) {
        0 => Length::fixed(rng.i32(0..120)),
        1 => Length::percent(rng.i32(0..130)),
        2 => Length::relative(rng.i32(0..4)),
        _ => Length::variable(),
    }
}

fn random_table(seed: u64) -> Table {
    let mut rng = Rng::with_seed(seed);
    let config = TableConfig::default()
        .with_spacing(rng.i32(0..4))
        .with_padding(rng.i32(0..3))
        .with_border(rng.i32(0..3))
        .with_width(match rng.i32(0..3) {
            0 => Length::fixed(100 + rng.i32(0..400)),
            1 => Length::percent(20 + rng.i32(0..80)),
            _ => Length::variable(),
        });

    let mut table = Table::new(config);
    for _ in 0..1 + rng.i32(0..5) {
        table.start_row();
        for _ in 0..1 + rng.i32(0..5) {
            let min = rng.i32(0..60);
            let max = min + rng.i32(0..120);
            let valign = match rng.i32(0..4) {
                0 => VerticalAlign::Top,
                1 => VerticalAlign::Bottom,
                2 => VerticalAlign::Baseline,
                _ => VerticalAlign::Middle,
            };
            let spec = CellSpec::new()
                .with_col_span(1 + rng.i32(0..3))
                .with_row_span(1 + rng.i32(0..2))
                .with_width(random_width(&mut rng))
                .with_valign(valign)
                .with_no_wrap(rng.i32(0..5) == 0);
            table.add_cell(spec, tall(min, max, 5 + rng.i32(0..40)));
        }
    }
    table.close();
    table
}

const SEEDS: std::ops::Range<u64> = 1..200;

#[test]
fn test_column_widths_are_consistent() {
    for seed in SEEDS {
        let mut table = random_table(seed);
        let available = 50 + (seed as i32 * 37) % 900;
        table.set_available_width(available);
        table.layout(true);

        let min = table.col_min_width().to_vec();
        let max = table.col_max_width().to_vec();
        let act = table.act_col_width().to_vec();
        let pos = table.column_pos().to_vec();
        let spacing = table.config().spacing;

        for col in 0..table.total_cols() {
            assert!(min[col] >= 0, "seed {seed}: negative min in column {col}");
            assert!(min[col] <= max[col], "seed {seed}: min > max in column {col}");
            assert!(act[col] >= min[col], "seed {seed}: column {col} below its min");
            assert_eq!(pos[col + 1] - pos[col], act[col] + spacing, "seed {seed}");
        }

        assert!(table.width() >= table.min_width(), "seed {seed}");
        assert!(
            pos[table.total_cols()] <= table.width(),
            "seed {seed}: columns overflow the table"
        );
    }
}

#[test]
fn test_every_cell_is_visited_once() {
    for seed in SEEDS {
        let table = random_table(seed);
        let visited: Vec<_> = table.grid().distinct_cells().map(|(_, _, id)| id).collect();
        let unique: HashSet<_> = visited.iter().copied().collect();

        assert_eq!(visited.len(), unique.len(), "seed {seed}");
        assert_eq!(visited.len(), table.cells().count(), "seed {seed}");
    }
}

#[test]
fn test_rows_and_cells_stay_inside_the_table() {
    for seed in SEEDS {
        let mut table = random_table(seed);
        table.set_available_width(600);
        table.layout(true);

        let rows = table.row_heights();
        assert!(rows.windows(2).all(|pair| pair[0] <= pair[1]), "seed {seed}");

        for (_, cell) in table.cells() {
            let geometry = cell.geometry();
            assert!(geometry.top_extra >= 0, "seed {seed}");
            assert!(geometry.bottom_extra >= 0, "seed {seed}");
            assert!(geometry.size.width >= 0, "seed {seed}");
            assert!(
                geometry.position.y + geometry.size.height <= table.height(),
                "seed {seed}: cell below the table"
            );
        }
    }
}

#[test]
fn test_layout_is_idempotent() {
    for seed in SEEDS {
        let mut table = random_table(seed);
        table.set_available_width(400);
        table.layout(true);
        let first: Vec<_> = table.cells().map(|(_, cell)| *cell.geometry()).collect();
        let size = table.size();

        // Force a full recomputation with the same inputs
        table.set_available_width(401);
        table.set_available_width(400);
        table.layout(true);
        let second: Vec<_> = table.cells().map(|(_, cell)| *cell.geometry()).collect();

        assert_eq!(first, second, "seed {seed}");
        assert_eq!(size, table.size(), "seed {seed}");
    }
}
