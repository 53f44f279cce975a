//! HTML table layout for Blitz
//!
//! This crate lays out HTML tables: a grid of cells with row and column spans, columns
//! sized by fixed, percent, relative (`*`) and automatic widths, and rows stacked from
//! the heights of the cells that end in them. It is driven incrementally, the way a
//! parser produces a table:
//!
//!  - build a [`Table`] from a [`TableConfig`] (see [`TableConfig::from_attributes`]),
//!  - declare columns with [`Table::add_column`] / [`Table::add_column_group`],
//!  - add rows with [`Table::start_row`] and cells with [`Table::add_cell`],
//!  - [`Table::close`] it, hand it a width and [`Table::layout`] it.
//!
//! Cell contents are opaque: anything implementing [`LayoutBox`] can go in a cell,
//! including another [`Table`]. The [`boxes`] module has simple text and block boxes.
//!
//! Layout never fails. Malformed attributes fall back to their defaults and every
//! computation is clamped; [`TableError`] only reports API misuse.

// ## Feature flags
//  - `default`: Enables the features listed below.
//  - `tracing`: Enables tracing support.

pub mod attrs;
pub mod boxes;
mod cell;
mod col_info;
mod config;
mod error;
pub mod grid;
mod length;
pub mod rows;
pub mod solver;
mod table;

pub use blitz_traits::{ContentWidths, LayoutBox, LayoutStatus};
pub use cell::{Cell, CellGeometry, CellId, CellSpec, VerticalAlign};
pub use col_info::{ColInfo, ColInfoTable, ColumnDecl, ColumnGroupDecl};
pub use config::{Frame, Rules, TableConfig};
pub use error::{LengthParseError, TableError, TableResult};
pub use length::{Length, LengthKind};
pub use table::{LayoutState, Table};
