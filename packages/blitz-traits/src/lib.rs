//! Shared layout traits and types for Blitz
//!
//! The table engine in [`blitz-table`](https://docs.rs/blitz-table) lays out boxes it knows nothing about:
//! cell contents, captions and nested tables are all driven through the [`LayoutBox`](layout::LayoutBox)
//! capability defined here. Any box tree that wants to host tables (or be hosted by one) implements it.

pub mod layout;

pub use layout::{ContentWidths, LayoutBox, LayoutStatus};
