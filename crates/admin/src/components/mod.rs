//! Reusable UI component types.

pub mod data_table;
