//! Rubric definition and read-only lookups
//!
//! A rubric is a grid of criteria (rows) against achievement levels
//! (columns). Content JSON is parsed once into a [`RubricModel`]; nothing
//! mutates it afterwards.
//!
//! # Module Structure
//!
//! - `id` - identifier normalization (numeric and string ids compare equal)
//! - `model` - definition types, `find_by_key`, text lookups

mod id;
mod model;

pub use id::ItemId;
pub use model::{Column, Row, RubricModel};
