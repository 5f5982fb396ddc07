//! Dataset materialization and access
//!
//! Turns resolved symbols into dense labeled arrays and assembles them into
//! a [`Dataset`].

pub mod array;
mod assemble;
pub mod dense;
pub mod gdx_dataset;
pub mod loader;

pub use array::{CellValue, DenseData, LabeledArray, LazyArray};
pub use dense::MaterializePlan;
pub use gdx_dataset::{Dataset, FileAttrs, Value};
pub use loader::{load, load_from, load_with};
