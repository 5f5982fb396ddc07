//! gdx-reader library
//!
//! Read-only loader for GAMS GDX containers. Symbols are materialized as dense
//! arrays indexed by labeled coordinates, with every dimension bound to the
//! ordered elements of its declared domain Set.
//!
//! ```no_run
//! use gdx_reader::{load, LoadOptions};
//!
//! let data = load("tests.yaml", &LoadOptions::default())?;
//! let p1 = data.get("p1").and_then(|v| v.as_array().cloned());
//! # Ok::<(), gdx_reader::GdxError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod container;
pub mod dataset;
pub mod resolve;
pub mod utils;

pub use config::LoadOptions;
pub use dataset::{load, load_from, load_with, Dataset, LabeledArray, Value};
pub use utils::{ConfigError, ContainerError, FormatError, GdxError, LoadWarning, Result};
