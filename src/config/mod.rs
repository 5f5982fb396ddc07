//! Configuration module

pub mod load_options;

pub use load_options::{LoadOptions, DEFAULT_MAX_DENSE_ELEMENTS};
