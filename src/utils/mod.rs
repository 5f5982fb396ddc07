//! Utility modules

pub mod error;

pub use error::{ConfigError, ContainerError, FormatError, GdxError, LoadWarning, Result};
