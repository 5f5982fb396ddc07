//! Symbol catalog

pub mod directory;
pub mod symbol;

pub use directory::Catalog;
pub use symbol::{Symbol, SymbolId};
