//! Label and domain resolution
//!
//! Builds the universal set and resolves every symbol's declared domains to
//! shared, frozen [`Coordinate`]s.

pub mod coordinate;
pub mod domain;
pub mod universe;

pub use coordinate::Coordinate;
pub use domain::{DomainBinding, DomainResolver, ResolvedDomains};
pub use universe::{scan, SparseRecords, UniverseBuilder};
