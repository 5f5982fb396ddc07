//! Container access
//!
//! The reader adapter contract and the in-memory container used for
//! manifests and tests.

pub mod memory;
pub mod source;
pub mod symbol_info;

pub use memory::{MemoryContainer, MemoryContainerBuilder};
pub use source::{ContainerReader, OpenContainer, RecordIter};
pub use symbol_info::{
    DomainRef, FileVersion, RawRecord, SymbolInfo, SymbolKind, VarType, UNIVERSE_NAME,
};
