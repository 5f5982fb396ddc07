//! Reader adapter contract
//!
//! The loader never decodes container bytes itself. It talks to an
//! implementation of [`ContainerReader`], which can be backed by:
//! - a binding to the vendor GDX library
//! - a native decoder for the binary format
//! - an in-memory container ([`super::MemoryContainer`])
//!
//! Dropping the reader closes the underlying handle.

use std::path::Path;

use super::symbol_info::{FileVersion, RawRecord, SymbolInfo};
use crate::utils::ContainerError;

/// Lazy, finite, single-pass record sequence of one symbol
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<RawRecord, ContainerError>> + 'a>;

/// Low-level read API of an open container
pub trait ContainerReader {
    /// Format version and producer of the open file
    fn file_version(&self) -> FileVersion;

    /// Number of symbols, excluding the universe
    fn symbol_count(&self) -> usize;

    /// Size of the container's unique element table (informational)
    fn element_count(&self) -> usize;

    /// Metadata of the symbol at `index` (0-based)
    ///
    /// # Errors
    /// `ContainerError::SymbolIndex` if `index` is past the last symbol
    fn symbol_info(&self, index: usize) -> Result<SymbolInfo, ContainerError>;

    /// Start reading the records of the symbol at `index`
    ///
    /// Each call restarts the sequence from the first record.
    fn records(&mut self, index: usize) -> Result<RecordIter<'_>, ContainerError>;
}

/// Readers that can be opened from a path
pub trait OpenContainer: ContainerReader + Sized {
    fn open(path: &Path) -> Result<Self, ContainerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SymbolKind;

    /// Reader that produces `n` single-record parameters
    struct CountingReader {
        n: usize,
        opened: usize,
    }

    impl ContainerReader for CountingReader {
        fn file_version(&self) -> FileVersion {
            FileVersion::default()
        }

        fn symbol_count(&self) -> usize {
            self.n
        }

        fn element_count(&self) -> usize {
            self.n
        }

        fn symbol_info(&self, index: usize) -> Result<SymbolInfo, ContainerError> {
            if index >= self.n {
                return Err(ContainerError::SymbolIndex {
                    index,
                    count: self.n,
                });
            }
            let mut info = SymbolInfo::new(format!("p{}", index), SymbolKind::Parameter, ["*"]);
            info.record_count = 1;
            Ok(info)
        }

        fn records(&mut self, index: usize) -> Result<RecordIter<'_>, ContainerError> {
            self.opened += 1;
            let record = RawRecord::new([format!("e{}", index)], index as f64);
            Ok(Box::new(std::iter::once(Ok(record))))
        }
    }

    #[test]
    fn test_records_are_restartable() {
        let mut reader = CountingReader { n: 3, opened: 0 };

        let first: Vec<_> = reader.records(2).unwrap().collect();
        let second: Vec<_> = reader.records(2).unwrap().collect();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(reader.opened, 2);
        assert_eq!(second[0].as_ref().unwrap().keys, vec!["e2".to_string()]);
    }

    #[test]
    fn test_symbol_index_out_of_bounds() {
        let reader = CountingReader { n: 1, opened: 0 };
        assert!(reader.symbol_info(0).is_ok());
        assert!(matches!(
            reader.symbol_info(1),
            Err(ContainerError::SymbolIndex { index: 1, count: 1 })
        ));
    }
}
