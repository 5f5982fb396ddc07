//! Universal set resolution
//!
//! One pass over the records of every symbol collects each label in
//! first-occurrence order. The pass also keeps the sparse records, checked
//! for arity and count, so later stages never go back to the container.
//! The resulting universe is frozen behind an `Arc`.

use std::sync::Arc;

use tracing::debug;

use super::coordinate::Coordinate;
use crate::catalog::{Catalog, SymbolId};
use crate::container::{ContainerReader, RawRecord, SymbolKind, UNIVERSE_NAME};
use crate::utils::{FormatError, Result};

/// Sparse records of every symbol, indexed by [`SymbolId`]
#[derive(Debug, Clone, Default)]
pub struct SparseRecords {
    records: Vec<Vec<RawRecord>>,
}

impl SparseRecords {
    #[inline]
    pub fn get(&self, id: SymbolId) -> &[RawRecord] {
        &self.records[id.0]
    }
}

/// Mutable phase of the universe; frozen by [`UniverseBuilder::freeze`]
#[derive(Debug)]
pub struct UniverseBuilder {
    labels: Coordinate,
}

impl Default for UniverseBuilder {
    fn default() -> Self {
        Self {
            labels: Coordinate::new(UNIVERSE_NAME),
        }
    }
}

impl UniverseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str) {
        if !self.labels.contains(label) {
            self.labels.push(label, None);
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn freeze(self) -> Arc<Coordinate> {
        Arc::new(self.labels)
    }
}

/// Read every symbol's records once, building the universe on the way
pub fn scan<R: ContainerReader + ?Sized>(
    reader: &mut R,
    catalog: &Catalog,
) -> Result<(Arc<Coordinate>, SparseRecords)> {
    let mut universe = UniverseBuilder::new();
    let mut records = Vec::with_capacity(catalog.len());

    for symbol in catalog.iter() {
        if symbol.kind == SymbolKind::Alias {
            records.push(Vec::new());
            continue;
        }

        let mut symbol_records = Vec::with_capacity(symbol.record_count);
        for (n, record) in reader.records(symbol.id.index())?.enumerate() {
            let record = record?;
            if record.keys.len() != symbol.dim {
                return Err(FormatError::RecordArity {
                    symbol: symbol.name.clone(),
                    record: n,
                    expected: symbol.dim,
                    actual: record.keys.len(),
                }
                .into());
            }
            for label in &record.keys {
                universe.insert(label);
            }
            symbol_records.push(record);
        }

        if symbol_records.len() != symbol.record_count {
            return Err(FormatError::RecordCountMismatch {
                symbol: symbol.name.clone(),
                declared: symbol.record_count,
                actual: symbol_records.len(),
            }
            .into());
        }

        debug!(
            "Scanned {} records of '{}', universe now {} labels",
            symbol_records.len(),
            symbol.name,
            universe.len()
        );
        records.push(symbol_records);
    }

    Ok((universe.freeze(), SparseRecords { records }))
}
