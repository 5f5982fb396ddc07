//! In-memory container and its YAML manifest form
//!
//! A manifest lists the symbols of a container in file order:
//!
//! ```yaml
//! version: "GDX Library 24.0"
//! producer: "GAMS"
//! symbols:
//!   - name: s
//!     kind: set
//!     domain: ["*"]
//!     records: [[a], [b], [c]]
//!   - name: p
//!     kind: parameter
//!     domain: [s]
//!     records:
//!       - { keys: [a], value: 5.0 }
//! ```
//!
//! `dim` defaults to the length of `domain` and `record_count` to the number
//! of listed records. Both can be given explicitly to describe damaged files.

use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

use super::source::{ContainerReader, OpenContainer, RecordIter};
use super::symbol_info::{DomainRef, FileVersion, RawRecord, SymbolInfo, SymbolKind, VarType};
use crate::utils::ContainerError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContainerManifest {
    #[serde(default)]
    version: String,

    #[serde(default)]
    producer: String,

    /// Overrides the reported symbol count
    symbol_count: Option<usize>,

    #[serde(default)]
    symbols: Vec<SymbolManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SymbolManifest {
    name: String,

    kind: SymbolKind,

    #[serde(default)]
    domain: Vec<DomainRef>,

    dim: Option<usize>,

    #[serde(default)]
    description: String,

    #[serde(default)]
    var_type: VarType,

    alias_of: Option<String>,

    record_count: Option<usize>,

    #[serde(default)]
    records: Vec<RecordManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordManifest {
    Keys(Vec<String>),
    Full {
        keys: Vec<String>,
        #[serde(default = "yes")]
        value: f64,
        #[serde(default)]
        text: Option<String>,
    },
}

fn yes() -> f64 {
    1.0
}

impl From<RecordManifest> for RawRecord {
    fn from(record: RecordManifest) -> Self {
        match record {
            RecordManifest::Keys(keys) => RawRecord::element(keys),
            RecordManifest::Full { keys, value, text } => RawRecord { keys, value, text },
        }
    }
}

#[derive(Debug, Clone)]
struct MemorySymbol {
    info: SymbolInfo,
    records: Vec<RawRecord>,
}

/// Container held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    version: FileVersion,
    symbols: Vec<MemorySymbol>,
    reported_symbol_count: Option<usize>,
}

impl MemoryContainer {
    pub fn builder() -> MemoryContainerBuilder {
        MemoryContainerBuilder::default()
    }

    /// Parse a container manifest from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ContainerError> {
        let manifest: ContainerManifest =
            serde_yaml::from_str(yaml).map_err(|e| ContainerError::Parse(e.to_string()))?;

        let symbols = manifest
            .symbols
            .into_iter()
            .map(|s| {
                let records: Vec<RawRecord> = s.records.into_iter().map(RawRecord::from).collect();
                let info = SymbolInfo {
                    dim: s.dim.unwrap_or(s.domain.len()),
                    record_count: s.record_count.unwrap_or(records.len()),
                    name: s.name,
                    kind: s.kind,
                    description: s.description,
                    domain_refs: s.domain,
                    var_type: s.var_type,
                    alias_of: s.alias_of,
                };
                MemorySymbol { info, records }
            })
            .collect();

        Ok(Self {
            version: FileVersion {
                version: manifest.version,
                producer: manifest.producer,
            },
            symbols,
            reported_symbol_count: manifest.symbol_count,
        })
    }
}

impl ContainerReader for MemoryContainer {
    fn file_version(&self) -> FileVersion {
        self.version.clone()
    }

    fn symbol_count(&self) -> usize {
        self.reported_symbol_count.unwrap_or(self.symbols.len())
    }

    fn element_count(&self) -> usize {
        let labels: IndexSet<&str> = self
            .symbols
            .iter()
            .flat_map(|s| s.records.iter())
            .flat_map(|r| r.keys.iter().map(String::as_str))
            .collect();
        labels.len()
    }

    fn symbol_info(&self, index: usize) -> Result<SymbolInfo, ContainerError> {
        self.symbols
            .get(index)
            .map(|s| s.info.clone())
            .ok_or(ContainerError::SymbolIndex {
                index,
                count: self.symbols.len(),
            })
    }

    fn records(&mut self, index: usize) -> Result<RecordIter<'_>, ContainerError> {
        let count = self.symbols.len();
        let symbol = self
            .symbols
            .get(index)
            .ok_or(ContainerError::SymbolIndex { index, count })?;
        Ok(Box::new(symbol.records.iter().cloned().map(Ok)))
    }
}

impl OpenContainer for MemoryContainer {
    fn open(path: &Path) -> Result<Self, ContainerError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ContainerError::NotFound(path.to_path_buf()),
            _ => ContainerError::Io(e),
        })?;
        Self::from_yaml(&content)
    }
}

/// Incremental construction of a [`MemoryContainer`]
#[derive(Debug, Default)]
pub struct MemoryContainerBuilder {
    container: MemoryContainer,
}

impl MemoryContainerBuilder {
    pub fn version(mut self, version: impl Into<String>, producer: impl Into<String>) -> Self {
        self.container.version = FileVersion {
            version: version.into(),
            producer: producer.into(),
        };
        self
    }

    /// Append a symbol; its record count is set from `records`
    pub fn symbol(mut self, mut info: SymbolInfo, records: Vec<RawRecord>) -> Self {
        info.record_count = records.len();
        self.container.symbols.push(MemorySymbol { info, records });
        self
    }

    /// Append a symbol with its metadata kept verbatim
    pub fn raw_symbol(mut self, info: SymbolInfo, records: Vec<RawRecord>) -> Self {
        self.container.symbols.push(MemorySymbol { info, records });
        self
    }

    /// One-dimensional Set over the universe
    pub fn set(self, name: &str, elements: &[&str]) -> Self {
        let records = elements.iter().map(|e| RawRecord::element([*e])).collect();
        self.symbol(SymbolInfo::new(name, SymbolKind::Set, ["*"]), records)
    }

    /// Set declared over `domain`
    pub fn subset(self, name: &str, domain: &[&str], elements: &[&[&str]]) -> Self {
        let records = elements
            .iter()
            .map(|keys| RawRecord::element(keys.iter().copied()))
            .collect();
        self.symbol(SymbolInfo::new(name, SymbolKind::Set, domain.iter().copied()), records)
    }

    /// Parameter declared over `domain`
    pub fn parameter(self, name: &str, domain: &[&str], values: &[(&[&str], f64)]) -> Self {
        let records = values
            .iter()
            .map(|(keys, value)| RawRecord::new(keys.iter().copied(), *value))
            .collect();
        self.symbol(
            SymbolInfo::new(name, SymbolKind::Parameter, domain.iter().copied()),
            records,
        )
    }

    pub fn alias(self, name: &str, target: &str) -> Self {
        self.symbol(SymbolInfo::alias(name, target), Vec::new())
    }

    /// Report a symbol count different from the number of symbols
    pub fn reported_symbol_count(mut self, count: usize) -> Self {
        self.container.reported_symbol_count = Some(count);
        self
    }

    pub fn build(self) -> MemoryContainer {
        self.container
    }
}
