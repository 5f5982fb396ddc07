//! Catalog entries

use std::fmt;

use crate::container::{DomainRef, SymbolInfo, SymbolKind, VarType};

/// Arena handle of a symbol: its position in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable metadata of one container symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub dim: usize,
    pub kind: SymbolKind,
    pub record_count: usize,
    pub description: String,
    /// Declared domains, unresolved
    pub domain_refs: Vec<DomainRef>,
    pub var_type: VarType,
    /// Alias target name (aliases only)
    pub alias_of: Option<String>,
}

impl Symbol {
    pub(crate) fn from_info(id: SymbolId, info: SymbolInfo, alias_of: Option<String>) -> Self {
        Self {
            id,
            name: info.name,
            dim: info.dim,
            kind: info.kind,
            record_count: info.record_count,
            description: info.description,
            domain_refs: info.domain_refs,
            var_type: info.var_type,
            alias_of,
        }
    }

    /// One-dimensional Set, usable as a coordinate
    #[inline]
    pub fn is_one_dim_set(&self) -> bool {
        self.kind == SymbolKind::Set && self.dim == 1
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dim == 0
    }

    /// Kind label used in summaries, e.g. "scalar parameter" or "positive variable"
    pub fn kind_label(&self) -> String {
        match self.kind {
            SymbolKind::Parameter if self.dim == 0 => "scalar parameter".to_string(),
            SymbolKind::Variable => format!("{} variable", self.var_type.as_str()),
            kind => kind.as_str().to_string(),
        }
    }

    /// Declared domain as written, e.g. "s,*"
    pub fn domain_string(&self) -> String {
        self.domain_refs
            .iter()
            .map(DomainRef::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
