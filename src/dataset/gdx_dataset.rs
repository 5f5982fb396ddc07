//! Loaded dataset

use std::sync::Arc;

use super::array::{LabeledArray, LazyArray};
use crate::catalog::{Catalog, Symbol, SymbolId};
use crate::container::{SymbolKind, UNIVERSE_NAME};
use crate::resolve::{Coordinate, ResolvedDomains};
use crate::utils::{FormatError, LoadWarning};

/// File-level attributes reported by the container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttrs {
    pub version: String,
    pub producer: String,
    pub symbol_count: usize,
    pub element_count: usize,
}

/// Stored form of a loaded symbol
///
/// Aliases hold a clone of their target's entry, so both names share the
/// same `Arc`.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Coordinate(Arc<Coordinate>),
    Scalar(f64),
    Array(Arc<LazyArray>),
}

/// Borrowed view of a loaded symbol
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    /// One-dimensional Set, exposed as an ordered coordinate
    Coordinate(&'a Arc<Coordinate>),
    /// Zero-dimensional Parameter or Variable
    Scalar(f64),
    /// Dense array over the resolved domains
    Array(&'a Arc<LabeledArray>),
}

impl<'a> Value<'a> {
    pub fn as_coordinate(&self) -> Option<&'a Arc<Coordinate>> {
        match self {
            Value::Coordinate(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&'a Arc<LabeledArray>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// Symbols of one container, materialized over their resolved domains
///
/// The dataset owns no handle to the container; everything is resolved at
/// load time. In lazy mode array allocation happens on first access to each
/// array, which is safe from any thread.
#[derive(Debug)]
pub struct Dataset {
    attrs: FileAttrs,
    catalog: Catalog,
    universe: Arc<Coordinate>,
    domains: ResolvedDomains,
    entries: Vec<Option<Entry>>,
    warnings: Vec<LoadWarning>,
}

impl Dataset {
    pub(crate) fn new(
        attrs: FileAttrs,
        catalog: Catalog,
        universe: Arc<Coordinate>,
        domains: ResolvedDomains,
        entries: Vec<Option<Entry>>,
        warnings: Vec<LoadWarning>,
    ) -> Self {
        Self {
            attrs,
            catalog,
            universe,
            domains,
            entries,
            warnings,
        }
    }

    /// Look up a loaded symbol; `"*"` returns the universe
    pub fn get(&self, name: &str) -> Option<Value<'_>> {
        if name == UNIVERSE_NAME {
            return Some(Value::Coordinate(&self.universe));
        }
        let id = self.catalog.id(name)?;
        self.value(id)
    }

    /// Look up a loaded symbol by its container index
    pub fn get_by_index(&self, index: usize) -> Option<Value<'_>> {
        let symbol = self.catalog.by_index(index)?;
        self.value(symbol.id)
    }

    fn value(&self, id: SymbolId) -> Option<Value<'_>> {
        Some(match self.entries[id.index()].as_ref()? {
            Entry::Coordinate(c) => Value::Coordinate(c),
            Entry::Scalar(v) => Value::Scalar(*v),
            Entry::Array(a) => Value::Array(a.get()),
        })
    }

    /// Whether `name` was loaded (skipped equations and their aliases are not)
    pub fn contains(&self, name: &str) -> bool {
        name == UNIVERSE_NAME
            || self
                .catalog
                .id(name)
                .is_some_and(|id| self.entries[id.index()].is_some())
    }

    /// Names of the loaded symbols in container order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.catalog
            .iter()
            .filter(|s| self.entries[s.id.index()].is_some())
            .map(|s| s.name.as_str())
    }

    #[inline]
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.catalog.get(name)
    }

    /// Every symbol listed by the container, loaded or not
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.catalog.iter()
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn universe(&self) -> &Arc<Coordinate> {
        &self.universe
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.catalog.get(name).map(|s| s.description.as_str())
    }

    /// Explanatory text attached to an element of a one-dimensional Set
    pub fn element_text(&self, name: &str, label: &str) -> Option<&str> {
        let id = self.catalog.id(name)?;
        let target = self.catalog.dealias(id).ok()??;
        self.domains.set_coordinate(target)?.text(label)
    }

    fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.catalog.iter().filter(move |s| s.kind == kind)
    }

    pub fn sets(&self) -> impl Iterator<Item = &Symbol> {
        self.of_kind(SymbolKind::Set)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Symbol> {
        self.of_kind(SymbolKind::Parameter)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.of_kind(SymbolKind::Variable)
    }

    /// Name of the symbol an alias ultimately refers to
    ///
    /// Non-aliases map to themselves. Unknown names give `Ok(None)`.
    pub fn dealias(&self, name: &str) -> Result<Option<&str>, FormatError> {
        let Some(id) = self.catalog.id(name) else {
            return Ok(None);
        };
        Ok(self
            .catalog
            .dealias(id)?
            .map(|target| self.catalog.symbol(target).name.as_str()))
    }

    /// Domain names as declared in the container
    pub fn declared_domain(&self, name: &str) -> Option<Vec<&str>> {
        let symbol = self.catalog.get(name)?;
        Some(symbol.domain_refs.iter().map(|d| d.as_str()).collect())
    }

    /// Coordinate names each dimension was resolved to
    pub fn resolved_domain(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.catalog.id(name)?;
        let target = self.catalog.dealias(id).ok()??;
        let binding = self.domains.binding(target)?;
        Some(binding.axes.iter().map(|a| a.name()).collect())
    }

    /// One-line summary, e.g. `parameter p(s) - 1 records: Example`
    pub fn info(&self, name: &str) -> Option<String> {
        let symbol = self.catalog.get(name)?;
        let (kind, records, domain) = match self.dealias(name).ok().flatten() {
            Some(target) if symbol.kind == SymbolKind::Alias => {
                let target = self.catalog.get(target)?;
                (
                    format!("alias of {}", target.name),
                    target.record_count,
                    target.domain_string(),
                )
            }
            _ => (symbol.kind_label(), symbol.record_count, symbol.domain_string()),
        };
        let head = if domain.is_empty() {
            format!("{} {}", kind, symbol.name)
        } else {
            format!("{} {}({})", kind, symbol.name, domain)
        };
        Some(format!("{} - {} records: {}", head, records, symbol.description))
    }

    /// Non-fatal conditions met while loading
    #[inline]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    #[inline]
    pub fn attrs(&self) -> &FileAttrs {
        &self.attrs
    }

    /// Whether the dense array of `name` has been allocated
    ///
    /// Coordinates and scalars are always materialized.
    pub fn is_materialized(&self, name: &str) -> bool {
        let Some(id) = self.catalog.id(name) else {
            return false;
        };
        match &self.entries[id.index()] {
            Some(Entry::Array(a)) => a.is_materialized(),
            Some(_) => true,
            None => false,
        }
    }
}
