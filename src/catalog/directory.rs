//! Symbol directory
//!
//! Enumerates every symbol of an open container, in file order, and records
//! its declared metadata. Domain references are kept verbatim: a symbol may
//! be declared over a Set that appears later, or over itself, so resolution
//! happens in a later stage.

use indexmap::IndexMap;
use tracing::debug;

use super::symbol::{Symbol, SymbolId};
use crate::container::{ContainerReader, SymbolKind, UNIVERSE_NAME};
use crate::utils::{ContainerError, FormatError};

/// Description prefix GDX writes for aliases
const ALIAS_PREFIX: &str = "Aliased with ";

/// Ordered catalog of symbols, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    symbols: Vec<Symbol>,
    by_name: IndexMap<String, SymbolId>,
}

impl Catalog {
    /// Enumerate all symbols of `reader`
    pub fn build<R: ContainerReader + ?Sized>(reader: &R) -> Result<Self, FormatError> {
        let reported = reader.symbol_count();
        let mut catalog = Catalog {
            symbols: Vec::with_capacity(reported),
            by_name: IndexMap::with_capacity(reported),
        };

        for index in 0..reported {
            let info = match reader.symbol_info(index) {
                Ok(info) => info,
                Err(ContainerError::SymbolIndex { .. }) => {
                    return Err(FormatError::SymbolCount {
                        reported,
                        enumerated: index,
                    });
                }
                Err(e) => {
                    return Err(FormatError::MalformedSymbol {
                        index,
                        reason: e.to_string(),
                    });
                }
            };

            if info.name.is_empty() || info.name == UNIVERSE_NAME {
                return Err(FormatError::MalformedSymbol {
                    index,
                    reason: format!("invalid symbol name '{}'", info.name),
                });
            }
            if info.kind != SymbolKind::Alias && info.domain_refs.len() != info.dim {
                return Err(FormatError::MalformedSymbol {
                    index,
                    reason: format!(
                        "'{}' has dimension {} but {} domain entries",
                        info.name,
                        info.dim,
                        info.domain_refs.len()
                    ),
                });
            }
            if catalog.by_name.contains_key(&info.name) {
                return Err(FormatError::DuplicateSymbol {
                    name: info.name,
                    index,
                });
            }

            let alias_of = if info.kind == SymbolKind::Alias {
                let target = info
                    .alias_of
                    .clone()
                    .or_else(|| info.description.strip_prefix(ALIAS_PREFIX).map(str::to_string))
                    .ok_or_else(|| FormatError::MalformedSymbol {
                        index,
                        reason: format!("alias '{}' has no target", info.name),
                    })?;
                Some(target)
            } else {
                None
            };

            debug!(
                "Symbol {}: {} {}({}) with {} records",
                index,
                info.kind,
                info.name,
                info.domain_refs.iter().map(|d| d.as_str()).collect::<Vec<_>>().join(","),
                info.record_count
            );

            let id = SymbolId(index);
            catalog.by_name.insert(info.name.clone(), id);
            catalog.symbols.push(Symbol::from_info(id, info, alias_of));
        }

        Ok(catalog)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Look up a symbol handle by name
    #[inline]
    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.id(name).map(|id| &self.symbols[id.0])
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    #[inline]
    pub fn by_index(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    /// Symbols in container order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbol names in container order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Follow alias links to the first non-alias symbol
    ///
    /// Returns `Ok(None)` if the chain ends at an unknown name.
    pub fn dealias(&self, id: SymbolId) -> Result<Option<SymbolId>, FormatError> {
        let mut current = id;
        let mut chain = vec![self.symbol(id).name.clone()];

        while let Some(target) = &self.symbol(current).alias_of {
            let Some(next) = self.id(target) else {
                return Ok(None);
            };
            if chain.iter().any(|n| n == target) {
                chain.push(target.clone());
                return Err(FormatError::DomainCycle {
                    symbol: self.symbol(id).name.clone(),
                    chain,
                });
            }
            chain.push(target.clone());
            current = next;
        }

        Ok(Some(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{DomainRef, MemoryContainer, SymbolInfo};

    #[test]
    fn test_build_in_container_order() {
        let container = MemoryContainer::builder()
            .set("s", &["a", "b"])
            .parameter("p", &["s"], &[(&["a"], 1.0)])
            .alias("s_", "s")
            .build();

        let catalog = Catalog::build(&container).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["s", "p", "s_"]);
        assert_eq!(catalog.id("p"), Some(SymbolId(1)));
        assert_eq!(catalog.by_index(2).unwrap().alias_of.as_deref(), Some("s"));
        assert_eq!(catalog.get("p").unwrap().domain_refs, vec![DomainRef::named("s")]);
    }

    #[test]
    fn test_forward_domain_kept_verbatim() {
        let container = MemoryContainer::builder()
            .parameter("p", &["later"], &[])
            .set("later", &["a"])
            .build();

        let catalog = Catalog::build(&container).unwrap();
        assert_eq!(catalog.get("p").unwrap().domain_refs, vec![DomainRef::named("later")]);
    }

    #[test]
    fn test_inconsistent_symbol_count() {
        let container = MemoryContainer::builder()
            .set("s", &["a"])
            .reported_symbol_count(3)
            .build();

        let err = Catalog::build(&container).unwrap_err();
        assert_eq!(
            err,
            FormatError::SymbolCount {
                reported: 3,
                enumerated: 1
            }
        );
    }

    #[test]
    fn test_dimension_mismatch_names_index() {
        let mut info = SymbolInfo::new("p", SymbolKind::Parameter, ["*"]);
        info.dim = 2;
        let container = MemoryContainer::builder()
            .set("s", &["a"])
            .symbol(info, Vec::new())
            .build();

        let err = Catalog::build(&container).unwrap_err();
        assert!(matches!(err, FormatError::MalformedSymbol { index: 1, .. }));
    }

    #[test]
    fn test_duplicate_name() {
        let container = MemoryContainer::builder()
            .set("s", &["a"])
            .set("s", &["b"])
            .build();

        let err = Catalog::build(&container).unwrap_err();
        assert!(matches!(err, FormatError::DuplicateSymbol { index: 1, .. }));
    }

    #[test]
    fn test_alias_target_from_description() {
        let mut info = SymbolInfo::new("t_", SymbolKind::Alias, Vec::<DomainRef>::new());
        info.description = "Aliased with t".to_string();
        let container = MemoryContainer::builder()
            .set("t", &["r"])
            .symbol(info, Vec::new())
            .build();

        let catalog = Catalog::build(&container).unwrap();
        assert_eq!(catalog.get("t_").unwrap().alias_of.as_deref(), Some("t"));
        assert_eq!(catalog.dealias(SymbolId(1)).unwrap(), Some(SymbolId(0)));
    }

    #[test]
    fn test_alias_cycle() {
        let container = MemoryContainer::builder()
            .alias("a", "b")
            .alias("b", "a")
            .build();

        let catalog = Catalog::build(&container).unwrap();
        assert!(matches!(
            catalog.dealias(SymbolId(0)),
            Err(FormatError::DomainCycle { .. })
        ));
    }
}
