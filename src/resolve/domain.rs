//! Domain resolution
//!
//! Turns each declared domain reference into a concrete, ordered axis:
//!
//! 1. A reference to a one-dimensional Set (directly or through aliases) uses
//!    that Set's element order.
//! 2. The universe marker, an unknown name, or a symbol that is not a
//!    one-dimensional Set falls back to the universe.
//! 3. A reference to the symbol itself reuses its first dimension.
//!
//! Every named reference is walked up its parent chain before use; a chain
//! that revisits a symbol is a [`FormatError::DomainCycle`]. The walk is
//! iterative and bounded by the catalog size.

use std::sync::Arc;

use tracing::debug;

use super::coordinate::Coordinate;
use super::universe::SparseRecords;
use crate::catalog::{Catalog, Symbol, SymbolId};
use crate::config::LoadOptions;
use crate::container::{DomainRef, SymbolKind};
use crate::utils::FormatError;

/// Resolved axes of one symbol
#[derive(Debug, Clone)]
pub struct DomainBinding {
    pub axes: Vec<Arc<Coordinate>>,
    /// Product of axis lengths
    pub dense_size: u128,
}

impl DomainBinding {
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.len()).collect()
    }
}

/// Output of domain resolution, indexed by [`SymbolId`]
#[derive(Debug, Clone)]
pub struct ResolvedDomains {
    set_coords: Vec<Option<Arc<Coordinate>>>,
    bindings: Vec<Option<DomainBinding>>,
}

impl ResolvedDomains {
    /// Coordinate of a one-dimensional Set
    #[inline]
    pub fn set_coordinate(&self, id: SymbolId) -> Option<&Arc<Coordinate>> {
        self.set_coords[id.0].as_ref()
    }

    /// Axes of a symbol that is materialized over a domain
    #[inline]
    pub fn binding(&self, id: SymbolId) -> Option<&DomainBinding> {
        self.bindings[id.0].as_ref()
    }
}

pub struct DomainResolver<'a> {
    catalog: &'a Catalog,
    universe: &'a Arc<Coordinate>,
    records: &'a SparseRecords,
    options: &'a LoadOptions,
    set_coords: Vec<Option<Arc<Coordinate>>>,
}

impl<'a> DomainResolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        universe: &'a Arc<Coordinate>,
        records: &'a SparseRecords,
        options: &'a LoadOptions,
    ) -> Self {
        Self {
            catalog,
            universe,
            records,
            options,
            set_coords: Vec::new(),
        }
    }

    pub fn resolve(mut self) -> Result<ResolvedDomains, FormatError> {
        // Coordinates of all 1-D Sets come first so that forward and
        // self references resolve.
        self.set_coords = self
            .catalog
            .iter()
            .map(|s| s.is_one_dim_set().then(|| self.build_set_coordinate(s)))
            .collect();

        let mut bindings = Vec::with_capacity(self.catalog.len());
        for symbol in self.catalog.iter() {
            let binding = match symbol.kind {
                SymbolKind::Equation | SymbolKind::Alias => None,
                _ => Some(self.bind(symbol)?),
            };
            bindings.push(binding);
        }

        Ok(ResolvedDomains {
            set_coords: self.set_coords,
            bindings,
        })
    }

    fn build_set_coordinate(&self, set: &Symbol) -> Arc<Coordinate> {
        let mut coord = Coordinate::new(set.name.clone());
        for record in self.records.get(set.id) {
            coord.push(record.keys[0].clone(), record.text.clone());
        }
        Arc::new(coord)
    }

    fn bind(&self, symbol: &Symbol) -> Result<DomainBinding, FormatError> {
        let mut axes: Vec<Arc<Coordinate>> = Vec::with_capacity(symbol.dim);

        for (dim, domain) in symbol.domain_refs.iter().enumerate() {
            let axis = match domain {
                DomainRef::Named(name) if *name == symbol.name => {
                    if dim > 0 {
                        Arc::clone(&axes[0])
                    } else if let Some(own) = &self.set_coords[symbol.id.0] {
                        Arc::clone(own)
                    } else {
                        self.fallback(symbol, dim)
                    }
                }
                DomainRef::Named(name) => match self.named_set(symbol, name)? {
                    Some(coord) => coord,
                    None => self.fallback(symbol, dim),
                },
                DomainRef::Universe => self.fallback(symbol, dim),
            };
            axes.push(axis);
        }

        let dense_size = axes
            .iter()
            .fold(1u128, |acc, a| acc.saturating_mul(a.len() as u128));
        if dense_size > self.options.max_dense_elements as u128 {
            return Err(FormatError::Oversized {
                symbol: symbol.name.clone(),
                elements: dense_size,
                max: self.options.max_dense_elements,
            });
        }

        debug!(
            "Resolved '{}' over ({}) = {} elements",
            symbol.name,
            axes.iter().map(|a| a.name()).collect::<Vec<_>>().join(","),
            dense_size
        );

        Ok(DomainBinding { axes, dense_size })
    }

    /// Coordinate of the 1-D Set `name` refers to, after checking its chain
    fn named_set(
        &self,
        symbol: &Symbol,
        name: &str,
    ) -> Result<Option<Arc<Coordinate>>, FormatError> {
        let Some(start) = self.catalog.id(name) else {
            return Ok(None);
        };
        self.check_chain(symbol, start)?;

        let Some(target) = self.catalog.dealias(start)? else {
            return Ok(None);
        };
        Ok(self.set_coords[target.0].clone())
    }

    /// Walk parent links from `start` until a terminal symbol is reached
    fn check_chain(&self, symbol: &Symbol, start: SymbolId) -> Result<(), FormatError> {
        let mut chain = vec![symbol.id];
        let mut current = start;

        loop {
            if chain.contains(&current) {
                chain.push(current);
                return Err(FormatError::DomainCycle {
                    symbol: symbol.name.clone(),
                    chain: chain
                        .iter()
                        .map(|id| self.catalog.symbol(*id).name.clone())
                        .collect(),
                });
            }
            chain.push(current);

            let node = self.catalog.symbol(current);
            let parent = if let Some(target) = &node.alias_of {
                target.as_str()
            } else if node.is_one_dim_set() {
                match &node.domain_refs[0] {
                    DomainRef::Named(parent) if *parent != node.name => parent.as_str(),
                    _ => return Ok(()),
                }
            } else {
                return Ok(());
            };

            // Only aliases and 1-D Sets continue a chain; anything else
            // resolves to the universe
            match self.catalog.id(parent) {
                Some(next) if self.continues_chain(next) => current = next,
                _ => return Ok(()),
            }
        }
    }

    fn continues_chain(&self, id: SymbolId) -> bool {
        let node = self.catalog.symbol(id);
        node.alias_of.is_some() || node.is_one_dim_set()
    }

    /// Universe, or with `infer_domains` the smallest 1-D Set covering the
    /// labels used in this dimension
    fn fallback(&self, symbol: &Symbol, dim: usize) -> Arc<Coordinate> {
        if !self.options.infer_domains {
            return Arc::clone(self.universe);
        }

        let records = self.records.get(symbol.id);
        if records.is_empty() {
            return Arc::clone(self.universe);
        }

        let mut best: Option<&Arc<Coordinate>> = None;
        for (id, coord) in self.set_coords.iter().enumerate() {
            let Some(coord) = coord else { continue };
            if id == symbol.id.0 {
                continue;
            }
            if best.is_some_and(|b| b.len() <= coord.len()) {
                continue;
            }
            if coord.covers(records.iter().map(|r| r.keys[dim].as_str())) {
                best = Some(coord);
            }
        }

        match best {
            Some(coord) if coord.len() < self.universe.len() => {
                debug!(
                    "Inferred domain '{}' for dimension {} of '{}'",
                    coord.name(),
                    dim,
                    symbol.name
                );
                Arc::clone(coord)
            }
            _ => Arc::clone(self.universe),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{MemoryContainer, SymbolInfo};
    use crate::resolve::universe::scan;

    fn resolve_with(
        mut container: MemoryContainer,
        options: &LoadOptions,
    ) -> Result<(Catalog, Arc<Coordinate>, ResolvedDomains), FormatError> {
        let catalog = Catalog::build(&container)?;
        let (universe, records) = scan(&mut container, &catalog).unwrap();
        let domains = DomainResolver::new(&catalog, &universe, &records, options).resolve()?;
        Ok((catalog, universe, domains))
    }

    fn resolve(
        container: MemoryContainer,
    ) -> Result<(Catalog, Arc<Coordinate>, ResolvedDomains), FormatError> {
        resolve_with(container, &LoadOptions::default())
    }

    fn axis_names(catalog: &Catalog, domains: &ResolvedDomains, name: &str) -> Vec<String> {
        let id = catalog.id(name).unwrap();
        domains
            .binding(id)
            .unwrap()
            .axes
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    #[test]
    fn test_declared_set_order() {
        let container = MemoryContainer::builder()
            .set("s", &["c", "a", "b"])
            .parameter("p", &["s"], &[(&["a"], 5.0)])
            .build();

        let (catalog, _, domains) = resolve(container).unwrap();
        let binding = domains.binding(catalog.id("p").unwrap()).unwrap();

        assert_eq!(binding.axes[0].labels().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(binding.dense_size, 3);
        assert_eq!(binding.shape(), vec![3]);
    }

    #[test]
    fn test_forward_reference() {
        let container = MemoryContainer::builder()
            .parameter("p", &["s"], &[(&["a"], 1.0)])
            .set("s", &["a", "b"])
            .build();

        let (catalog, _, domains) = resolve(container).unwrap();
        assert_eq!(axis_names(&catalog, &domains, "p"), vec!["s"]);
    }

    #[test]
    fn test_universe_fallbacks() {
        let container = MemoryContainer::builder()
            .set("s", &["a"])
            .subset("m", &["s", "s"], &[&["a", "a"]])
            .parameter("p", &["*", "missing", "m"], &[])
            .build();

        let (catalog, universe, domains) = resolve(container).unwrap();
        assert_eq!(axis_names(&catalog, &domains, "p"), vec!["*", "*", "*"]);
        let binding = domains.binding(catalog.id("p").unwrap()).unwrap();
        assert!(Arc::ptr_eq(&binding.axes[0], &universe));
    }

    #[test]
    fn test_alias_domain_uses_target() {
        let container = MemoryContainer::builder()
            .set("s", &["a", "b"])
            .alias("s_", "s")
            .parameter("p", &["s", "s_"], &[])
            .build();

        let (catalog, _, domains) = resolve(container).unwrap();
        let binding = domains.binding(catalog.id("p").unwrap()).unwrap();
        assert!(Arc::ptr_eq(&binding.axes[0], &binding.axes[1]));
        assert_eq!(binding.dense_size, 4);
    }

    #[test]
    fn test_self_reference() {
        let container = MemoryContainer::builder()
            .subset("s", &["s"], &[&["x"], &["y"]])
            .subset("pair", &["s", "pair"], &[&["x", "y"]])
            .build();

        let (catalog, _, domains) = resolve(container).unwrap();
        let s = domains.binding(catalog.id("s").unwrap()).unwrap();
        assert_eq!(s.axes[0].labels().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(axis_names(&catalog, &domains, "pair"), vec!["s", "s"]);
    }

    #[test]
    fn test_two_set_cycle_rejected() {
        let container = MemoryContainer::builder()
            .subset("a", &["b"], &[&["x"]])
            .subset("b", &["a"], &[&["x"]])
            .build();

        let err = resolve(container).unwrap_err();
        match err {
            FormatError::DomainCycle { symbol, chain } => {
                assert_eq!(symbol, "a");
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_set_over_non_set_parent_falls_back() {
        let container = MemoryContainer::builder()
            .parameter("p", &["s"], &[(&["a"], 1.0)])
            .subset("s", &["p"], &[&["a"]])
            .build();

        let (catalog, universe, domains) = resolve(container).unwrap();
        let s = domains.binding(catalog.id("s").unwrap()).unwrap();
        assert!(Arc::ptr_eq(&s.axes[0], &universe));
        let p = domains.binding(catalog.id("p").unwrap()).unwrap();
        assert_eq!(p.axes[0].name(), "s");
    }

    #[test]
    fn test_oversized_rejected() {
        let container = MemoryContainer::builder()
            .set("s", &["a", "b", "c", "d"])
            .parameter("p", &["s", "s"], &[])
            .build();
        let options = LoadOptions::default().with_max_dense_elements(15);

        let err = resolve_with(container, &options).unwrap_err();
        assert_eq!(
            err,
            FormatError::Oversized {
                symbol: "p".to_string(),
                elements: 16,
                max: 15
            }
        );
    }

    #[test]
    fn test_empty_declared_set_is_used() {
        let container = MemoryContainer::builder()
            .set("e", &[])
            .parameter("p", &["e"], &[])
            .build();

        let (catalog, _, domains) = resolve(container).unwrap();
        let binding = domains.binding(catalog.id("p").unwrap()).unwrap();
        assert_eq!(binding.axes[0].name(), "e");
        assert_eq!(binding.dense_size, 0);
    }

    #[test]
    fn test_inferred_domain() {
        let container = MemoryContainer::builder()
            .set("s", &["a", "b", "c", "d", "e", "f", "g"])
            .set("s5", &["b", "d", "f"])
            .parameter("p6", &["*", "*"], &[(&["b", "d"], 1.0), (&["f", "f"], 2.0)])
            .build();
        let options = LoadOptions::default().with_infer_domains(true);

        let (catalog, _, domains) = resolve_with(container, &options).unwrap();
        assert_eq!(axis_names(&catalog, &domains, "p6"), vec!["s5", "s5"]);
    }

    #[test]
    fn test_equations_not_bound() {
        let info = SymbolInfo::new("eq", SymbolKind::Equation, ["*"]);
        let container = MemoryContainer::builder().symbol(info, Vec::new()).build();

        let (catalog, _, domains) = resolve(container).unwrap();
        assert!(domains.binding(catalog.id("eq").unwrap()).is_none());
    }
}
