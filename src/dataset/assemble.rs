//! Dataset assembly
//!
//! Combines the catalog, the universe and the resolved domains into a
//! [`Dataset`]. One-dimensional Sets become coordinates, zero-dimensional
//! Parameters and Variables become scalars, and everything else becomes a
//! dense array. Equations are skipped with a warning. Aliases are attached
//! last, sharing their target's entry.

use std::sync::Arc;

use tracing::{debug, warn};

use super::array::LazyArray;
use super::dense::MaterializePlan;
use super::gdx_dataset::{Dataset, Entry, FileAttrs};
use crate::catalog::{Catalog, Symbol};
use crate::config::LoadOptions;
use crate::container::SymbolKind;
use crate::resolve::{Coordinate, ResolvedDomains, SparseRecords};
use crate::utils::{FormatError, LoadWarning};

/// Everything the earlier load stages produced
pub(crate) struct Resolved {
    pub attrs: FileAttrs,
    pub catalog: Catalog,
    pub universe: Arc<Coordinate>,
    pub records: SparseRecords,
    pub domains: ResolvedDomains,
}

pub(crate) fn assemble(resolved: Resolved, options: &LoadOptions) -> Result<Dataset, FormatError> {
    let Resolved {
        attrs,
        catalog,
        universe,
        records,
        domains,
    } = resolved;

    let mut warnings = Vec::new();
    let mut entries: Vec<Option<Entry>> = vec![None; catalog.len()];

    for symbol in catalog.iter() {
        match symbol.kind {
            SymbolKind::Alias => continue,
            SymbolKind::Equation => {
                let warning = LoadWarning::UnsupportedSymbol {
                    symbol: symbol.name.clone(),
                    kind: symbol.kind.to_string(),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
            _ => {
                entries[symbol.id.index()] =
                    build_entry(symbol, &domains, &records, options, &mut warnings)?;
            }
        }
    }

    for symbol in catalog.iter().filter(|s| s.kind == SymbolKind::Alias) {
        let target = symbol.alias_of.clone().unwrap_or_default();
        let Some(target_id) = catalog.dealias(symbol.id)? else {
            return Err(FormatError::UnresolvedAlias {
                alias: symbol.name.clone(),
                target,
            });
        };

        match entries[target_id.index()].clone() {
            Some(entry) => {
                debug!("Alias '{}' shares '{}'", symbol.name, target);
                entries[symbol.id.index()] = Some(entry);
            }
            None => {
                let warning = LoadWarning::UnsupportedAlias {
                    alias: symbol.name.clone(),
                    target,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok(Dataset::new(attrs, catalog, universe, domains, entries, warnings))
}

fn build_entry(
    symbol: &Symbol,
    domains: &ResolvedDomains,
    records: &SparseRecords,
    options: &LoadOptions,
    warnings: &mut Vec<LoadWarning>,
) -> Result<Option<Entry>, FormatError> {
    let Some(binding) = domains.binding(symbol.id) else {
        return Ok(None);
    };
    // Sets exposed as coordinates are still checked against their own domain
    let plan = MaterializePlan::build(symbol, binding, records.get(symbol.id), warnings)?;

    if symbol.is_one_dim_set() {
        return Ok(domains.set_coordinate(symbol.id).cloned().map(Entry::Coordinate));
    }
    if symbol.is_scalar() && symbol.kind != SymbolKind::Set {
        return Ok(Some(Entry::Scalar(plan.scalar())));
    }

    let array = Arc::new(LazyArray::new(plan));
    if !options.lazy {
        array.get();
    }
    Ok(Some(Entry::Array(array)))
}
