//! Load entry points

use std::path::Path;

use tracing::{debug, info};

use super::assemble::{assemble, Resolved};
use super::gdx_dataset::{Dataset, FileAttrs};
use crate::catalog::Catalog;
use crate::config::LoadOptions;
use crate::container::{ContainerReader, MemoryContainer, OpenContainer};
use crate::resolve::{scan, DomainResolver};
use crate::utils::Result;

/// Load a container manifest from `path`
///
/// # Errors
/// - `GdxError::Config` if `options` are invalid
/// - `GdxError::Container` if the file cannot be opened or parsed
/// - `GdxError::Format` if the contents are inconsistent
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Dataset> {
    load_with::<MemoryContainer>(path.as_ref(), options)
}

/// Load `path` through a specific reader adapter
pub fn load_with<R: OpenContainer>(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    options.validate()?;
    debug!("Opening container {}", path.display());
    let reader = R::open(path)?;
    load_from(reader, options)
}

/// Load from an already open reader, which is closed on return
pub fn load_from<R: ContainerReader>(mut reader: R, options: &LoadOptions) -> Result<Dataset> {
    options.validate()?;

    let version = reader.file_version();
    let attrs = FileAttrs {
        version: version.version,
        producer: version.producer,
        symbol_count: reader.symbol_count(),
        element_count: reader.element_count(),
    };

    let catalog = Catalog::build(&reader)?;
    let (universe, records) = scan(&mut reader, &catalog)?;
    drop(reader);

    let domains = DomainResolver::new(&catalog, &universe, &records, options).resolve()?;
    let dataset = assemble(
        Resolved {
            attrs,
            catalog,
            universe,
            records,
            domains,
        },
        options,
    )?;

    info!(
        "Loaded {} of {} symbols over {} labels ({} warnings{})",
        dataset.names().count(),
        dataset.catalog().len(),
        dataset.universe().len(),
        dataset.warnings().len(),
        if options.lazy { ", lazy" } else { "" }
    );
    Ok(dataset)
}
