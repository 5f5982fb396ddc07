//! Error types for gdx-reader

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level load error
#[derive(Error, Debug)]
pub enum GdxError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Malformed or internally inconsistent container contents.
///
/// Every variant is fatal: the load is aborted and no partial dataset is
/// returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Inconsistent symbol count: container reports {reported}, enumerated {enumerated}")]
    SymbolCount { reported: usize, enumerated: usize },

    #[error("Malformed symbol record at index {index}: {reason}")]
    MalformedSymbol { index: usize, reason: String },

    #[error("Duplicate symbol name '{name}' at index {index}")]
    DuplicateSymbol { name: String, index: usize },

    #[error("Symbol '{symbol}' declares {declared} records but yielded {actual}")]
    RecordCountMismatch {
        symbol: String,
        declared: usize,
        actual: usize,
    },

    #[error("Record {record} of symbol '{symbol}' has {actual} labels, expected {expected}")]
    RecordArity {
        symbol: String,
        record: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Domain cycle for symbol '{symbol}': {}", .chain.join(" -> "))]
    DomainCycle { symbol: String, chain: Vec<String> },

    #[error("Alias '{alias}' refers to unknown symbol '{target}'")]
    UnresolvedAlias { alias: String, target: String },

    #[error("Label '{label}' of symbol '{symbol}' is not in the domain of dimension {dim}")]
    LabelOutOfDomain {
        symbol: String,
        dim: usize,
        label: String,
    },

    #[error("Symbol '{symbol}' needs {elements} dense elements (max {max})")]
    Oversized {
        symbol: String,
        elements: u128,
        max: u64,
    },
}

/// Failures reported by a container reader adapter
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("No such file or directory: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read container: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse container: {0}")]
    Parse(String),

    #[error("Symbol index {index} out of bounds (count {count})")]
    SymbolIndex { index: usize, count: usize },
}

/// Invalid load options
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid option: {0}")]
    Invalid(String),
}

/// Non-fatal issues collected alongside a successful load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// Symbol kind the assembler does not materialize (equations).
    UnsupportedSymbol { symbol: String, kind: String },

    /// Two records share the same label tuple; the later value was kept.
    DuplicateRecord { symbol: String, keys: Vec<String> },

    /// Alias whose target is itself not materialized.
    UnsupportedAlias { alias: String, target: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnsupportedSymbol { symbol, kind } => {
                write!(f, "Loading of {} symbols not implemented: '{}' not loaded", kind, symbol)
            }
            LoadWarning::DuplicateRecord { symbol, keys } => {
                write!(
                    f,
                    "Duplicate record ({}) in '{}': keeping later value",
                    keys.join(", "),
                    symbol
                )
            }
            LoadWarning::UnsupportedAlias { alias, target } => {
                write!(f, "Alias '{}' of unloaded symbol '{}' not loaded", alias, target)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GdxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_cycle_message() {
        let err = FormatError::DomainCycle {
            symbol: "p".to_string(),
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "Domain cycle for symbol 'p': a -> b -> a");
    }

    #[test]
    fn test_format_error_converts() {
        let err: GdxError = FormatError::SymbolCount {
            reported: 3,
            enumerated: 2,
        }
        .into();
        assert!(matches!(err, GdxError::Format(FormatError::SymbolCount { .. })));
    }

    #[test]
    fn test_warning_display() {
        let warning = LoadWarning::DuplicateRecord {
            symbol: "p".to_string(),
            keys: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(warning.to_string(), "Duplicate record (a, b) in 'p': keeping later value");
    }
}
