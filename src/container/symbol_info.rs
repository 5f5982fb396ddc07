//! Raw symbol metadata and records as reported by a container reader

use serde::Deserialize;
use std::fmt;

/// Marker used by GDX for the universal set
pub const UNIVERSE_NAME: &str = "*";

/// Kind of a container symbol
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Set,
    Parameter,
    Variable,
    Equation,
    Alias,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Set => "set",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Variable => "variable",
            SymbolKind::Equation => "equation",
            SymbolKind::Alias => "alias",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable sub-type (GMS_VARTYPE_*)
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    #[default]
    Unknown,
    Binary,
    Integer,
    Positive,
    Negative,
    Free,
    Sos1,
    Sos2,
    Semicont,
    Semiint,
}

impl VarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::Unknown => "unknown",
            VarType::Binary => "binary",
            VarType::Integer => "integer",
            VarType::Positive => "positive",
            VarType::Negative => "negative",
            VarType::Free => "free",
            VarType::Sos1 => "sos1",
            VarType::Sos2 => "sos2",
            VarType::Semicont => "semicont",
            VarType::Semiint => "semiint",
        }
    }
}

/// Declared domain of one dimension, kept verbatim until resolution
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum DomainRef {
    Universe,
    Named(String),
}

impl DomainRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            DomainRef::Universe => UNIVERSE_NAME,
            DomainRef::Named(name) => name,
        }
    }
}

impl From<String> for DomainRef {
    fn from(name: String) -> Self {
        if name == UNIVERSE_NAME || name.is_empty() {
            DomainRef::Universe
        } else {
            DomainRef::Named(name)
        }
    }
}

impl From<&str> for DomainRef {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

/// Format version and producer strings of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileVersion {
    pub version: String,
    pub producer: String,
}

/// Metadata of one symbol, as reported by `symbol_info`
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub dim: usize,
    pub kind: SymbolKind,
    pub record_count: usize,
    pub description: String,
    pub domain_refs: Vec<DomainRef>,
    pub var_type: VarType,
    /// Target of an alias, when the container stores it explicitly
    pub alias_of: Option<String>,
}

impl SymbolInfo {
    /// Metadata with `dim` taken from the domain list and no records
    pub fn new<I, D>(name: impl Into<String>, kind: SymbolKind, domain: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DomainRef>,
    {
        let domain_refs: Vec<DomainRef> = domain.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            dim: domain_refs.len(),
            kind,
            record_count: 0,
            description: String::new(),
            domain_refs,
            var_type: VarType::Unknown,
            alias_of: None,
        }
    }

    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        let mut info = Self::new(name, SymbolKind::Alias, Vec::<DomainRef>::new());
        info.description = format!("Aliased with {}", target);
        info.alias_of = Some(target);
        info
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_var_type(mut self, var_type: VarType) -> Self {
        self.var_type = var_type;
        self
    }
}

/// One sparse record: a label tuple and its value
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub keys: Vec<String>,
    /// Level value; for Sets non-zero means "yes"
    pub value: f64,
    /// Element text (Sets only)
    pub text: Option<String>,
}

impl RawRecord {
    pub fn new<I, S>(keys: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            value,
            text: None,
        }
    }

    /// A Set element record ("yes")
    pub fn element<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(keys, 1.0)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
