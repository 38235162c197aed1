pub mod errors;

pub use errors::{ErrorCategory, PotentialError, PotentialResult};

use serde_json::Value;

pub const WILDCARD: &str = "*";

/// A single term of a `pair_style`, `pair_coeff` or `command` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Option(String),
    Parameter(String),
    File(String),
    SymbolsList(bool),
    Symbols(bool),
}

impl Term {
    /// Builds a term from a tag/value pair, returning `None` for tags that
    /// do not contribute to rendered lines.
    pub fn from_tag(tag: &str, value: &Value) -> Option<Self> {
        match tag {
            "option" => Some(Self::Option(scalar_text(value))),
            "parameter" => Some(Self::Parameter(scalar_text(value))),
            "file" => Some(Self::File(scalar_text(value))),
            "symbolsList" => Some(Self::SymbolsList(parse_flag(value))),
            "symbols" => Some(Self::Symbols(parse_flag(value))),
            _ => None,
        }
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Option(_) => "option",
            Self::Parameter(_) => "parameter",
            Self::File(_) => "file",
            Self::SymbolsList(_) => "symbolsList",
            Self::Symbols(_) => "symbols",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Option(text) | Self::Parameter(text) | Self::File(text) => {
                Value::String(text.clone())
            }
            Self::SymbolsList(flag) | Self::Symbols(flag) => Value::Bool(*flag),
        }
    }
}

/// Interprets a term flag: a literal boolean, or a string equal to `true`
/// ignoring case. Everything else is false.
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Text form of a scalar document value as it appears in an engine command.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoeffBlock {
    pub interaction: Vec<String>,
    pub is_many_body: bool,
    pub terms: Vec<Term>,
}

impl CoeffBlock {
    pub fn new(interaction: Vec<String>, terms: Vec<Term>, is_many_body: bool) -> Self {
        Self {
            interaction,
            is_many_body,
            terms,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.interaction.len() == 2 && self.interaction.iter().all(|symbol| symbol == WILDCARD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    pub terms: Vec<Term>,
}

/// A downloadable file associated with a potential.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Artifact {
    pub filename: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
}

impl Artifact {
    pub fn metadata(&self) -> serde_json::Map<String, Value> {
        let mut meta = serde_json::Map::new();
        meta.insert("filename".to_string(), optional_string(&self.filename));
        meta.insert("label".to_string(), optional_string(&self.label));
        meta.insert("url".to_string(), optional_string(&self.url));
        meta
    }
}

pub(crate) fn optional_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}
