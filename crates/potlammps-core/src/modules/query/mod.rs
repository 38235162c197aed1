//! Field-based filters translated into backend-specific query structures.

mod backends;

pub use backends::{DocumentQuery, TableFilter};

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Field equals one of the given values.
    StrMatch,
    /// Field contains every given value as a case-insensitive substring.
    StrContains,
    /// List field contains every given value.
    InList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryField {
    /// Filter argument and metadata column name.
    pub name: &'static str,
    /// Path below the model root, or `None` for record-level fields.
    pub path: Option<&'static str>,
    pub kind: QueryKind,
}

impl QueryField {
    pub const fn content(name: &'static str, path: &'static str, kind: QueryKind) -> Self {
        Self {
            name,
            path: Some(path),
            kind,
        }
    }

    pub const fn record(name: &'static str, kind: QueryKind) -> Self {
        Self {
            name,
            path: None,
            kind,
        }
    }
}

pub const NAME_FIELD: QueryField = QueryField::record("name", QueryKind::StrMatch);

/// Filter arguments keyed by field name. A `None` value stands for a record
/// where the field is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilters {
    values: BTreeMap<String, Vec<Option<String>>>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(name, values);
        self
    }

    pub fn set<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|value| Some(value.into())).collect();
        self.values.insert(name.to_string(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[Option<String>]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Option<String>>> {
        self.values.get_mut(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

pub trait QueryBackend {
    type Output;

    fn apply(&mut self, model_root: &str, field: &QueryField, values: &[Option<String>]);

    fn finish(self) -> Self::Output;
}

pub fn build_query<B>(
    mut backend: B,
    model_root: &str,
    fields: &[QueryField],
    filters: &QueryFilters,
) -> B::Output
where
    B: QueryBackend,
{
    for field in fields {
        if let Some(values) = filters.get(field.name) {
            backend.apply(model_root, field, values);
        }
    }
    backend.finish()
}
