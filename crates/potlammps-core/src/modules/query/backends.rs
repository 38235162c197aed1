use super::{QueryBackend, QueryField, QueryKind};
use crate::domain::scalar_text;
use serde_json::{Map, Value, json};

/// Mongo-style filter document. The Mongo flavour addresses record content
/// under `content.<root>` and honours record-level fields; the CDCS flavour
/// addresses `<root>` directly and has no record-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    content_prefix: Option<&'static str>,
    record_fields: bool,
    query: Map<String, Value>,
}

impl DocumentQuery {
    pub fn mongo() -> Self {
        Self {
            content_prefix: Some("content"),
            record_fields: true,
            query: Map::new(),
        }
    }

    pub fn cdcs() -> Self {
        Self {
            content_prefix: None,
            record_fields: false,
            query: Map::new(),
        }
    }

    fn resolve_path(&self, model_root: &str, field: &QueryField) -> Option<String> {
        match field.path {
            None => self.record_fields.then(|| field.name.to_string()),
            Some(path) => Some(match self.content_prefix {
                Some(prefix) => format!("{prefix}.{model_root}.{path}"),
                None => format!("{model_root}.{path}"),
            }),
        }
    }

    fn push_and(&mut self, clause: Value) {
        let entry = self
            .query
            .entry("$and".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(clauses) = entry {
            clauses.push(clause);
        }
    }
}

fn value_list(values: &[Option<String>]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|value| value.clone().map(Value::String).unwrap_or(Value::Null))
            .collect(),
    )
}

fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if "\\.+*?()|[]{}^$".contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl QueryBackend for DocumentQuery {
    type Output = Value;

    fn apply(&mut self, model_root: &str, field: &QueryField, values: &[Option<String>]) {
        let Some(path) = self.resolve_path(model_root, field) else {
            return;
        };

        match field.kind {
            QueryKind::StrMatch => {
                self.query
                    .insert(path, json!({ "$in": value_list(values) }));
            }
            QueryKind::InList => {
                self.query
                    .insert(path, json!({ "$all": value_list(values) }));
            }
            QueryKind::StrContains => {
                for value in values.iter().flatten() {
                    let clause = json!({
                        path.clone(): { "$regex": escape_regex(value), "$options": "i" }
                    });
                    self.push_and(clause);
                }
            }
        }
    }

    fn finish(self) -> Self::Output {
        Value::Object(self.query)
    }
}

/// Evaluates filters against flat metadata rows, yielding one match flag per row.
#[derive(Debug, Clone)]
pub struct TableFilter<'a> {
    rows: &'a [Map<String, Value>],
    matches: Vec<bool>,
}

impl<'a> TableFilter<'a> {
    pub fn new(rows: &'a [Map<String, Value>]) -> Self {
        Self {
            rows,
            matches: vec![true; rows.len()],
        }
    }
}

fn cell_matches(cell: Option<&Value>, kind: QueryKind, values: &[Option<String>]) -> bool {
    let cell = cell.filter(|value| !value.is_null());
    match kind {
        QueryKind::StrMatch => values.iter().any(|wanted| match (wanted, cell) {
            (None, None) => true,
            (Some(wanted), Some(cell)) => scalar_text(cell) == *wanted,
            _ => false,
        }),
        QueryKind::StrContains => {
            let Some(cell) = cell else {
                return false;
            };
            let haystack = scalar_text(cell).to_lowercase();
            values
                .iter()
                .flatten()
                .all(|needle| haystack.contains(&needle.to_lowercase()))
        }
        QueryKind::InList => {
            let items: Vec<String> = match cell {
                Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
                Some(other) => vec![scalar_text(other)],
                None => Vec::new(),
            };
            values
                .iter()
                .flatten()
                .all(|wanted| items.iter().any(|item| item == wanted))
        }
    }
}

impl QueryBackend for TableFilter<'_> {
    type Output = Vec<bool>;

    fn apply(&mut self, _model_root: &str, field: &QueryField, values: &[Option<String>]) {
        for (row, matched) in self.rows.iter().zip(self.matches.iter_mut()) {
            if *matched {
                *matched = cell_matches(row.get(field.name), field.kind, values);
            }
        }
    }

    fn finish(self) -> Self::Output {
        self.matches
    }
}
