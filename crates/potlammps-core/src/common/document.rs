//! Typed navigation over a parsed key/value document.
//!
//! Paths are dotted (`potential.id`). A key holding `null` is treated the same
//! as a missing key. List access follows the data-model convention that a
//! single child may be stored either bare or wrapped in an array.

use crate::domain::{PotentialError, PotentialResult, scalar_text};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct DocumentNode<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> DocumentNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_optional(path).is_some()
    }

    pub fn get_optional(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.value;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    }

    pub fn get_required(&self, path: &str) -> PotentialResult<&'a Value> {
        self.get_optional(path)
            .ok_or_else(|| PotentialError::missing_field(self.child_path(path)))
    }

    pub fn child(&self, path: &str) -> Option<DocumentNode<'a>> {
        self.get_optional(path).map(|value| DocumentNode {
            value,
            path: self.child_path(path),
        })
    }

    pub fn required_child(&self, path: &str) -> PotentialResult<DocumentNode<'a>> {
        let value = self.get_required(path)?;
        Ok(DocumentNode {
            value,
            path: self.child_path(path),
        })
    }

    pub fn optional_str(&self, path: &str) -> Option<String> {
        self.get_optional(path).map(scalar_text)
    }

    pub fn str_or(&self, path: &str, default: &str) -> String {
        self.optional_str(path)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn required_str(&self, path: &str) -> PotentialResult<String> {
        self.get_required(path).map(scalar_text)
    }

    /// Reads a number stored either as a JSON number or a numeric string.
    pub fn optional_f64(&self, path: &str) -> PotentialResult<Option<f64>> {
        let Some(value) = self.get_optional(path) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            PotentialError::invalid_value(
                self.child_path(path),
                format!("expected a number, found {}", value),
            )
        })
    }

    pub fn f64_or(&self, path: &str, default: f64) -> PotentialResult<f64> {
        Ok(self.optional_f64(path)?.unwrap_or(default))
    }

    /// All children stored under `name`, whether bare or in an array.
    pub fn as_list(&self, name: &str) -> Vec<DocumentNode<'a>> {
        let path = self.child_path(name);
        match self.get_optional(name) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|value| DocumentNode {
                    value,
                    path: path.clone(),
                })
                .collect(),
            Some(value) => vec![DocumentNode { value, path }],
        }
    }

    pub fn strings(&self, name: &str) -> Vec<String> {
        self.as_list(name)
            .iter()
            .map(|node| scalar_text(node.value))
            .collect()
    }

    /// Every value stored under key `name` anywhere below this node.
    pub fn finds(&self, name: &str) -> Vec<&'a Value> {
        let mut found = Vec::new();
        collect_matches(self.value, name, &mut found);
        found
    }

    /// Key/value entries of an object node, in document order.
    pub fn entries(&self) -> Vec<(&'a str, &'a Value)> {
        match self.value {
            Value::Object(map) => map.iter().map(|(key, value)| (key.as_str(), value)).collect(),
            _ => Vec::new(),
        }
    }
}

fn collect_matches<'a>(value: &'a Value, name: &str, found: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == name {
                    found.push(child);
                }
                collect_matches(child, name, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_matches(item, name, found);
            }
        }
        _ => {}
    }
}
