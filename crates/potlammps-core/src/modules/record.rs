//! Generic document-backed record, specialised per style through [`RecordKind`].

use super::query::{NAME_FIELD, QueryBackend, QueryField, QueryFilters, build_query};
use super::traits::RecordKind;
use crate::common::DocumentNode;
use crate::domain::{PotentialError, PotentialResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct Record<K: RecordKind> {
    name: Option<String>,
    model: Option<Value>,
    content: Option<K::Content>,
}

impl<K: RecordKind> Default for Record<K> {
    fn default() -> Self {
        Self {
            name: None,
            model: None,
            content: None,
        }
    }
}

impl<K: RecordKind> Record<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_model(model: Value, name: Option<&str>) -> PotentialResult<Self> {
        let mut record = Self::new();
        record.load_model(model, name)?;
        Ok(record)
    }

    pub fn from_json_str(content: &str, name: Option<&str>) -> PotentialResult<Self> {
        Self::from_model(serde_json::from_str(content)?, name)
    }

    /// Loads a record from a JSON file. Without a given or kind-derived name
    /// the file stem is used.
    pub fn from_path(path: &Path, name: Option<&str>) -> PotentialResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| PotentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut record = Self::from_json_str(&content, name)?;
        if record.name.is_none() {
            record.name = path.file_stem().map(|stem| stem.to_string_lossy().into_owned());
        }
        Ok(record)
    }

    pub fn load_model(&mut self, model: Value, name: Option<&str>) -> PotentialResult<()> {
        let root = DocumentNode::new(&model).child(K::MODEL_ROOT).ok_or(
            PotentialError::WrongModelRoot {
                expected: K::MODEL_ROOT,
            },
        )?;
        let content = K::load_content(&root)?;
        debug!(style = K::STYLE, "loaded record content");

        self.name = name
            .map(str::to_string)
            .or_else(|| K::default_name(&content));
        self.content = Some(content);
        self.model = Some(model);
        Ok(())
    }

    pub fn style(&self) -> &'static str {
        K::STYLE
    }

    pub fn model_root(&self) -> &'static str {
        K::MODEL_ROOT
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn model(&self) -> Option<&Value> {
        self.model.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> PotentialResult<&K::Content> {
        self.content.as_ref().ok_or(PotentialError::NoModelLoaded)
    }

    pub fn build_model(&self) -> PotentialResult<Value> {
        let content = self.content()?;
        let mut model = Map::new();
        model.insert(K::MODEL_ROOT.to_string(), K::build_content(content));
        Ok(Value::Object(model))
    }

    pub fn metadata(&self) -> PotentialResult<Map<String, Value>> {
        let content = self.content()?;
        let mut meta = Map::new();
        meta.insert(
            "name".to_string(),
            self.name.clone().map(Value::String).unwrap_or(Value::Null),
        );
        meta.extend(K::metadata(content));
        Ok(meta)
    }

    pub fn query_fields() -> Vec<QueryField> {
        std::iter::once(NAME_FIELD)
            .chain(K::query_fields().iter().copied())
            .collect()
    }

    pub fn query<B: QueryBackend>(backend: B, filters: &QueryFilters) -> B::Output {
        let mut filters = filters.clone();
        K::prepare_filters(&mut filters);
        build_query(backend, K::MODEL_ROOT, &Self::query_fields(), &filters)
    }
}
