use crate::common::DocumentNode;
use crate::domain::PotentialResult;
use crate::modules::query::{QueryField, QueryFilters};
use serde_json::{Map, Value};

/// Behaviour specific to one style of document-backed record.
pub trait RecordKind {
    type Content;

    const STYLE: &'static str;
    const MODEL_ROOT: &'static str;

    /// Reads the content below the model root.
    fn load_content(root: &DocumentNode<'_>) -> PotentialResult<Self::Content>;

    /// Rebuilds the document branch stored under the model root.
    fn build_content(content: &Self::Content) -> Value;

    fn metadata(content: &Self::Content) -> Map<String, Value>;

    fn query_fields() -> &'static [QueryField];

    fn default_name(_content: &Self::Content) -> Option<String> {
        None
    }

    fn prepare_filters(_filters: &mut QueryFilters) {}
}
