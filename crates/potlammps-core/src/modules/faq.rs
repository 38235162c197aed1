//! Frequently-asked-question records of a potentials repository.

use super::query::{QueryField, QueryKind};
use super::record::Record;
use super::traits::RecordKind;
use crate::common::DocumentNode;
use crate::domain::{PotentialResult, optional_string};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaqContent {
    pub question: Option<String>,
    pub answer: Option<String>,
}

pub struct Faq;

pub type FaqRecord = Record<Faq>;

const FAQ_QUERY_FIELDS: [QueryField; 2] = [
    QueryField::content("question", "question", QueryKind::StrContains),
    QueryField::content("answer", "answer", QueryKind::StrContains),
];

impl RecordKind for Faq {
    type Content = FaqContent;

    const STYLE: &'static str = "FAQ";
    const MODEL_ROOT: &'static str = "faq";

    fn load_content(root: &DocumentNode<'_>) -> PotentialResult<FaqContent> {
        Ok(FaqContent {
            question: Some(root.required_str("question")?),
            answer: Some(root.required_str("answer")?),
        })
    }

    fn build_content(content: &FaqContent) -> Value {
        let mut faq = Map::new();
        faq.insert("question".to_string(), optional_string(&content.question));
        faq.insert("answer".to_string(), optional_string(&content.answer));
        Value::Object(faq)
    }

    fn metadata(content: &FaqContent) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("question".to_string(), optional_string(&content.question));
        meta.insert("answer".to_string(), optional_string(&content.answer));
        meta
    }

    fn query_fields() -> &'static [QueryField] {
        &FAQ_QUERY_FIELDS
    }
}
