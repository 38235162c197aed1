pub mod document;
pub mod mass;

pub use document::DocumentNode;
pub use mass::{AtomicMassLookup, MassLookupError, MassTable, PromptingMassLookup};
