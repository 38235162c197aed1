pub mod faq;
pub mod pair_info;
pub mod potential;
pub mod query;
pub mod record;
pub mod script;
pub mod serialization;

mod traits;

pub use faq::{Faq, FaqContent, FaqRecord};
pub use pair_info::PairInfoOptions;
pub use potential::{PotentialLammps, PotentialLammpsKind};
pub use record::Record;
pub use script::DataScriptOptions;
pub use traits::RecordKind;
