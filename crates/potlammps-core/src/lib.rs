//! Loading of `potential-LAMMPS` documents and generation of the LAMMPS
//! commands that define an interatomic potential for a simulation.

pub mod common;
pub mod domain;
pub mod modules;

pub use common::{AtomicMassLookup, MassTable, PromptingMassLookup};
pub use domain::{PotentialError, PotentialResult};
pub use modules::{DataScriptOptions, PairInfoOptions, PotentialLammps};
