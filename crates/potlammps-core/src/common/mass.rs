//! Atomic-mass lookup used when a potential does not define a mass for a symbol.

use serde::Deserialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MassLookupError {
    #[error("no standard atomic mass available for element '{element}'")]
    Unknown { element: String },
    #[error("invalid mass '{input}' entered for element '{element}'")]
    InvalidInput { element: String, input: String },
    #[error("mass prompt for element '{element}' failed: {source}")]
    Prompt {
        element: String,
        source: std::io::Error,
    },
    #[error("failed to read mass table '{}': {source}", path.display())]
    ReadTable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse mass table: {source}")]
    ParseTable {
        #[from]
        source: serde_json::Error,
    },
}

pub trait AtomicMassLookup {
    /// Returns the atomic mass of `element`. When `interactive` is true an
    /// implementation may ask the user instead of failing.
    fn atomic_mass(&self, element: &str, interactive: bool) -> Result<f64, MassLookupError>;
}

impl<T> AtomicMassLookup for &T
where
    T: AtomicMassLookup + ?Sized,
{
    fn atomic_mass(&self, element: &str, interactive: bool) -> Result<f64, MassLookupError> {
        (**self).atomic_mass(element, interactive)
    }
}

/// Element to mass map supplied by the caller, e.g. from a JSON object
/// `{"Al": 26.9815385, "Ni": 58.6934}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MassTable {
    masses: BTreeMap<String, f64>,
}

impl MassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mass(mut self, element: impl Into<String>, mass: f64) -> Self {
        self.insert(element, mass);
        self
    }

    pub fn insert(&mut self, element: impl Into<String>, mass: f64) {
        self.masses.insert(element.into(), mass);
    }

    pub fn get(&self, element: &str) -> Option<f64> {
        self.masses.get(element).copied()
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn from_json_str(content: &str) -> Result<Self, MassLookupError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, MassLookupError> {
        let content = fs::read_to_string(path).map_err(|source| MassLookupError::ReadTable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

impl AtomicMassLookup for MassTable {
    fn atomic_mass(&self, element: &str, _interactive: bool) -> Result<f64, MassLookupError> {
        self.get(element).ok_or_else(|| MassLookupError::Unknown {
            element: element.to_string(),
        })
    }
}

/// Wraps another lookup and asks for a mass on `output`/`input` when the
/// inner lookup fails and the caller allows interaction.
pub struct PromptingMassLookup<L, R, W> {
    inner: L,
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<L, R, W> PromptingMassLookup<L, R, W>
where
    L: AtomicMassLookup,
    R: BufRead,
    W: Write,
{
    pub fn new(inner: L, input: R, output: W) -> Self {
        Self {
            inner,
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn prompt(&self, element: &str) -> Result<f64, MassLookupError> {
        let prompt_error = |source| MassLookupError::Prompt {
            element: element.to_string(),
            source,
        };

        {
            let mut output = self.output.borrow_mut();
            write!(output, "No standard mass known for {element}. Enter mass: ")
                .map_err(prompt_error)?;
            output.flush().map_err(prompt_error)?;
        }

        let mut line = String::new();
        self.input
            .borrow_mut()
            .read_line(&mut line)
            .map_err(prompt_error)?;

        let trimmed = line.trim();
        match trimmed.parse::<f64>() {
            Ok(mass) if mass.is_finite() && mass > 0.0 => Ok(mass),
            _ => Err(MassLookupError::InvalidInput {
                element: element.to_string(),
                input: trimmed.to_string(),
            }),
        }
    }
}

impl<L, R, W> AtomicMassLookup for PromptingMassLookup<L, R, W>
where
    L: AtomicMassLookup,
    R: BufRead,
    W: Write,
{
    fn atomic_mass(&self, element: &str, interactive: bool) -> Result<f64, MassLookupError> {
        match self.inner.atomic_mass(element, interactive) {
            Ok(mass) => Ok(mass),
            Err(MassLookupError::Unknown { .. }) if interactive => self.prompt(element),
            Err(error) => Err(error),
        }
    }
}
