use crate::common::mass::MassLookupError;
use std::path::PathBuf;

pub type PotentialResult<T> = Result<T, PotentialError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PotentialError {
    #[error("missing required field '{path}'")]
    MissingField { path: String },
    #[error("atom {index}: {field} is required for each atom if element is not listed")]
    MissingAtomField { index: usize, field: &'static str },
    #[error("invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("symbol '{symbol}' not listed for potential")]
    UnknownSymbol { symbol: String },
    #[error("supplied masses must be same length as symbols: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("invalid pair_coeff interaction {symbols:?}: {reason}")]
    InvalidInteraction { symbols: Vec<String>, reason: String },
    #[error("no model information loaded")]
    NoModelLoaded,
    #[error("model root '{expected}' not found in document")]
    WrongModelRoot { expected: &'static str },
    #[error(transparent)]
    MassLookup(#[from] MassLookupError),
    #[error("failed to parse document: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PotentialError {
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_interaction(symbols: &[String], reason: impl Into<String>) -> Self {
        Self::InvalidInteraction {
            symbols: symbols.to_vec(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. }
            | Self::MissingAtomField { .. }
            | Self::InvalidValue { .. }
            | Self::UnknownSymbol { .. }
            | Self::LengthMismatch { .. }
            | Self::WrongModelRoot { .. }
            | Self::Parse { .. } => ErrorCategory::InputValidationError,
            Self::Io { .. } => ErrorCategory::IoSystemError,
            Self::InvalidInteraction { .. } | Self::MassLookup(_) => {
                ErrorCategory::ComputationError
            }
            Self::NoModelLoaded => ErrorCategory::InternalError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "INPUT.MISSING_FIELD",
            Self::MissingAtomField { .. } => "INPUT.ATOM_FIELD",
            Self::InvalidValue { .. } => "INPUT.INVALID_VALUE",
            Self::UnknownSymbol { .. } => "INPUT.UNKNOWN_SYMBOL",
            Self::LengthMismatch { .. } => "INPUT.MASS_LENGTH",
            Self::WrongModelRoot { .. } => "INPUT.MODEL_ROOT",
            Self::Parse { .. } => "INPUT.PARSE",
            Self::Io { .. } => "IO.READ",
            Self::InvalidInteraction { .. } => "RUN.INTERACTION",
            Self::MassLookup(_) => "RUN.MASS_LOOKUP",
            Self::NoModelLoaded => "SYS.NO_MODEL",
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category().is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder(), self)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category()
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}
