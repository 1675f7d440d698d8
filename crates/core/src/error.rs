use thiserror::Error;

use crate::wizard::WizardStep;

#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed. Raised before any
    /// collaborator is called.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// No published page is stored under this path
    #[error("Page not found: '{path}'. It may have been deleted or not published yet.")]
    NotFound { path: String },

    /// A simulated collaborator rejected the call
    #[error("{0}")]
    SimulatedFailure(String),

    #[error("Wizard is at step {actual}, expected step {expected}")]
    StepOrder {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_simulated_failure(&self) -> bool {
        matches!(self, Error::SimulatedFailure(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Text for an end user: validation failures without the field prefix
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
