use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] InvalidRequestError),
    #[error("Error identified during calculation: {0}")]
    FailureInCalculation(#[from] CalculationError),
    #[error("Error with standard intensity catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl EngineError {
    /// Whether the failure was caused by the request itself, which an API layer would
    /// report as a client (4xx-class) error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidRequest(_) | EngineError::FailureInCalculation(_)
        )
    }
}

/// An error representing a malformed or out-of-range field in a request.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct InvalidRequestError {
    pub field: String,
    pub message: String,
}

impl InvalidRequestError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The same error, with its field path nested under `prefix` (e.g. a batch index).
    pub(crate) fn within(self, prefix: impl Into<String>) -> Self {
        Self {
            field: format!("{}.{}", prefix.into(), self.field),
            message: self.message,
        }
    }
}

impl From<serde_valid::validation::Errors> for InvalidRequestError {
    fn from(errors: serde_valid::validation::Errors) -> Self {
        Self::new("request", errors.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalculationError {
    #[error("Standard primary energy must be greater than zero (was {standard_mj} MJ/year)")]
    StandardEnergyNotPositive { standard_mj: f64 },
    #[error("No model building intensities are tabulated for building type '{0}'")]
    NoModelBuilding(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read catalog file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not parse catalog file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("Catalog has no 'uses' section")]
    MissingUses,
    #[error("No catalog data for use '{building_use}' in zone '{zone}'")]
    NotFound { building_use: String, zone: String },
}
