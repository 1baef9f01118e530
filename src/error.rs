use serde::Serialize;
use thiserror::Error;

use crate::gemini::GeminiError;

/// Terminal failure of a single `generate` call. Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid request: {0}")] RequestValidation(String),
    #[error("generation service error: {0}")] Service(String),
    #[error("could not parse generated ad: {0}")] Parse(String),
    #[error("generated ad has the wrong shape: {0}")] StructuralValidation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RequestValidation,
    Service,
    Parse,
    StructuralValidation,
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestValidation(_) => ErrorKind::RequestValidation,
            Self::Service(_) => ErrorKind::Service,
            Self::Parse(_) => ErrorKind::Parse,
            Self::StructuralValidation(_) => ErrorKind::StructuralValidation,
        }
    }
}

impl From<GeminiError> for GenerationError {
    fn from(e: GeminiError) -> Self {
        GenerationError::Service(e.to_string())
    }
}
