use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DebtEngineError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DebtEngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DebtEngineError {
    fn from(e: serde_json::Error) -> Self {
        DebtEngineError::SerializationError(e.to_string())
    }
}
