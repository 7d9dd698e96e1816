//! Error types for field synchronisation.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while driving an editor field.
///
/// Parse failures propagate to the host's error boundary. Missing context is a
/// programmer error and surfaces at setup time.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum FieldError {
    /// The engine rejected an incoming document state.
    #[error("failed to parse document state: {0}")]
    #[diagnostic(
        code(lexfield::parse),
        help("the stored value does not match the editor's serialization schema")
    )]
    Parse(String),

    /// The engine failed to report its live state.
    #[error("editor engine error: {0}")]
    #[diagnostic(code(lexfield::engine))]
    Engine(String),

    /// A plugin was used outside the provider that supplies its context.
    #[error("{hook} must be used within {provider}")]
    #[diagnostic(code(lexfield::missing_context))]
    MissingContext {
        hook: &'static str,
        provider: &'static str,
    },

    /// Looking up a related document failed.
    #[error("failed to load {collection}/{id}: {message}")]
    #[diagnostic(code(lexfield::related))]
    Related {
        collection: SmolStr,
        id: SmolStr,
        message: String,
    },

    /// Field configuration could not be read.
    #[error("invalid field config: {0}")]
    #[diagnostic(code(lexfield::config))]
    Config(String),

    /// Serialization error.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// A failed validation, carrying the message shown under the field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lexfield::validation))]
pub struct ValidationError {
    pub message: SmolStr,
}

impl ValidationError {
    pub fn new(message: impl Into<SmolStr>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T, E = FieldError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_context_message() {
        let err = FieldError::MissingContext {
            hook: "use_inline_image",
            provider: "InlineImageContext",
        };
        assert_eq!(
            err.to_string(),
            "use_inline_image must be used within InlineImageContext"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("This field is required.");
        assert_eq!(err.to_string(), "This field is required.");
    }
}
