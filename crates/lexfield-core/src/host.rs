//! The seam between the field and the host form framework.

use smol_str::SmolStr;

use crate::error::ValidationError;
use crate::state::DocumentState;

/// The externally owned value slot for one form field.
pub trait FieldHost {
    /// Current form value, if the form has one.
    fn value(&self) -> Option<DocumentState>;

    /// Value the form was loaded with.
    fn initial_value(&self) -> Option<DocumentState> {
        None
    }

    fn set_value(&mut self, value: DocumentState);

    /// The value the editor should show: the form value, else the initial value.
    fn incoming_value(&self) -> Option<DocumentState> {
        self.value().or_else(|| self.initial_value())
    }
}

/// Options the host passes to a field validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    pub required: bool,
    pub field_type: SmolStr,
    pub name: SmolStr,
}

impl ValidateOptions {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            required: false,
            field_type: SmolStr::new_static("richText"),
            name: name.into(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Default validator for rich-text fields.
///
/// Only `required` is checked. The synchronizer never calls this; the host does.
pub fn validate_rich_text(
    value: Option<&DocumentState>,
    options: &ValidateOptions,
) -> Result<(), ValidationError> {
    if options.required && !value.is_some_and(DocumentState::has_text) {
        return Err(ValidationError::new("This field is required."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct StaticHost {
        value: Option<DocumentState>,
        initial: Option<DocumentState>,
    }

    impl FieldHost for StaticHost {
        fn value(&self) -> Option<DocumentState> {
            self.value.clone()
        }

        fn initial_value(&self) -> Option<DocumentState> {
            self.initial.clone()
        }

        fn set_value(&mut self, value: DocumentState) {
            self.value = Some(value);
        }
    }

    fn with_text(text: &str) -> DocumentState {
        DocumentState::from(json!({
            "root": {
                "type": "root",
                "children": [{
                    "type": "paragraph",
                    "children": [{ "type": "text", "text": text }]
                }]
            }
        }))
    }

    #[test]
    fn test_incoming_prefers_value() {
        let host = StaticHost {
            value: Some(with_text("current")),
            initial: Some(with_text("initial")),
        };
        assert_eq!(host.incoming_value(), Some(with_text("current")));

        let host = StaticHost {
            value: None,
            initial: Some(with_text("initial")),
        };
        assert_eq!(host.incoming_value(), Some(with_text("initial")));
    }

    #[test]
    fn test_required_empty_fails() {
        let opts = ValidateOptions::new("body").required(true);
        let err = validate_rich_text(Some(&DocumentState::empty()), &opts).unwrap_err();
        assert_eq!(err.message, "This field is required.");
        assert!(validate_rich_text(None, &opts).is_err());
    }

    #[test]
    fn test_required_with_text_passes() {
        let opts = ValidateOptions::new("body").required(true);
        assert!(validate_rich_text(Some(&with_text("hi")), &opts).is_ok());
    }

    #[test]
    fn test_optional_empty_passes() {
        let opts = ValidateOptions::new("body");
        assert_eq!(opts.field_type, "richText");
        assert!(validate_rich_text(None, &opts).is_ok());
    }
}
