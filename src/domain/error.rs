use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// Field name when the error is tied to one input, `None` for
        /// form-level errors.
        field: Option<String>,
    },

    #[error("Label must be unique: '{label}' already exists")]
    DuplicateLabel { label: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("The last remaining model cannot be deleted")]
    LastModelProtected,

    #[error("Construction error: {message}")]
    Construction { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn field_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn duplicate_label(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::duplicate_label("default");
        assert_eq!(
            err.to_string(),
            "Label must be unique: 'default' already exists"
        );

        let err = DomainError::field_validation("dlnk", "step too large");
        assert!(err.to_string().contains("step too large"));
    }
}
