//! Validation error types
//!
//! Every error carries the location it applies to so the HTTP layer can
//! report `loc`/`msg`/`type` triples per field.

use std::fmt;

/// Validation error for a single request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent
    Missing { field: String },

    /// Field is present but null where null is not allowed
    Null { field: String },

    /// Field value was rejected by its deserializer
    Invalid { field: String, message: String },

    /// Path parameter could not be parsed as an integer
    InvalidPathParam { field: &'static str },

    /// Request body is valid JSON but not an object
    NotAnObject,

    /// Request body is not valid JSON
    MalformedJson { reason: String },
}

impl ValidationError {
    /// Location segments, e.g. `["body", "email"]` or `["path", "id"]`.
    pub fn loc(&self) -> Vec<String> {
        match self {
            Self::Missing { field } | Self::Null { field } | Self::Invalid { field, .. } => {
                vec!["body".to_owned(), field.clone()]
            }
            Self::InvalidPathParam { field } => vec!["path".to_owned(), (*field).to_owned()],
            Self::NotAnObject | Self::MalformedJson { .. } => vec!["body".to_owned()],
        }
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::Null { .. } => "null_not_allowed",
            Self::Invalid { message, .. } => invalid_kind(message),
            Self::InvalidPathParam { .. } => "int_parsing",
            Self::NotAnObject => "model_attributes_type",
            Self::MalformedJson { .. } => "json_invalid",
        }
    }
}

/// Classify a deserializer message by what the field expected.
fn invalid_kind(message: &str) -> &'static str {
    if message.starts_with("unknown variant") {
        return "enum";
    }

    let expected = message.rsplit_once("expected ").map_or("", |(_, e)| e);
    let typed = message.starts_with("invalid type") || message.starts_with("invalid value");

    match expected {
        _ if !typed => "value_error",
        e if e.contains("integer") => "int_type",
        "a string" => "string_type",
        "a sequence" => "list_type",
        _ if message.starts_with("invalid type") => "type_error",
        _ => "value_error",
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { .. } => write!(f, "Field required"),
            Self::Null { .. } => write!(f, "Field may not be null"),
            Self::Invalid { message, .. } => write!(f, "{}", message),
            Self::InvalidPathParam { .. } => write!(
                f,
                "Input should be a valid integer, unable to parse string as an integer"
            ),
            Self::NotAnObject => write!(f, "Input should be a valid dictionary or object"),
            Self::MalformedJson { reason } => write!(f, "JSON decode error: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// All field errors collected from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.loc().join("."), e))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
