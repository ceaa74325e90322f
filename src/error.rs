use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Hard failures of the I/O shell around the parser and validator.
///
/// Malformed lines and invalid values are never reported through this type;
/// they are collected as [`VarsentryError`] records instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
    #[error("invalid JSON schema: {0}")]
    SchemaJson(#[from] serde_json::Error),
    #[error("invalid YAML schema: {0}")]
    SchemaYaml(#[from] serde_yaml::Error),
}

/// Diagnostic codes produced by [`parse`](crate::parse) and
/// [`validate`](crate::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ParseMissingEquals,
    ParseInvalidLine,
    ValidationMissingRequired,
    InvalidStringValue,
    InvalidBooleanValue,
    InvalidNumberValue,
    CustomValidationFailed,
    ValidationUnknownVariable,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::ParseMissingEquals => "PARSE_MISSING_EQUALS",
            Self::ParseInvalidLine => "PARSE_INVALID_LINE",
            Self::ValidationMissingRequired => "VALIDATION_MISSING_REQUIRED",
            Self::InvalidStringValue => "INVALID_STRING_VALUE",
            Self::InvalidBooleanValue => "INVALID_BOOLEAN_VALUE",
            Self::InvalidNumberValue => "INVALID_NUMBER_VALUE",
            Self::CustomValidationFailed => "CUSTOM_VALIDATION_FAILED",
            Self::ValidationUnknownVariable => "VALIDATION_UNKNOWN_VARIABLE",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::ParseMissingEquals => "Malformed env line: no equals sign",
            Self::ParseInvalidLine => "Malformed env line",
            Self::ValidationMissingRequired => "Missing required variable",
            Self::InvalidStringValue => "Invalid string value",
            Self::InvalidBooleanValue => "Invalid boolean value",
            Self::InvalidNumberValue => "Invalid number value",
            Self::CustomValidationFailed => "Custom validation failed",
            Self::ValidationUnknownVariable => "Unknown variable",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A single collected diagnostic.
///
/// Parse diagnostics carry `line` and `raw`; validation diagnostics carry
/// `key` and, when a value was present, `raw`. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarsentryError {
    pub code: ErrorKind,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl VarsentryError {
    pub(crate) fn at_line(code: ErrorKind, line: u32, raw: &str) -> Self {
        Self {
            code,
            message: code.message(),
            key: None,
            line: Some(line),
            raw: Some(raw.to_owned()),
        }
    }

    pub(crate) fn for_key(code: ErrorKind, key: &str, raw: Option<&str>) -> Self {
        Self {
            code,
            message: code.message(),
            key: Some(key.to_owned()),
            line: None,
            raw: raw.map(str::to_owned),
        }
    }
}

impl Display for VarsentryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.key, self.line) {
            (Some(key), _) => write!(f, "{key}: {}", self.message),
            (None, Some(line)) => write!(f, "line {line}: {}", self.message),
            (None, None) => f.write_str(self.message),
        }
    }
}

impl std::error::Error for VarsentryError {}
