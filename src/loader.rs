use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::model::{ParseResult, Schema, ValidateOptions, ValidationResult};
use crate::parser::{parse, parse_bytes, parse_reader};
use crate::validator::validate;

/// Parse a `.env` file with no schema attached.
pub fn check_path(path: impl AsRef<Path>) -> Result<CheckReport, Error> {
    Checker::new().path(path).check()
}

/// Builder-style parse-then-validate pipeline.
#[derive(Debug, Clone)]
pub struct Checker {
    path: PathBuf,
    schema: Option<Schema>,
    options: ValidateOptions,
}

impl Default for Checker {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".env"),
            schema: None,
            options: ValidateOptions::default(),
        }
    }
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.options = self.options.strict(strict);
        self
    }

    /// Read the configured file and run the pipeline over its contents.
    pub fn check(&self) -> Result<CheckReport, Error> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "read env file");

        let parse = parse_bytes(&bytes)?;
        let mut report = self.finish(parse);
        report.source = Some(self.path.clone());
        Ok(report)
    }

    /// Run the pipeline over everything `reader` yields.
    pub fn check_reader<R: Read>(&self, reader: R) -> Result<CheckReport, Error> {
        Ok(self.finish(parse_reader(reader)?))
    }

    /// Run the pipeline over already-read text.
    pub fn check_str(&self, input: &str) -> CheckReport {
        self.finish(parse(input))
    }

    fn finish(&self, parse: ParseResult) -> CheckReport {
        let validation = self
            .schema
            .as_ref()
            .map(|schema| validate(&parse.values, schema, self.options));
        CheckReport {
            source: None,
            parse,
            validation,
        }
    }
}

/// Combined outcome of parsing and optional validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    #[serde(skip)]
    pub source: Option<PathBuf>,
    #[serde(flatten)]
    pub parse: ParseResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl CheckReport {
    pub fn has_parse_errors(&self) -> bool {
        !self.parse.is_clean()
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(|validation| !validation.is_clean())
    }

    /// Process exit code: 0 clean, 1 parse errors, 2 validation errors.
    ///
    /// Parse errors take precedence when both are present.
    pub fn exit_code(&self) -> i32 {
        if self.has_parse_errors() {
            1
        } else if self.has_validation_errors() {
            2
        } else {
            0
        }
    }
}
