//! Parse `.env` files and validate them against a schema.
//!
//! [`parse`] turns text into raw key/value pairs and collects every
//! malformed line instead of stopping at the first one. [`validate`] checks
//! those pairs against a [`Schema`], coercing declared types and collecting
//! every failure the same way. Neither function performs I/O.
//!
//! [`Checker`] wraps both behind file reading for command-line use.

mod error;
mod loader;
mod model;
mod parser;
mod schema;
mod validator;

pub use error::{Error, ErrorKind, VarsentryError};
pub use loader::{CheckReport, Checker, check_path};
pub use model::{
    ParseResult, Predicate, Schema, ValidateOptions, ValidationResult, Value, VarRule, VarType,
};
pub use parser::{parse, parse_bytes, parse_reader};
pub use validator::validate;
