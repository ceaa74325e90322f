use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ErrorKind, VarsentryError};

/// Output of [`parse`](crate::parse).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParseResult {
    /// Raw values keyed by trimmed name, in first-occurrence order.
    pub values: IndexMap<String, String>,
    pub errors: Vec<VarsentryError>,
    #[serde(rename = "lineCount")]
    pub line_count: usize,
}

impl ParseResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Output of [`validate`](crate::validate).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationResult {
    /// Coerced values for keys that produced no error.
    pub values: IndexMap<String, Value>,
    pub errors: Vec<VarsentryError>,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Options for [`validate`](crate::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateOptions {
    /// Report input keys the schema does not declare.
    pub strict: bool,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Declared primitive type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    #[default]
    String,
    Number,
    Boolean,
}

impl VarType {
    /// Convert a raw value, returning `None` when it is not valid for this type.
    ///
    /// Numbers must be finite and use Rust float syntax with no surrounding
    /// whitespace. Booleans are exactly `true` or `false`.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(raw.to_owned())),
            Self::Number => raw
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Value::Number),
            Self::Boolean => match raw {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
        }
    }

    /// Diagnostic emitted when [`VarType::coerce`] fails.
    pub fn error_kind(self) -> ErrorKind {
        match self {
            Self::String => ErrorKind::InvalidStringValue,
            Self::Number => ErrorKind::InvalidNumberValue,
            Self::Boolean => ErrorKind::InvalidBooleanValue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            // Integral numbers render as `3000`, not `3000.0`.
            Self::Number(value)
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 =>
            {
                serializer.serialize_i64(*value as i64)
            }
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::Boolean(value) => serializer.serialize_bool(*value),
        }
    }
}

/// Custom check applied to the raw, uncoerced value.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn test(&self, raw: &str) -> bool {
        (self.0)(raw)
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Validation rule for a single variable.
#[derive(Debug, Clone, Default)]
pub struct VarRule {
    pub var_type: VarType,
    pub required: bool,
    pub validate: Option<Predicate>,
}

impl VarRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string() -> Self {
        Self::new().var_type(VarType::String)
    }

    pub fn number() -> Self {
        Self::new().var_type(VarType::Number)
    }

    pub fn boolean() -> Self {
        Self::new().var_type(VarType::Boolean)
    }

    pub fn var_type(mut self, var_type: VarType) -> Self {
        self.var_type = var_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validate(mut self, check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Some(Predicate::new(check));
        self
    }
}

/// Variable rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: IndexMap<String, VarRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable. Redeclaring a name replaces its rule in place.
    pub fn var(mut self, name: impl Into<String>, rule: VarRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&VarRule> {
        self.rules.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, VarRule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, VarRule)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        }
    }
}
