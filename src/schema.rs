//! Declarative schema files.
//!
//! A schema file is a JSON or YAML mapping from variable name to rule:
//!
//! ```json
//! {
//!   "PORT": { "type": "number", "required": true },
//!   "API_KEY": { "min_length": 10, "max_length": 10 },
//!   "MODE": { "one_of": ["dev", "prod"] }
//! }
//! ```
//!
//! The `one_of`, `min_length`, `max_length` and `non_empty` checks are folded
//! into the rule's custom predicate, so they see the raw string and fail with
//! `CUSTOM_VALIDATION_FAILED`.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{Schema, VarRule, VarType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    #[serde(rename = "type", default)]
    var_type: VarType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    one_of: Option<Vec<String>>,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    non_empty: bool,
}

impl RuleSpec {
    fn into_rule(self) -> VarRule {
        let mut rule = VarRule::new().var_type(self.var_type);
        if self.required {
            rule = rule.required();
        }

        let RuleSpec {
            one_of,
            min_length,
            max_length,
            non_empty,
            ..
        } = self;
        if one_of.is_none() && min_length.is_none() && max_length.is_none() && !non_empty {
            return rule;
        }

        rule.validate(move |raw| {
            let len = raw.chars().count();
            if non_empty && raw.is_empty() {
                return false;
            }
            if min_length.is_some_and(|min| len < min) {
                return false;
            }
            if max_length.is_some_and(|max| len > max) {
                return false;
            }
            one_of
                .as_ref()
                .is_none_or(|allowed| allowed.iter().any(|candidate| candidate == raw))
        })
    }
}

fn build(specs: IndexMap<String, RuleSpec>) -> Schema {
    specs
        .into_iter()
        .map(|(name, spec)| (name, spec.into_rule()))
        .collect()
}

impl Schema {
    /// Load a schema from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let specs: IndexMap<String, RuleSpec> = serde_json::from_str(input)?;
        Ok(build(specs))
    }

    /// Load a schema from YAML text.
    pub fn from_yaml_str(input: &str) -> Result<Self, Error> {
        let specs: Option<IndexMap<String, RuleSpec>> = serde_yaml::from_str(input)?;
        Ok(build(specs.unwrap_or_default()))
    }

    /// Load a schema file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let schema = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        tracing::debug!(path = %path.display(), variables = schema.len(), "loaded schema");
        Ok(schema)
    }
}
