use indexmap::IndexMap;

use crate::error::{ErrorKind, VarsentryError};
use crate::model::{Schema, ValidateOptions, ValidationResult};

/// Validate parsed values against a schema.
///
/// Declared keys are checked in schema order: presence, then type coercion,
/// then the rule's custom predicate on the raw string. With
/// [`ValidateOptions::strict`], input keys the schema does not declare are
/// reported afterwards in input order. A key lands in
/// [`ValidationResult::values`] only when it produced no error.
pub fn validate(
    input: &IndexMap<String, String>,
    schema: &Schema,
    options: ValidateOptions,
) -> ValidationResult {
    let mut values = IndexMap::new();
    let mut errors = Vec::new();

    for (key, rule) in schema.iter() {
        let Some(raw) = input.get(key) else {
            if rule.required {
                errors.push(VarsentryError::for_key(
                    ErrorKind::ValidationMissingRequired,
                    key,
                    None,
                ));
            }
            continue;
        };

        let Some(coerced) = rule.var_type.coerce(raw) else {
            tracing::trace!(key, var_type = %rule.var_type, "type coercion failed");
            errors.push(VarsentryError::for_key(
                rule.var_type.error_kind(),
                key,
                Some(raw.as_str()),
            ));
            continue;
        };

        if let Some(check) = &rule.validate
            && !check.test(raw)
        {
            errors.push(VarsentryError::for_key(
                ErrorKind::CustomValidationFailed,
                key,
                Some(raw.as_str()),
            ));
            continue;
        }

        values.insert(key.to_owned(), coerced);
    }

    if options.strict {
        for (key, raw) in input {
            if !schema.contains_key(key) {
                errors.push(VarsentryError::for_key(
                    ErrorKind::ValidationUnknownVariable,
                    key,
                    Some(raw.as_str()),
                ));
            }
        }
    }

    tracing::debug!(
        declared = schema.len(),
        valid = values.len(),
        errors = errors.len(),
        strict = options.strict,
        "validated values against schema"
    );

    ValidationResult { values, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Value, VarRule};

    fn input(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn reports_missing_required_variable() {
        let schema = Schema::new().var("FOO", VarRule::new().required());
        let result = validate(&input(&[]), &schema, ValidateOptions::default());

        assert!(result.values.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorKind::ValidationMissingRequired);
        assert_eq!(result.errors[0].key.as_deref(), Some("FOO"));
        assert_eq!(result.errors[0].message, "Missing required variable");
        assert_eq!(result.errors[0].raw, None);
    }

    #[test]
    fn optional_missing_variable_is_silent() {
        let schema = Schema::new().var("FOO", VarRule::number());
        let result = validate(&input(&[]), &schema, ValidateOptions::default());

        assert!(result.is_clean());
        assert!(result.values.is_empty());
    }

    #[test]
    fn defaults_to_string_type() {
        let schema = Schema::new().var("FOO", VarRule::new());
        let result = validate(&input(&[("FOO", "bar")]), &schema, ValidateOptions::default());

        assert!(result.is_clean());
        assert_eq!(result.values["FOO"], Value::String("bar".to_owned()));
    }

    #[test]
    fn coerces_numbers_and_booleans() {
        let schema = Schema::new()
            .var("PORT", VarRule::number())
            .var("ENABLED", VarRule::boolean())
            .var("DEBUG", VarRule::boolean());
        let result = validate(
            &input(&[("PORT", "3000"), ("ENABLED", "true"), ("DEBUG", "false")]),
            &schema,
            ValidateOptions::default(),
        );

        assert!(result.is_clean());
        assert_eq!(result.values["PORT"], Value::Number(3000.0));
        assert_eq!(result.values["ENABLED"], Value::Boolean(true));
        assert_eq!(result.values["DEBUG"], Value::Boolean(false));
    }

    #[test]
    fn reports_type_specific_errors_with_raw_value() {
        let schema = Schema::new()
            .var("PORT", VarRule::number())
            .var("ENABLED", VarRule::boolean());
        let result = validate(
            &input(&[("PORT", "abc"), ("ENABLED", "yes")]),
            &schema,
            ValidateOptions::default(),
        );

        assert!(result.values.is_empty());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].code, ErrorKind::InvalidNumberValue);
        assert_eq!(result.errors[0].raw.as_deref(), Some("abc"));
        assert_eq!(result.errors[1].code, ErrorKind::InvalidBooleanValue);
        assert_eq!(result.errors[1].message, "Invalid boolean value");
    }

    #[test]
    fn empty_string_is_not_a_number() {
        let schema = Schema::new().var("PORT", VarRule::number());
        let result = validate(&input(&[("PORT", "")]), &schema, ValidateOptions::default());

        assert_eq!(result.errors[0].code, ErrorKind::InvalidNumberValue);
    }

    #[test]
    fn custom_predicate_sees_raw_string() {
        let schema = Schema::new().var("API_KEY", VarRule::new().validate(|v| v.len() == 10));

        let ok = validate(
            &input(&[("API_KEY", "1234567890")]),
            &schema,
            ValidateOptions::default(),
        );
        assert!(ok.is_clean());
        assert_eq!(ok.values["API_KEY"], Value::String("1234567890".to_owned()));

        let bad = validate(&input(&[("API_KEY", "short")]), &schema, ValidateOptions::default());
        assert!(bad.values.is_empty());
        assert_eq!(bad.errors[0].code, ErrorKind::CustomValidationFailed);
        assert_eq!(bad.errors[0].raw.as_deref(), Some("short"));
    }

    #[test]
    fn predicate_runs_on_raw_text_of_numbers() {
        // "08" coerces to 8, but the predicate still sees the leading zero.
        let schema = Schema::new().var(
            "RETRIES",
            VarRule::number().validate(|raw| !raw.starts_with('0')),
        );
        let result = validate(&input(&[("RETRIES", "08")]), &schema, ValidateOptions::default());

        assert_eq!(result.errors[0].code, ErrorKind::CustomValidationFailed);
    }

    #[test]
    fn type_check_runs_before_predicate() {
        let schema = Schema::new().var("PORT", VarRule::number().validate(|_| false));
        let result = validate(&input(&[("PORT", "abc")]), &schema, ValidateOptions::default());

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorKind::InvalidNumberValue);
    }

    #[test]
    fn strict_mode_reports_unknown_variables_after_declared_errors() {
        let schema = Schema::new()
            .var("FOO", VarRule::new())
            .var("NEEDED", VarRule::new().required());
        let values = input(&[("EXTRA", "x"), ("FOO", "bar"), ("OTHER", "y")]);

        let result = validate(&values, &schema, ValidateOptions::new().strict(true));
        let codes: Vec<_> = result.errors.iter().map(|err| err.code).collect();
        assert_eq!(
            codes,
            [
                ErrorKind::ValidationMissingRequired,
                ErrorKind::ValidationUnknownVariable,
                ErrorKind::ValidationUnknownVariable,
            ]
        );
        assert_eq!(result.errors[1].key.as_deref(), Some("EXTRA"));
        assert_eq!(result.errors[1].raw.as_deref(), Some("x"));
        assert_eq!(result.errors[2].key.as_deref(), Some("OTHER"));
        assert_eq!(result.values.len(), 1);
        assert!(!result.values.contains_key("EXTRA"));
    }

    #[test]
    fn unknown_variables_are_ignored_by_default() {
        let schema = Schema::new().var("FOO", VarRule::new());
        let result = validate(
            &input(&[("FOO", "bar"), ("EXTRA", "x")]),
            &schema,
            ValidateOptions::default(),
        );

        assert!(result.is_clean());
        assert_eq!(result.values.len(), 1);
        assert_eq!(result.values["FOO"], Value::String("bar".to_owned()));
    }

    #[test]
    fn errors_follow_schema_order() {
        let schema = Schema::new()
            .var("B", VarRule::number())
            .var("A", VarRule::boolean());
        let result = validate(
            &input(&[("A", "nope"), ("B", "nope")]),
            &schema,
            ValidateOptions::default(),
        );

        let keys: Vec<_> = result
            .errors
            .iter()
            .map(|err| err.key.as_deref())
            .collect();
        assert_eq!(keys, [Some("B"), Some("A")]);
    }
}
