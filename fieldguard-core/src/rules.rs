// Rule sets and the rule engine

use crate::{
    FieldError, Record, Schema, SchemaError, ValidationErrors, Validator, Value, resolve,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Engine behavior switches.
///
/// Defaults run every validator of every rule. Deserializable so it can be
/// embedded in an application's own configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Stop a rule's remaining validators once a presence check such as
    /// `Required` has failed for it
    pub stop_on_required: bool,

    /// Stop evaluating once this many errors were collected. Zero is
    /// rejected when deserializing.
    pub max_errors: Option<NonZeroUsize>,
}

/// Validators bound to one field, addressed by its external name
#[derive(Clone)]
pub struct FieldRule {
    field: String,
    description: String,
    validators: Vec<Arc<dyn Validator>>,
}

impl FieldRule {
    /// Create an empty rule for a field
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            description: field.clone(),
            field,
            validators: Vec::new(),
        }
    }

    /// Set the human-readable label. Informational only, never part of an
    /// error message.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a validator
    pub fn with<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Append a closure validator
    pub fn check<F>(self, validator: F) -> Self
    where
        F: Fn(&Value<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.with(validator)
    }

    /// External name of the field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable label
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Validators in evaluation order
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Run the rule against a record, appending failures to `errors`
    fn apply<R>(&self, record: &R, options: &ValidationOptions, errors: &mut Vec<FieldError>)
    where
        R: Record + ?Sized,
    {
        let value = match resolve(record, &self.field) {
            Ok(value) => value,
            Err(err) => {
                debug!(field = %self.field, "rule references an unknown field");
                errors.push(FieldError::new(&self.field, err.to_string()));
                return;
            }
        };

        for validator in &self.validators {
            if limit_reached(options, errors) {
                return;
            }

            if let Some(message) = validator.evaluate(&value) {
                trace!(
                    field = %self.field,
                    validator = validator.name(),
                    kind = value.kind(),
                    "validator failed"
                );
                errors.push(FieldError::new(&self.field, message));

                if options.stop_on_required && validator.is_presence_check() {
                    return;
                }
            }
        }
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("description", &self.description)
            .field("validators", &names)
            .finish()
    }
}

fn limit_reached(options: &ValidationOptions, errors: &[FieldError]) -> bool {
    options
        .max_errors
        .is_some_and(|max| errors.len() >= max.get())
}

/// Ordered set of field rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
    options: ValidationOptions,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Replace the engine options
    pub fn options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validate a record and collect every failure.
    ///
    /// Rules run in order. A rule whose field cannot be resolved reports a
    /// single `field not found: <name>` error and its validators are skipped.
    /// Otherwise every validator runs, even after an earlier one failed.
    pub fn validate<R>(&self, record: &R) -> ValidationErrors
    where
        R: Record + ?Sized,
    {
        let mut errors = Vec::new();

        for rule in &self.rules {
            if limit_reached(&self.options, &errors) {
                break;
            }
            rule.apply(record, &self.options, &mut errors);
        }

        debug!(
            rules = self.rules.len(),
            errors = errors.len(),
            "validation finished"
        );

        ValidationErrors::new(errors)
    }

    /// Validate a record, `Ok(())` when every rule passes
    pub fn check<R>(&self, record: &R) -> Result<(), ValidationErrors>
    where
        R: Record + ?Sized,
    {
        self.validate(record).into_result()
    }

    /// Report the rule fields the record type does not declare
    pub fn check_fields<S: Schema>(&self) -> Result<(), SchemaError> {
        let unknown: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| !S::has_field(&rule.field))
            .map(|rule| rule.field.clone())
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SchemaError {
                record: S::NAME,
                fields: unknown,
            })
        }
    }
}

impl FromIterator<FieldRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = FieldRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
            options: ValidationOptions::default(),
        }
    }
}

impl From<Vec<FieldRule>> for RuleSet {
    fn from(rules: Vec<FieldRule>) -> Self {
        rules.into_iter().collect()
    }
}

/// Validate a record against a list of rules with default options
pub fn validate<R>(record: &R, rules: &[FieldRule]) -> ValidationErrors
where
    R: Record + ?Sized,
{
    let options = ValidationOptions::default();
    let mut errors = Vec::new();

    for rule in rules {
        rule.apply(record, &options, &mut errors);
    }

    ValidationErrors::new(errors)
}

/// Build a [`RuleSet`] from field names and validator lists.
///
/// ```
/// use fieldguard_core::{rules, MaxLength, MinLength, Required};
///
/// let rules = rules![
///     "name" => [Required, MinLength(3), MaxLength(50)],
///     "password" => [Required, MinLength(6)],
/// ];
/// assert_eq!(rules.rules().len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    ($($field:expr => [$($validator:expr),* $(,)?]),* $(,)?) => {{
        $crate::RuleSet::new()
            $(.rule($crate::FieldRule::new($field)$(.with($validator))*))*
    }};
}
