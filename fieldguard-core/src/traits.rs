// Validation traits

use crate::{Record, Value, ValidationErrors};

/// A check applied to a single resolved field value.
///
/// Returns `None` when the value passes and `Some(message)` when it fails.
/// Validators never see the field name; the engine attaches it.
pub trait Validator: Send + Sync {
    /// Evaluate a value
    fn evaluate(&self, value: &Value<'_>) -> Option<String>;

    /// Get validator name
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Whether this validator checks that a value is present at all.
    ///
    /// `ValidationOptions::stop_on_required` stops a rule after a presence
    /// check fails.
    fn is_presence_check(&self) -> bool {
        false
    }
}

impl<F> Validator for F
where
    F: Fn(&Value<'_>) -> Option<String> + Send + Sync,
{
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        self(value)
    }
}

/// Trait for types that carry their own rule set
pub trait Validate: Record {
    /// Validate the value and return errors if any
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_validator() {
        let no_spaces = |value: &Value<'_>| match value {
            Value::Text(s) if s.contains(' ') => Some("must not contain spaces".to_string()),
            _ => None,
        };

        assert_eq!(no_spaces.evaluate(&Value::Text("ab")), None);
        assert_eq!(
            no_spaces.evaluate(&Value::Text("a b")),
            Some("must not contain spaces".to_string())
        );
        assert_eq!(no_spaces.name(), "custom");
        assert!(!no_spaces.is_presence_check());
    }
}
