// Validation pipe for request bodies

use crate::{Record, RuleSet, ValidationErrors};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Why a request body was rejected
#[derive(Error, Debug)]
pub enum PipeError {
    #[error("Invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Validation failed: {} error(s)", .0.len())]
    Invalid(ValidationErrors),
}

impl PipeError {
    /// HTTP status a handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            PipeError::Malformed(_) => 400,
            PipeError::Invalid(_) => 422,
        }
    }

    /// Response body for the rejection
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PipeError::Malformed(err) => serde_json::json!({ "error": format!("Invalid JSON: {}", err) }),
            PipeError::Invalid(errors) => errors.to_json(),
        }
    }
}

/// Parses request bodies and validates them in one step
pub struct ValidationPipe;

impl ValidationPipe {
    /// Deserialize a JSON body and validate it against `rules`
    pub fn parse<T>(body: &[u8], rules: &RuleSet) -> Result<T, PipeError>
    where
        T: DeserializeOwned + Record,
    {
        let parsed: T = serde_json::from_slice(body)?;

        let errors = rules.validate(&parsed);
        if errors.is_empty() {
            Ok(parsed)
        } else {
            debug!(errors = errors.len(), "request body rejected");
            Err(PipeError::Invalid(errors))
        }
    }

    /// Validate a body without binding it to a type.
    ///
    /// Rules address top-level JSON keys. A body that is not a JSON object
    /// resolves no fields, so every rule reports `field not found`.
    pub fn parse_json(body: &[u8], rules: &RuleSet) -> Result<serde_json::Value, PipeError> {
        Self::parse(body, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Email, FieldRule, MinLength, Required, ToValue, Value};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NewsletterForm {
        email: String,
        name: Option<String>,
    }

    impl Record for NewsletterForm {
        fn field(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "email" => Some(self.email.to_value()),
                "name" => Some(self.name.to_value()),
                _ => None,
            }
        }
    }

    fn rules() -> RuleSet {
        RuleSet::new()
            .rule(FieldRule::new("email").with(Required).with(Email))
            .rule(FieldRule::new("name").with(MinLength(2)))
    }

    #[test]
    fn test_valid_body() {
        let form: NewsletterForm =
            ValidationPipe::parse(br#"{"email": "a@b.co"}"#, &rules()).unwrap();
        assert_eq!(form.email, "a@b.co");
        assert!(form.name.is_none());
    }

    #[test]
    fn test_invalid_body() {
        let err = ValidationPipe::parse::<NewsletterForm>(br#"{"email": "nope", "name": "A"}"#, &rules())
            .unwrap_err();

        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.to_json(),
            serde_json::json!({"errors": [
                {"field": "email", "message": "must be a valid email address"},
                {"field": "name", "message": "must be at least 2 characters long"},
            ]})
        );
    }

    #[test]
    fn test_malformed_body() {
        let err = ValidationPipe::parse::<NewsletterForm>(b"{not json", &rules()).unwrap_err();
        assert!(matches!(err, PipeError::Malformed(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_untyped_body() {
        let body = ValidationPipe::parse_json(br#"{"email": "a@b.co", "name": "Ann"}"#, &rules()).unwrap();
        assert_eq!(body["name"], "Ann");

        let err = ValidationPipe::parse_json(b"[1, 2]", &rules()).unwrap_err();
        match err {
            PipeError::Invalid(errors) => {
                assert_eq!(
                    errors.messages_for("email"),
                    vec!["field not found: email"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
