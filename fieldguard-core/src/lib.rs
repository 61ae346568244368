//! Rule engine and built-in validators for fieldguard
//!
//! Validates records field by field. Fields are addressed by their external
//! (wire) name, each field carries an ordered list of validators, and every
//! failure is collected into one ordered error list.
//!
//! # Examples
//!
//! ## Validating a record
//!
//! ```
//! use fieldguard_core::{FieldError, FieldRule, MinLength, Record, Required, RuleSet, ToValue, Value};
//!
//! struct User {
//!     name: String,
//!     password: String,
//! }
//!
//! impl Record for User {
//!     fn field(&self, name: &str) -> Option<Value<'_>> {
//!         match name {
//!             "first_name" => Some(self.name.to_value()),
//!             "password" => Some(self.password.to_value()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let rules = RuleSet::new()
//!     .rule(FieldRule::new("first_name").describe("Name").with(Required).with(MinLength(3)))
//!     .rule(FieldRule::new("password").with(Required).with(MinLength(6)));
//!
//! let user = User { name: "Jo".into(), password: "123456".into() };
//! let errors = rules.validate(&user);
//! assert_eq!(
//!     errors.errors,
//!     vec![FieldError::new("first_name", "must be at least 3 characters long")]
//! );
//! ```
//!
//! ## Validating a JSON body
//!
//! ```
//! use fieldguard_core::{rules, Email, Required};
//!
//! let rules = rules!["email" => [Required, Email]];
//! let body = serde_json::json!({"email": "not-an-email"});
//!
//! let errors = rules.validate(&body);
//! assert_eq!(errors.messages_for("email"), vec!["must be a valid email address"]);
//! ```
//!
//! ## Single validators
//!
//! ```
//! use fieldguard_core::{Date, FileSize, UploadedFile, Validator, Value};
//!
//! assert_eq!(Date.evaluate(&Value::Text("2023-02-30")), Some("invalid date".to_string()));
//!
//! let upload = UploadedFile::new("scan.pdf", "application/pdf", 1500);
//! assert!(FileSize(1000).evaluate(&Value::File(&upload)).is_some());
//! ```

mod errors;
mod pipe;
mod record;
mod rules;
mod traits;
mod validators;
mod value;

pub use errors::*;
pub use pipe::*;
pub use record::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
pub use value::*;
