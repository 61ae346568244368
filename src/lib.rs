// fieldguard - declarative field validation for Rust
//
// Validates records field by field, addressing fields by their external
// (wire) name and collecting every failure into one ordered error list.

//! ```
//! use fieldguard::{Record, RuleSet, FieldRule, Required, MinLength, MaxLength};
//!
//! #[derive(Record)]
//! struct User {
//!     #[field(rename = "first_name")]
//!     name: String,
//!     password: String,
//! }
//!
//! let rules = RuleSet::new()
//!     .rule(FieldRule::new("first_name").with(Required).with(MinLength(3)).with(MaxLength(50)))
//!     .rule(FieldRule::new("password").with(Required).with(MinLength(6)).with(MaxLength(50)));
//!
//! let user = User { name: "John".into(), password: "123456".into() };
//! assert!(rules.validate(&user).is_empty());
//! ```

// Re-export core functionality
pub use fieldguard_core::*;

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use fieldguard_derive::Record;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        FieldError, FieldRule, Record, RuleSet, Schema, ToValue, UploadedFile, Validate,
        ValidationErrors, ValidationOptions, Validator, Value, rules,
    };
}
