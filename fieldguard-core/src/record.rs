// Field resolution by external name

use crate::{ResolveError, ToValue, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// A value whose fields can be looked up by their external (wire) name.
///
/// Usually derived with `#[derive(Record)]`, which builds a `match` over the
/// external names declared on the struct. A hand-written implementation looks
/// the same:
///
/// ```
/// use fieldguard_core::{Record, ToValue, Value};
///
/// struct Login {
///     user: String,
///     secret: String,
/// }
///
/// impl Record for Login {
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "username" => Some(self.user.to_value()),
///             "password" => Some(self.secret.to_value()),
///             _ => None,
///         }
///     }
/// }
///
/// let login = Login { user: "ada".into(), secret: "hunter2".into() };
/// assert_eq!(login.field("username"), Some(Value::Text("ada")));
/// assert_eq!(login.field("user"), None);
/// ```
pub trait Record {
    /// Look up a field by external name, `None` when no field carries it
    fn field(&self, name: &str) -> Option<Value<'_>>;
}

/// Compile-time list of the external names a record type declares.
///
/// Lets a rule set be checked against a record type before any record is
/// validated, see [`RuleSet::check_fields`](crate::RuleSet::check_fields).
pub trait Schema {
    /// Type name used in error reports
    const NAME: &'static str;

    /// External names, in declaration order
    const FIELD_NAMES: &'static [&'static str];

    /// Whether the type declares the given external name
    fn has_field(name: &str) -> bool {
        Self::FIELD_NAMES.contains(&name)
    }
}

/// Resolve a field by external name.
///
/// Fails with [`ResolveError::FieldNotFound`] carrying the requested name
/// when the record has no such field.
pub fn resolve<'r, R>(record: &'r R, name: &str) -> Result<Value<'r>, ResolveError>
where
    R: Record + ?Sized,
{
    record
        .field(name)
        .ok_or_else(|| ResolveError::FieldNotFound(name.to_string()))
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Rc<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

// A missing record has no fields
impl<R: Record> Record for Option<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.as_ref().and_then(|record| record.field(name))
    }
}

impl<V: ToValue, S: BuildHasher> Record for HashMap<String, V, S> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(ToValue::to_value)
    }
}

impl<V: ToValue> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(ToValue::to_value)
    }
}

/// JSON objects resolve by key; any other JSON value has no fields.
impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.as_object()
            .and_then(|object| object.get(name))
            .map(ToValue::to_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct User {
        name: String,
        age: Option<u32>,
    }

    impl Record for User {
        fn field(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "first_name" => Some(self.name.to_value()),
                "age" => Some(self.age.to_value()),
                _ => None,
            }
        }
    }

    impl Schema for User {
        const NAME: &'static str = "User";
        const FIELD_NAMES: &'static [&'static str] = &["first_name", "age"];
    }

    fn user() -> User {
        User {
            name: "John".to_string(),
            age: None,
        }
    }

    #[test]
    fn test_resolve_by_external_name() {
        let user = user();
        assert_eq!(resolve(&user, "first_name"), Ok(Value::Text("John")));
        assert_eq!(resolve(&user, "age"), Ok(Value::Absent));
    }

    #[test]
    fn test_internal_name_is_not_found() {
        let user = user();
        assert_eq!(
            resolve(&user, "name"),
            Err(ResolveError::FieldNotFound("name".to_string()))
        );
    }

    #[test]
    fn test_resolve_through_pointers() {
        let boxed = Box::new(user());
        assert_eq!(resolve(&boxed, "first_name"), Ok(Value::Text("John")));

        let shared = Arc::new(user());
        let by_ref = &shared;
        assert_eq!(resolve(&by_ref, "first_name"), Ok(Value::Text("John")));
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let missing: Option<User> = None;
        assert!(resolve(&missing, "first_name").is_err());
        assert!(resolve(&Some(user()), "first_name").is_ok());
    }

    #[test]
    fn test_json_record() {
        let body = json!({"email": "a@b.co", "tags": ["x"], "note": null});
        assert_eq!(resolve(&body, "email"), Ok(Value::Text("a@b.co")));
        assert_eq!(resolve(&body, "tags"), Ok(Value::List(1)));
        assert_eq!(resolve(&body, "note"), Ok(Value::Absent));
        assert!(resolve(&body, "phone").is_err());

        // Not an object, so nothing resolves
        assert!(resolve(&json!("plain"), "email").is_err());
        assert!(resolve(&json!([1, 2]), "email").is_err());
    }

    #[test]
    fn test_map_record() {
        let mut form = HashMap::new();
        form.insert("title".to_string(), "Hello".to_string());
        assert_eq!(resolve(&form, "title"), Ok(Value::Text("Hello")));
        assert!(resolve(&form, "body").is_err());
    }

    #[test]
    fn test_schema_lookup() {
        assert!(User::has_field("first_name"));
        assert!(!User::has_field("name"));
    }
}
