// Built-in validators
//
// Every validator except `Required` treats an absent value (`Value::Absent` or
// an empty string) as valid, so optional fields are only reported when the
// rule also carries `Required`.

use crate::{UploadedFile, Validator, Value};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Common regex patterns. ASCII classes only: `\d` and `\w` are Unicode-aware
// in the regex crate.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap());

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-]+)+([A-Za-z0-9_.,@?^=%&:/~+#\-]*[A-Za-z0-9_@?^=%&/~+#\-])?$",
    )
    .unwrap()
});

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Content types accepted by [`ImageMime`]
pub const IMAGE_MIME_TYPES: [&str; 4] = ["image/png", "image/jpg", "image/jpeg", "image/svg+xml"];

const INVALID_FILE: &str = "invalid file format";

fn fail(message: impl Into<String>) -> Option<String> {
    Some(message.into())
}

/// Present-value file handle, or the message every file validator reports
/// for a value of the wrong kind.
fn file_of<'a>(value: &Value<'a>) -> Result<&'a UploadedFile, String> {
    value.as_file().ok_or_else(|| INVALID_FILE.to_string())
}

// Presence

/// Validates that a value is present.
///
/// Strings and collections must be non-empty; any other kind only needs to be
/// something other than `Absent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        let missing = match *value {
            Value::Absent => true,
            Value::Text(s) => s.is_empty(),
            Value::List(len) | Value::Map(len) => len == 0,
            _ => false,
        };

        if missing { fail("field is required") } else { None }
    }

    fn name(&self) -> &'static str {
        "required"
    }

    fn is_presence_check(&self) -> bool {
        true
    }
}

// Length

/// Validates minimum length.
///
/// Counts characters (Unicode scalar values, not bytes) for strings and items
/// for collections, so `"żółw"` has length 4 even though it is 8 bytes long.
/// Other kinds pass.
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Validator for MinLength {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match *value {
            Value::Text(s) if s.chars().count() < self.0 => {
                fail(format!("must be at least {} characters long", self.0))
            }
            Value::List(len) | Value::Map(len) if len < self.0 => {
                fail(format!("must have at least {} items", self.0))
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "minLength"
    }
}

/// Validates maximum length.
///
/// Counts characters (Unicode scalar values, not bytes) for strings and items
/// for collections, so `"żółw"` has length 4 even though it is 8 bytes long.
/// Other kinds pass.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl Validator for MaxLength {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match *value {
            Value::Text(s) if s.chars().count() > self.0 => {
                fail(format!("must not exceed {} characters", self.0))
            }
            Value::List(len) | Value::Map(len) if len > self.0 => {
                fail(format!("must not have more than {} items", self.0))
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "maxLength"
    }
}

// Formats

/// Validates email format. Non-string values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator for Email {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        match *value {
            Value::Text(s) if !s.is_empty() && !EMAIL_REGEX.is_match(s) => {
                fail("must be a valid email address")
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

/// Validates an E.164 phone number: `+`, a non-zero digit, then 1 to 14
/// digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phone;

impl Validator for Phone {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match value.as_text() {
            Some(s) if PHONE_REGEX.is_match(s) => None,
            _ => fail("invalid phone number format"),
        }
    }

    fn name(&self) -> &'static str {
        "phone"
    }
}

/// Validates an `http` or `https` URL with a dotted host
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

impl Validator for Url {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match value.as_text() {
            Some(s) if URL_REGEX.is_match(s) => None,
            Some(_) => fail("not a valid URL"),
            None => fail("value is not a string"),
        }
    }

    fn name(&self) -> &'static str {
        "url"
    }
}

// Kinds

/// Validates that the value is a string
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl Validator for StringType {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        match value {
            Value::Absent | Value::Text(_) => None,
            _ => fail("must be a string"),
        }
    }

    fn name(&self) -> &'static str {
        "string"
    }
}

/// Validates that the value is an integer, or a string of ASCII digits.
///
/// Signs, decimal points and separators are rejected. Floats are not
/// numeric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl Validator for Numeric {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match *value {
            Value::Integer(_) | Value::Unsigned(_) => None,
            Value::Text(s) if NUMERIC_REGEX.is_match(s) => None,
            _ => fail("must be numeric"),
        }
    }

    fn name(&self) -> &'static str {
        "numeric"
    }
}

/// Validates a `YYYY-MM-DD` calendar date.
///
/// The string must have the right shape and name a day that exists; the
/// year, month and day range checks run after parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Date;

impl Date {
    fn check(s: &str) -> Result<(), &'static str> {
        if !DATE_REGEX.is_match(s) {
            return Err("invalid date format");
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| "invalid date")?;

        if !(1..=9999).contains(&date.year()) {
            return Err("invalid year");
        }
        if !(1..=12).contains(&date.month()) {
            return Err("invalid month");
        }
        if !(1..=31).contains(&date.day()) {
            return Err("invalid day");
        }

        Ok(())
    }
}

impl Validator for Date {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match value.as_text() {
            Some(s) => Date::check(s).err().map(str::to_string),
            None => fail("invalid date format"),
        }
    }

    fn name(&self) -> &'static str {
        "date"
    }
}

/// Custom regex validator
#[derive(Debug, Clone)]
pub struct Matches(pub Regex);

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }
}

impl Validator for Matches {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        match *value {
            Value::Text(s) if !s.is_empty() && !self.0.is_match(s) => {
                fail("does not match required pattern")
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "matches"
    }
}

// Files

/// Validates that the value is an uploaded file with an `image/*` type
#[derive(Debug, Clone, Copy, Default)]
pub struct Image;

impl Validator for Image {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match file_of(value) {
            Ok(file) if file.is_image() => None,
            Ok(_) => fail("must be an image"),
            Err(message) => Some(message),
        }
    }

    fn name(&self) -> &'static str {
        "image"
    }
}

/// Validates that the value is a PNG, JPG, JPEG or SVG upload.
///
/// The declared content type must match one of [`IMAGE_MIME_TYPES`] exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMime;

impl Validator for ImageMime {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match file_of(value) {
            Ok(file) if IMAGE_MIME_TYPES.contains(&file.content_type.as_str()) => None,
            Ok(_) => fail("must be PNG, JPG, JPEG or SVG"),
            Err(message) => Some(message),
        }
    }

    fn name(&self) -> &'static str {
        "imageMime"
    }
}

/// Validates that the value is an uploaded file of any type
#[derive(Debug, Clone, Copy, Default)]
pub struct File;

impl Validator for File {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        file_of(value).err()
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Validates the size of an uploaded file, in bytes
#[derive(Debug, Clone, Copy)]
pub struct FileSize(pub u64);

impl Validator for FileSize {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        if value.is_absent() {
            return None;
        }

        match file_of(value) {
            Ok(file) if file.size > self.0 => {
                fail(format!("file size must be less than {} bytes", self.0))
            }
            Ok(_) => None,
            Err(message) => Some(message),
        }
    }

    fn name(&self) -> &'static str {
        "fileSize"
    }
}

/// Check the content type of an uploaded file against an allow list.
///
/// The `application/` prefix is stripped and the rest lower-cased before the
/// lookup, so `application/PDF` matches `"pdf"`.
pub fn file_type<S>(value: &Value<'_>, valid_types: &HashSet<String, S>) -> Option<String>
where
    S: std::hash::BuildHasher,
{
    if value.is_absent() {
        return None;
    }

    let file = match file_of(value) {
        Ok(file) => file,
        Err(message) => return Some(message),
    };

    let content_type = file.content_type.as_str();
    let kind = content_type
        .strip_prefix("application/")
        .unwrap_or(content_type)
        .to_lowercase();

    if valid_types.contains(&kind) {
        None
    } else {
        fail("file type is not allowed")
    }
}

/// Validator form of [`file_type`], holding the allow list
#[derive(Debug, Clone, Default)]
pub struct FileType {
    valid_types: HashSet<String>,
}

impl FileType {
    pub fn new<I, S>(valid_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid_types: valid_types.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for FileType {
    fn evaluate(&self, value: &Value<'_>) -> Option<String> {
        file_type(value, &self.valid_types)
    }

    fn name(&self) -> &'static str {
        "fileType"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value<'_> {
        Value::Text(s)
    }

    fn msg(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_required() {
        assert_eq!(Required.evaluate(&text("x")), None);
        assert_eq!(Required.evaluate(&Value::Integer(0)), None);
        assert_eq!(Required.evaluate(&Value::Bool(false)), None);
        assert_eq!(Required.evaluate(&Value::List(1)), None);
        assert_eq!(Required.evaluate(&text("")), msg("field is required"));
        assert_eq!(Required.evaluate(&Value::Absent), msg("field is required"));
        assert_eq!(Required.evaluate(&Value::List(0)), msg("field is required"));
        assert_eq!(Required.evaluate(&Value::Map(0)), msg("field is required"));
    }

    #[test]
    fn test_required_whitespace_is_present() {
        assert_eq!(Required.evaluate(&text("  ")), None);
    }

    #[test]
    fn test_min_length() {
        let validator = MinLength(3);
        assert_eq!(validator.evaluate(&text("John")), None);
        assert_eq!(validator.evaluate(&text("abc")), None);
        assert_eq!(
            validator.evaluate(&text("Jo")),
            msg("must be at least 3 characters long")
        );
        assert_eq!(
            validator.evaluate(&Value::List(2)),
            msg("must have at least 3 items")
        );
        assert_eq!(validator.evaluate(&Value::Integer(1)), None);
    }

    #[test]
    fn test_length_counts_characters() {
        // 4 characters, 8 bytes
        assert_eq!(MaxLength(4).evaluate(&text("żółw")), None);
        assert_eq!(MinLength(4).evaluate(&text("żółw")), None);
        assert_eq!(
            MinLength(5).evaluate(&text("żółw")),
            msg("must be at least 5 characters long")
        );
        assert!(Required.is_presence_check());
        assert!(!MinLength(1).is_presence_check());
    }

    #[test]
    fn test_max_length() {
        let validator = MaxLength(5);
        assert_eq!(validator.evaluate(&text("exact")), None);
        assert_eq!(
            validator.evaluate(&text("sixsix")),
            msg("must not exceed 5 characters")
        );
        assert_eq!(
            validator.evaluate(&Value::Map(6)),
            msg("must not have more than 5 items")
        );
        assert_eq!(validator.evaluate(&Value::List(5)), None);
    }

    #[test]
    fn test_email() {
        assert_eq!(Email.evaluate(&text("a@b.co")), None);
        assert_eq!(Email.evaluate(&text("user+tag@example.com")), None);
        assert_eq!(Email.evaluate(&text("user.name@example.co.uk")), None);
        assert_eq!(
            Email.evaluate(&text("not-an-email")),
            msg("must be a valid email address")
        );
        assert!(Email.evaluate(&text("@example.com")).is_some());
        assert!(Email.evaluate(&text("user@example.c")).is_some());
        assert_eq!(Email.evaluate(&Value::Integer(5)), None);
    }

    #[test]
    fn test_phone() {
        assert_eq!(Phone.evaluate(&text("+14155552671")), None);
        assert_eq!(Phone.evaluate(&text("+12")), None);
        assert_eq!(
            Phone.evaluate(&text("+0123456")),
            msg("invalid phone number format")
        );
        assert!(Phone.evaluate(&text("14155552671")).is_some());
        assert!(Phone.evaluate(&text("+1")).is_some());
        assert!(Phone.evaluate(&text("+1234567890123456")).is_some());
        assert!(Phone.evaluate(&Value::Unsigned(14155552671)).is_some());
    }

    #[test]
    fn test_url() {
        assert_eq!(Url.evaluate(&text("https://example.com")), None);
        assert_eq!(Url.evaluate(&text("http://test.org/path?q=1#top")), None);
        assert_eq!(Url.evaluate(&text("https://sub.example.com/a/b/")), None);
        assert_eq!(Url.evaluate(&text("not a url")), msg("not a valid URL"));
        assert!(Url.evaluate(&text("ftp://example.com")).is_some());
        assert!(Url.evaluate(&text("http://localhost")).is_some());
        assert!(Url.evaluate(&text("//example.com")).is_some());
        assert_eq!(
            Url.evaluate(&Value::Integer(1)),
            msg("value is not a string")
        );
    }

    #[test]
    fn test_string_type() {
        assert_eq!(StringType.evaluate(&text("x")), None);
        assert_eq!(StringType.evaluate(&Value::Integer(1)), msg("must be a string"));
        assert_eq!(StringType.evaluate(&Value::List(1)), msg("must be a string"));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(Numeric.evaluate(&text("12345")), None);
        assert_eq!(Numeric.evaluate(&Value::Integer(-4)), None);
        assert_eq!(Numeric.evaluate(&Value::Unsigned(4)), None);
        assert_eq!(Numeric.evaluate(&text("123.45")), msg("must be numeric"));
        assert_eq!(Numeric.evaluate(&text("-12")), msg("must be numeric"));
        assert_eq!(Numeric.evaluate(&text("1,000")), msg("must be numeric"));
        assert_eq!(Numeric.evaluate(&text("١٢٣")), msg("must be numeric"));
        assert_eq!(Numeric.evaluate(&Value::Float(1.0)), msg("must be numeric"));
    }

    #[test]
    fn test_date() {
        assert_eq!(Date.evaluate(&text("2024-02-29")), None);
        assert_eq!(Date.evaluate(&text("2023-02-30")), msg("invalid date"));
        assert_eq!(Date.evaluate(&text("2023-04-31")), msg("invalid date"));
        assert_eq!(Date.evaluate(&text("2023-13-01")), msg("invalid date"));
        assert_eq!(Date.evaluate(&text("0000-01-01")), msg("invalid year"));
        assert_eq!(Date.evaluate(&text("23-01-01")), msg("invalid date format"));
        assert_eq!(Date.evaluate(&text("2023/01/01")), msg("invalid date format"));
        assert_eq!(
            Date.evaluate(&Value::Integer(20230101)),
            msg("invalid date format")
        );
    }

    #[test]
    fn test_matches() {
        let validator = Matches::new(r"^\d{3}-\d{3}-\d{4}$").unwrap();
        assert_eq!(validator.evaluate(&text("123-456-7890")), None);
        assert_eq!(
            validator.evaluate(&text("invalid")),
            msg("does not match required pattern")
        );
        assert!(Matches::new("(").is_err());
    }

    #[test]
    fn test_image_validators() {
        let gif = UploadedFile::new("a.gif", "image/gif", 10);
        let png = UploadedFile::new("a.png", "image/png", 10);
        let pdf = UploadedFile::new("a.pdf", "application/pdf", 10);

        assert_eq!(Image.evaluate(&Value::File(&gif)), None);
        assert_eq!(Image.evaluate(&Value::File(&pdf)), msg("must be an image"));
        assert_eq!(
            ImageMime.evaluate(&Value::File(&gif)),
            msg("must be PNG, JPG, JPEG or SVG")
        );
        assert_eq!(ImageMime.evaluate(&Value::File(&png)), None);
    }

    #[test]
    fn test_file_validators_reject_other_kinds() {
        for validator in [&Image as &dyn Validator, &ImageMime, &File, &FileSize(10)] {
            assert_eq!(validator.evaluate(&text("a.png")), msg("invalid file format"));
            assert_eq!(validator.evaluate(&Value::Integer(1)), msg("invalid file format"));
        }
    }

    #[test]
    fn test_file_size() {
        let validator = FileSize(1000);
        let big = UploadedFile::new("big.bin", "application/octet-stream", 1500);
        let small = UploadedFile::new("small.bin", "application/octet-stream", 500);
        let edge = UploadedFile::new("edge.bin", "application/octet-stream", 1000);

        assert_eq!(
            validator.evaluate(&Value::File(&big)),
            msg("file size must be less than 1000 bytes")
        );
        assert_eq!(validator.evaluate(&Value::File(&small)), None);
        assert_eq!(validator.evaluate(&Value::File(&edge)), None);
    }

    #[test]
    fn test_file_type() {
        let valid: HashSet<String> = ["pdf", "zip"].iter().map(|s| s.to_string()).collect();
        let pdf = UploadedFile::new("a.pdf", "application/PDF", 10);
        let png = UploadedFile::new("a.png", "image/png", 10);

        assert_eq!(file_type(&Value::File(&pdf), &valid), None);
        assert_eq!(
            file_type(&Value::File(&png), &valid),
            msg("file type is not allowed")
        );
        assert_eq!(file_type(&text("a.pdf"), &valid), msg("invalid file format"));

        let validator = FileType::new(["image/png"]);
        assert_eq!(validator.evaluate(&Value::File(&png)), None);
        assert!(validator.evaluate(&Value::File(&pdf)).is_some());
    }

    #[test]
    fn test_absent_passes_everything_but_required() {
        let validators: Vec<Box<dyn Validator>> = vec![
            Box::new(MinLength(3)),
            Box::new(MaxLength(0)),
            Box::new(Email),
            Box::new(Phone),
            Box::new(Url),
            Box::new(StringType),
            Box::new(Numeric),
            Box::new(Date),
            Box::new(Image),
            Box::new(ImageMime),
            Box::new(File),
            Box::new(FileSize(0)),
            Box::new(FileType::new(["pdf"])),
            Box::new(Matches::new("^x$").unwrap()),
        ];

        for validator in &validators {
            assert_eq!(validator.evaluate(&Value::Absent), None, "{}", validator.name());
            assert_eq!(validator.evaluate(&text("")), None, "{}", validator.name());
        }
    }
}
