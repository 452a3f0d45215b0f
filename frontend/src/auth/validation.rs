use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// local@domain.tld, no whitespace or extra '@' in any part
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
}

impl FieldKind {
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.to_ascii_lowercase().as_str() {
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
}

/// Strips whitespace the way browsers trim form values, byte order marks
/// included.
pub fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Checks one required field. Rules run in a fixed order (required, email
/// shape, password length) and the first failure wins.
pub fn check_field(
    kind: FieldKind,
    value: &str,
    min_password_length: usize,
) -> Result<(), ValidationError> {
    let trimmed = trim_value(value);
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }
    match kind {
        FieldKind::Email if !is_valid_email(trimmed) => Err(ValidationError::InvalidEmail),
        FieldKind::Password if trimmed.chars().count() < min_password_length => {
            Err(ValidationError::PasswordTooShort(min_password_length))
        }
        _ => Ok(()),
    }
}

/// Outcome of one validation pass, one entry per field in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    pub outcomes: Vec<Result<(), ValidationError>>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_err()).count()
    }
}

pub fn validate_fields<I, S>(fields: I, min_password_length: usize) -> FormReport
where
    I: IntoIterator<Item = (FieldKind, S)>,
    S: AsRef<str>,
{
    FormReport {
        outcomes: fields
            .into_iter()
            .map(|(kind, value)| check_field(kind, value.as_ref(), min_password_length))
            .collect(),
    }
}
