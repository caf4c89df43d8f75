use std::fmt;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::UserDraft;

/// Minimum accepted plaintext password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A field of a [`UserDraft`] that a violation can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Password => write!(f, "password"),
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

impl Violation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Accumulated validation failures for one save attempt.
///
/// An empty set means the draft is acceptable. A non-empty set is a normal
/// outcome, not an exception: the caller rejects the save and reports the
/// reasons against their fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn messages_for(&self, field: Field) -> Vec<&str> {
        self.0
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// Whether a plaintext password must accompany the draft.
///
/// Required on create; on update a password is validated only when the caller
/// is actually changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    Required,
    Optional,
}

/// Validate a (already normalized) draft and return every violation found.
///
/// Duplicate-email detection needs the store and is layered on by the
/// registry; everything checkable from the draft alone happens here.
pub fn validate_draft(draft: &UserDraft, password: PasswordRequirement) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.name.trim().is_empty() {
        errors.push(Violation::new(Field::Name, "cannot be blank"));
    }

    if draft.email.trim().is_empty() {
        errors.push(Violation::new(Field::Email, "cannot be blank"));
    } else if !EmailAddress::is_valid(&draft.email) {
        errors.push(Violation::new(Field::Email, "is not a valid email address"));
    }

    match (&draft.password, password) {
        (None, PasswordRequirement::Required) => {
            errors.push(Violation::new(Field::Password, "cannot be blank"));
        }
        (None, PasswordRequirement::Optional) => {}
        (Some(plaintext), _) => {
            if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
                errors.push(Violation::new(
                    Field::Password,
                    format!("is too short (minimum is {} characters)", MIN_PASSWORD_LENGTH),
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> UserDraft {
        UserDraft::new("Ann", "ann@example.com").with_password("secret1")
    }

    #[test]
    fn test_valid_draft_has_no_violations() {
        let errors = validate_draft(&valid_draft(), PasswordRequirement::Required);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_blank_name_is_only_violation() {
        let mut draft = valid_draft();
        draft.name = "".to_string();

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert_eq!(errors.len(), 1);
        assert!(errors.has(Field::Name));
        assert!(!errors.has(Field::Email));
        assert!(!errors.has(Field::Password));
    }

    #[test]
    fn test_whitespace_only_name_is_blank() {
        let mut draft = valid_draft();
        draft.name = "   ".to_string();

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert!(errors.has(Field::Name));
    }

    #[test]
    fn test_blank_email() {
        let mut draft = valid_draft();
        draft.email = "".to_string();

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert_eq!(errors.messages_for(Field::Email), vec!["cannot be blank"]);
    }

    #[test]
    fn test_malformed_email() {
        for bad in ["not-an-email", "@example.com", "user@"] {
            let mut draft = valid_draft();
            draft.email = bad.to_string();

            let errors = validate_draft(&draft, PasswordRequirement::Required);
            assert!(errors.has(Field::Email), "expected violation for {:?}", bad);
        }
    }

    #[test]
    fn test_short_password() {
        let mut draft = valid_draft();
        draft.password = Some("123".to_string());

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert_eq!(errors.len(), 1);
        assert!(errors.has(Field::Password));
    }

    #[test]
    fn test_password_boundary_lengths() {
        let mut draft = valid_draft();

        draft.password = Some("12345".to_string());
        assert!(validate_draft(&draft, PasswordRequirement::Required).has(Field::Password));

        draft.password = Some("123456".to_string());
        assert!(validate_draft(&draft, PasswordRequirement::Required).is_empty());
    }

    #[test]
    fn test_missing_password_on_create() {
        let mut draft = valid_draft();
        draft.password = None;

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert_eq!(errors.messages_for(Field::Password), vec!["cannot be blank"]);
    }

    #[test]
    fn test_missing_password_allowed_on_update() {
        let mut draft = valid_draft();
        draft.password = None;

        let errors = validate_draft(&draft, PasswordRequirement::Optional);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_short_password_rejected_even_when_optional() {
        let mut draft = valid_draft();
        draft.password = Some("abc".to_string());

        let errors = validate_draft(&draft, PasswordRequirement::Optional);
        assert!(errors.has(Field::Password));
    }

    #[test]
    fn test_violations_accumulate() {
        let draft = UserDraft::new("", "");

        let errors = validate_draft(&draft, PasswordRequirement::Required);
        assert_eq!(errors.len(), 3);
        assert!(errors.has(Field::Name));
        assert!(errors.has(Field::Email));
        assert!(errors.has(Field::Password));
    }

    #[test]
    fn test_display_joins_violations() {
        let mut errors = ValidationErrors::new();
        errors.push(Violation::new(Field::Name, "cannot be blank"));
        errors.push(Violation::new(Field::Email, "is already taken"));

        assert_eq!(
            errors.to_string(),
            "name cannot be blank; email is already taken"
        );
    }
}
