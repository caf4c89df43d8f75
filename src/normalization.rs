use crate::models::UserDraft;

/// Normalize an email address for storage and comparison.
///
/// Every character is case-folded to lowercase. The function is pure and
/// idempotent: applying it twice yields the same result as once.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Normalize a draft in place before validation.
///
/// Runs unconditionally on every save path, create and update alike, so the
/// persisted email is always the lowercase form of whatever was supplied.
pub fn normalize_draft(draft: &mut UserDraft) {
    draft.email = normalize_email(&draft.email);
}
