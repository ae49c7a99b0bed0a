//! Field-level input checks shared by the coordinators
//!
//! Each check records its failure in a [`ValidationError`] so a single
//! response can report every bad field at once.

use crate::errors::internal::ValidationError;

pub const TITLE_MAX_LEN: usize = 50;
pub const CATEGORY_NAME_MAX_LEN: usize = 50;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

/// Required text: must be present and non-empty after trimming
///
/// Returns the trimmed value.
pub fn clean_required(
    errors: &mut ValidationError,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    Some(trimmed.to_string())
}

/// Required text with an upper bound on its length in characters
pub fn clean_bounded(
    errors: &mut ValidationError,
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    let cleaned = clean_required(errors, field, value)?;
    if cleaned.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
        return None;
    }
    Some(cleaned)
}

pub fn clean_title(errors: &mut ValidationError, value: Option<&str>) -> Option<String> {
    clean_bounded(errors, "title", value, TITLE_MAX_LEN)
}

pub fn clean_category_name(errors: &mut ValidationError, value: Option<&str>) -> Option<String> {
    clean_bounded(errors, "name", value, CATEGORY_NAME_MAX_LEN)
}

/// Usernames: bounded, no whitespace
pub fn clean_username(errors: &mut ValidationError, value: Option<&str>) -> Option<String> {
    let username = clean_bounded(errors, "username", value, USERNAME_MAX_LEN)?;
    if username.chars().any(char::is_whitespace) {
        errors.add("username", "Username may not contain whitespace.");
        return None;
    }
    Some(username)
}

/// Passwords are taken verbatim, only their length is checked
pub fn check_password(errors: &mut ValidationError, value: Option<&str>) -> Option<String> {
    let Some(password) = value else {
        errors.add("password", REQUIRED);
        return None;
    };
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!("Ensure this field has at least {} characters.", PASSWORD_MIN_LEN),
        );
        return None;
    }
    Some(password.to_string())
}
