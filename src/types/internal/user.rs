use crate::types::db::user;

/// A user with group membership resolved from the membership table
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub user: user::Model,
    pub groups: Vec<String>,
}

/// Client input for a new account, not yet validated
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub groups: Option<Vec<String>>,
}

/// Client input for an account update; `groups` replaces memberships
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub groups: Option<Vec<String>>,
}
