use std::fmt;

/// Role granted through membership of a named group
///
/// Group names that do not parse into a role grant nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// "IT Staff": full ticket visibility and management
    ItStaff,
    /// "Support Team": works the tickets assigned to them
    SupportTeam,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::ItStaff, Role::SupportTeam];

    /// Name of the group that confers this role
    pub fn group_name(&self) -> &'static str {
        match self {
            Role::ItStaff => "IT Staff",
            Role::SupportTeam => "Support Team",
        }
    }

    /// Exact, case-sensitive match on the group name
    pub fn from_group_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.group_name() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// The authenticated user a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub roles: Vec<Role>,
}

impl Principal {
    /// Build a principal from identity flags and raw group names
    pub fn new<I, S>(
        user_id: i32,
        username: impl Into<String>,
        is_superuser: bool,
        is_staff: bool,
        group_names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles: Vec<Role> = group_names
            .into_iter()
            .filter_map(|name| Role::from_group_name(name.as_ref()))
            .collect();
        roles.sort();
        roles.dedup();

        Self {
            user_id,
            username: username.into(),
            is_superuser,
            is_staff,
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
