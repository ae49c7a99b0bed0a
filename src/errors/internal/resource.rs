use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Ticket,
    Comment,
    Category,
    User,
    Group,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Ticket => "Ticket",
            ResourceKind::Comment => "Comment",
            ResourceKind::Category => "Category",
            ResourceKind::User => "User",
            ResourceKind::Group => "Group",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    /// A unique name is already taken
    #[error("{kind} already exists: {value}")]
    Conflict { kind: ResourceKind, value: String },
}
