//! Lifecycle events emitted by the dispatcher and folded by the reducer.

use std::fmt;

use crate::model::{Authority, User};

/// Prefix shared by every user-management action type.
pub const ACTION_PREFIX: &str = "userManagement";

/// The kind of operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FetchUsers,
    FetchUser,
    FetchRoles,
    CreateUser,
    UpdateUser,
    DeleteUser,
    Reset,
}

/// Work that must run after an operation succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Re-list users with no pagination options.
    RefreshUsers,
}

impl OperationKind {
    pub const fn action_type(self) -> &'static str {
        match self {
            Self::FetchUsers => "FETCH_USERS",
            Self::FetchUser => "FETCH_USER",
            Self::FetchRoles => "FETCH_ROLES",
            Self::CreateUser => "CREATE_USER",
            Self::UpdateUser => "UPDATE_USER",
            Self::DeleteUser => "DELETE_USER",
            Self::Reset => "RESET",
        }
    }

    /// Reads drive the `loading` flag.
    pub const fn is_read(self) -> bool {
        matches!(self, Self::FetchUsers | Self::FetchUser | Self::FetchRoles)
    }

    /// Mutations drive the `updating` flag.
    pub const fn is_mutation(self) -> bool {
        matches!(self, Self::CreateUser | Self::UpdateUser | Self::DeleteUser)
    }

    /// The single chaining rule: every successful mutation refreshes the user list.
    pub const fn follow_up(self) -> Option<FollowUp> {
        if self.is_mutation() {
            Some(FollowUp::RefreshUsers)
        } else {
            None
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Fulfilled,
    Rejected,
}

impl Phase {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Fulfilled => "FULFILLED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Successful result of an operation, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfilled {
    FetchUsers { users: Vec<User>, total_items: u64 },
    FetchUser(User),
    FetchRoles(Vec<Authority>),
    CreateUser(User),
    UpdateUser(User),
    DeleteUser,
}

impl Fulfilled {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::FetchUsers { .. } => OperationKind::FetchUsers,
            Self::FetchUser(_) => OperationKind::FetchUser,
            Self::FetchRoles(_) => OperationKind::FetchRoles,
            Self::CreateUser(_) => OperationKind::CreateUser,
            Self::UpdateUser(_) => OperationKind::UpdateUser,
            Self::DeleteUser => OperationKind::DeleteUser,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Pending(OperationKind),
    Fulfilled(Fulfilled),
    Rejected {
        kind: OperationKind,
        message: String,
    },
    /// Standalone signal; has no phase.
    Reset,
}

impl LifecycleEvent {
    pub fn rejected(kind: OperationKind, message: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Pending(kind) | Self::Rejected { kind, .. } => *kind,
            Self::Fulfilled(fulfilled) => fulfilled.kind(),
            Self::Reset => OperationKind::Reset,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Pending(_) => Some(Phase::Pending),
            Self::Fulfilled(_) => Some(Phase::Fulfilled),
            Self::Rejected { .. } => Some(Phase::Rejected),
            Self::Reset => None,
        }
    }
}

/// Renders the action type, e.g. `userManagement/FETCH_USERS_PENDING`.
impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase() {
            Some(phase) => write!(f, "{ACTION_PREFIX}/{}_{}", self.kind(), phase.suffix()),
            None => write!(f, "{ACTION_PREFIX}/{}", self.kind()),
        }
    }
}
