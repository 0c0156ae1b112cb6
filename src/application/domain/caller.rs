//! Explicit caller identity passed into lifecycle and boundary operations.

use super::UserId;

/// Privileged role held by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallerRole {
    /// Staff member who reviews and decides applications.
    Examiner,
    /// Staff member with read access to all applications.
    Investigator,
    /// Service account acting on behalf of the platform.
    System,
}

/// Identity and roles of the caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: UserId,
    roles: Vec<CallerRole>,
}

impl CallerContext {
    /// Creates a context for a caller without privileged roles.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: Vec::new(),
        }
    }

    /// Grants a role to the caller.
    #[must_use]
    pub fn with_role(mut self, role: CallerRole) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns `true` if the caller holds `role`.
    #[must_use]
    pub fn has_role(&self, role: CallerRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` for examiners.
    #[must_use]
    pub fn is_examiner(&self) -> bool {
        self.has_role(CallerRole::Examiner)
    }

    /// Returns `true` for platform service accounts.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.has_role(CallerRole::System)
    }

    /// Returns `true` for staff allowed to search across all applications.
    #[must_use]
    pub fn can_search(&self) -> bool {
        self.is_examiner() || self.has_role(CallerRole::Investigator)
    }
}
