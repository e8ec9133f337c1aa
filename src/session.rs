// Process-wide authenticated-session record. Owned by the application shell
// and passed by reference into access checks and screens.

use serde::{Deserialize, Serialize};

use crate::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    ExistingRespondent,
    NewRespondent,
    Administrator,
}

/// Invariant: `id` is non-empty iff `is_authenticated`. The constructors are
/// the only way the fields change, and they always replace all three at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    id: String,
    role: Option<Role>,
    is_authenticated: bool,
}

impl SessionState {
    /// The empty state the shell starts in and returns to on logout.
    pub fn unauthenticated() -> Self {
        Self {
            id: String::new(),
            role: None,
            is_authenticated: false,
        }
    }

    /// Populate the session after a successful login or registration.
    /// An empty `id` is a caller bug and leaves the session unauthenticated.
    pub fn login(id: impl Into<String>, role: Role) -> Self {
        let id = id.into();
        if id.is_empty() {
            tracing::warn!("refusing to authenticate a session with an empty id");
            return Self::unauthenticated();
        }
        Self {
            id,
            role: Some(role),
            is_authenticated: true,
        }
    }

    /// The administrator session, fixed sentinel id, no network involved.
    pub fn admin() -> Self {
        Self::login(names::ADMIN_USERNAME, Role::Administrator)
    }

    /// Logout: atomic replacement with the empty state.
    pub fn clear(&mut self) {
        *self = Self::unauthenticated();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}
