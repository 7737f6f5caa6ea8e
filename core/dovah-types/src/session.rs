//! Session and account types.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The account behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the account may see private files and tags.
    #[serde(default)]
    pub has_private_access: bool,
}

impl User {
    /// Creates a user with only the required fields set.
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            avatar: None,
            is_admin: false,
            has_private_access: false,
        }
    }
}

#[derive(Deserialize)]
struct RawSession {
    #[serde(default)]
    authenticated: bool,
    #[serde(default)]
    user: Option<User>,
}

/// Current authentication state.
///
/// Never partially populated: `authenticated` is true exactly when a user is
/// present. Server responses claiming authentication without a user record
/// collapse to anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSession")]
pub struct Session {
    authenticated: bool,
    user: Option<User>,
}

impl From<RawSession> for Session {
    fn from(raw: RawSession) -> Self {
        match raw.user {
            Some(user) if raw.authenticated => Self::authenticated(user),
            _ => Self::anonymous(),
        }
    }
}

impl Session {
    /// A session with no user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    /// A session for the given user.
    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Login form payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when either field is blank after trimming the username.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.username.trim().is_empty() || self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
