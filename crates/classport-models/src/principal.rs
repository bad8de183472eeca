//! The session payload and the normalized principal.
//!
//! The auth provider delivers a [`SessionUser`] at login. Its `permissions`
//! field is whatever storage held: an object, a JSON-encoded string, null,
//! or garbage. [`Principal::from_session`] repairs it into a complete
//! [`PermissionState`] before anything evaluates or edits it.

use classport_authz::catalog::ModuleSpec;
use classport_authz::normalize::{normalize, RawPermissions};
use classport_authz::role::Role;
use classport_authz::state::PermissionState;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A signed-in user exactly as the auth provider delivers it.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "user_type")]
    pub role: Role,
    #[serde(default)]
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    /// Raw stored permissions; normalized before use.
    #[serde(default)]
    pub permissions: RawPermissions,
}

/// The authenticated actor after normalization.
///
/// Mutations of another principal's tree go through the editor in an
/// administrative flow; a principal never edits its own role here.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: UserId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "user_type")]
    pub role: Role,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub permissions: PermissionState,
}

impl Principal {
    /// Build a principal from a session payload, repairing its stored
    /// permissions against `tree`.
    ///
    /// A superadmin's tree is forced fully open so the in-memory state
    /// matches what the evaluator will answer.
    pub fn from_session(session: SessionUser, tree: &[ModuleSpec]) -> Self {
        let mut permissions = normalize(&session.permissions, tree);
        if session.role.is_superadmin() {
            permissions.grant_all();
        }

        Self {
            id: session.id,
            username: session.username,
            first_name: session.first_name,
            last_name: session.last_name,
            email: session.email,
            role: session.role,
            last_login: session.last_login,
            permissions,
        }
    }

    /// Display name: full name when present, username otherwise.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}
