//! Portal roles and their privilege ordering.
//!
//! Roles arrive from the session provider as lowercase strings and are
//! compared by a fixed hierarchy. `superadmin` is special throughout the
//! permission model: its grants are definitionally all-true and cannot be
//! edited per action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

/// The role of a portal principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Parent,
    Staff,
    Admin,
    Superadmin,
}

impl Role {
    /// All roles, lowest privilege first.
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Parent,
        Role::Staff,
        Role::Admin,
        Role::Superadmin,
    ];

    /// The lowercase wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Whether this role bypasses all permission checks.
    #[inline]
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }

    /// Numeric privilege level, higher is more privileged.
    pub fn hierarchy_level(&self) -> u8 {
        match self {
            Role::Student => 0,
            Role::Parent => 1,
            Role::Staff => 2,
            Role::Admin => 3,
            Role::Superadmin => 4,
        }
    }

    /// Whether this role meets a minimum privilege requirement.
    pub fn at_least(&self, minimum: Role) -> bool {
        self.hierarchy_level() >= minimum.hierarchy_level()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Superadmin.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(!Role::Staff.at_least(Role::Admin));
        assert!(!Role::Student.at_least(Role::Parent));
    }

    #[test]
    fn test_parse_role_from_string() {
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert_eq!("parent".parse::<Role>(), Ok(Role::Parent));
        assert_eq!("staff".parse::<Role>(), Ok(Role::Staff));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("superadmin".parse::<Role>(), Ok(Role::Superadmin));
        assert!("invalid".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_wire_names() {
        let json = serde_json::to_string(&Role::Superadmin).unwrap();
        assert_eq!(json, r#""superadmin""#);

        let role: Role = serde_json::from_str(r#""parent""#).unwrap();
        assert_eq!(role, Role::Parent);
    }

    #[test]
    fn test_role_display_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
