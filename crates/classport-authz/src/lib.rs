//! # Classport Authz
//!
//! Hierarchical permission model for the classport portal.
//!
//! Every privileged screen in the portal is gated by the same per-module,
//! per-action permission tree. This crate owns that tree end to end:
//!
//! - [`catalog`]: the static module/submodule catalog
//! - [`role`]: portal roles and their privilege ordering
//! - [`state`]: action sets and the normalized permission state
//! - [`normalize`]: repair of raw stored payloads into a complete state
//! - [`evaluate`]: pure visibility/capability checks
//! - [`edit`]: the administrative bulk-toggle editor
//! - [`nav`]: navigation entries derived from evaluator output
//!
//! # Example
//!
//! ```ignore
//! use classport_authz::{catalog::PORTAL_CATALOG, normalize::{normalize, RawPermissions}};
//! use classport_authz::{evaluate::can_view, role::Role};
//!
//! let raw = RawPermissions::Text(r#"{"question_bank":{"view":true}}"#.into());
//! let state = normalize(&raw, PORTAL_CATALOG);
//!
//! assert!(can_view(&state, Role::Staff, "question_bank", None));
//! assert!(!can_view(&state, Role::Staff, "centre_mgmt", None));
//! ```

pub mod catalog;
pub mod edit;
pub mod evaluate;
pub mod nav;
pub mod normalize;
pub mod role;
pub mod state;

// Re-export commonly used types at crate root
pub use catalog::{ModuleSpec, SubmoduleSpec, PORTAL_CATALOG};
pub use edit::PermissionEditor;
pub use evaluate::{can, can_view};
pub use nav::{visible_entries, NavEntry};
pub use normalize::{normalize, RawPermissions};
pub use role::Role;
pub use state::{Action, ActionSet, ModuleGrant, PermissionState};
