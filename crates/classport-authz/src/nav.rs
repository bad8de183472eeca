//! Navigation entries derived from evaluator output.
//!
//! The sidebar and route guard consume nothing but these entries; the
//! permission model has no other coupling to rendering or routing.

use crate::catalog::ModuleSpec;
use crate::evaluate::can_view;
use crate::role::Role;
use crate::state::PermissionState;
use serde::Serialize;

/// Module ids every signed-in principal may reach regardless of grants.
pub const ALWAYS_VISIBLE: &[&str] = &["dashboard"];

/// One navigable entry, with the submodule entries the principal may open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub children: Vec<NavEntry>,
}

/// Build the navigable entry list for a principal.
///
/// A module is listed when it is always-visible or the evaluator grants
/// it; a branch entry lists only the submodules whose own view flag is
/// granted. Superadmins see the full catalog.
pub fn visible_entries(tree: &[ModuleSpec], state: &PermissionState, role: Role) -> Vec<NavEntry> {
    tree.iter()
        .filter(|module| {
            ALWAYS_VISIBLE.contains(&module.id) || can_view(state, role, module.id, None)
        })
        .map(|module| NavEntry {
            id: module.id,
            label: module.label,
            children: module
                .subs
                .iter()
                .filter(|sub| can_view(state, role, module.id, Some(sub.id)))
                .map(|sub| NavEntry {
                    id: sub.id,
                    label: sub.label,
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect()
}
