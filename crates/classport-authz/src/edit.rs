//! Administrative editing of a target principal's permission tree.
//!
//! [`PermissionEditor`] holds the working copy an admin mutates in the
//! edit-user flow before it is persisted upstream. Edits address exactly
//! one leaf, or bulk-toggle a whole submodule or module. While the target's
//! role is superadmin every edit is rejected: a superadmin's tree is
//! definitionally all-true and not independently editable.

use crate::catalog::{find_module, ModuleSpec};
use crate::normalize::{normalize, RawPermissions};
use crate::role::Role;
use crate::state::{Action, ActionSet, ModuleGrant, PermissionState};

/// The all-or-nothing bulk toggle for one leaf.
///
/// If all four actions are granted the set collapses to all-false;
/// otherwise it expands to all-true. Applying it twice restores the
/// original set only when the input was already uniform, which is exactly
/// what the toggle produces.
pub fn toggled(set: ActionSet) -> ActionSet {
    ActionSet::filled(!set.is_fully_granted())
}

/// Whether every submodule of a branch grant is fully granted.
///
/// Drives the module-level bulk toggle: only a branch whose children are
/// all fully open collapses to closed.
pub fn submodules_fully_granted(grant: &ModuleGrant) -> bool {
    grant
        .submodules()
        .is_some_and(|subs| subs.values().all(ActionSet::is_fully_granted))
}

/// Working copy of a target principal's role and permission tree.
pub struct PermissionEditor<'t> {
    tree: &'t [ModuleSpec],
    role: Role,
    state: PermissionState,
}

impl<'t> PermissionEditor<'t> {
    /// Start editing from an already-normalized state.
    ///
    /// A superadmin target's tree is forced fully open on entry, mirroring
    /// what will be persisted.
    pub fn new(tree: &'t [ModuleSpec], role: Role, state: PermissionState) -> Self {
        let mut editor = Self { tree, role, state };
        if editor.role.is_superadmin() {
            editor.state.grant_all();
        }
        editor
    }

    /// Start editing from a raw stored payload.
    pub fn from_raw(tree: &'t [ModuleSpec], role: Role, raw: &RawPermissions) -> Self {
        Self::new(tree, role, normalize(raw, tree))
    }

    /// The target's current role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The current working tree.
    pub fn state(&self) -> &PermissionState {
        &self.state
    }

    /// Finish editing and take the working tree for persistence.
    pub fn into_state(self) -> PermissionState {
        self.state
    }

    /// Change the target's role.
    ///
    /// Promoting to superadmin forces the working tree fully open so a
    /// subsequent save persists the open tree. Demoting away from
    /// superadmin keeps the forced tree as-is; the pre-promotion grants
    /// are not restored.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        if role.is_superadmin() {
            self.state.grant_all();
        }
    }

    /// Flip one action flag at the addressed leaf.
    ///
    /// Returns whether the edit was applied. Rejected (no-op) for a
    /// superadmin target or an address the catalog does not declare.
    pub fn toggle_action(&mut self, module: &str, action: Action, submodule: Option<&str>) -> bool {
        if self.role.is_superadmin() {
            return false;
        }

        let Some(grant) = self.state.module_mut(module) else {
            return false;
        };

        match (grant, submodule) {
            (ModuleGrant::Leaf(set), None) => {
                set.toggle(action);
                true
            }
            (ModuleGrant::Branch { own, .. }, None) => {
                own.toggle(action);
                true
            }
            (ModuleGrant::Branch { subs, .. }, Some(sub)) => match subs.get_mut(sub) {
                Some(set) => {
                    set.toggle(action);
                    true
                }
                None => false,
            },
            (ModuleGrant::Leaf(_), Some(_)) => false,
        }
    }

    /// Bulk-toggle the addressed leaf, submodule, or whole module.
    ///
    /// A leaf or explicit submodule flips all four of its actions together.
    /// A branch module without a submodule flips every action of every
    /// submodule together; the module's own flags are left alone. Returns
    /// whether the edit was applied.
    pub fn toggle_all(&mut self, module: &str, submodule: Option<&str>) -> bool {
        if self.role.is_superadmin() {
            return false;
        }

        // Reject addresses the catalog does not declare.
        if find_module(self.tree, module).is_none() {
            return false;
        }

        let Some(grant) = self.state.module_mut(module) else {
            return false;
        };

        match (grant, submodule) {
            (ModuleGrant::Leaf(set), None) => {
                *set = toggled(*set);
                true
            }
            (ModuleGrant::Branch { subs, .. }, Some(sub)) => match subs.get_mut(sub) {
                Some(set) => {
                    *set = toggled(*set);
                    true
                }
                None => false,
            },
            (branch @ ModuleGrant::Branch { .. }, None) => {
                let target = !submodules_fully_granted(branch);
                if let ModuleGrant::Branch { subs, .. } = branch {
                    for set in subs.values_mut() {
                        *set = ActionSet::filled(target);
                    }
                }
                true
            }
            (ModuleGrant::Leaf(_), Some(_)) => false,
        }
    }
}
