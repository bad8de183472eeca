//! Pure visibility and capability checks over a normalized state.
//!
//! These functions are the single input the route guard and sidebar
//! builder consume. They never mutate, never perform I/O, and are total
//! over any normalized state: a missing segment simply evaluates to
//! `false` (or `true` for a superadmin, whose role overrides the tree).

use crate::role::Role;
use crate::state::{Action, ModuleGrant, PermissionState};

/// Whether a branch module is visible through its own flag or any of its
/// submodules.
///
/// A parent module counts as visible when it is directly granted or when
/// any child grants visibility. This is a deliberate OR over the children,
/// so a user granted only `test_mgmt > test_result` still reaches the
/// Test Management area.
pub fn module_visible(state: &PermissionState, module: &str) -> bool {
    match state.module(module) {
        Some(ModuleGrant::Leaf(set)) => set.view,
        Some(ModuleGrant::Branch { own, subs }) => own.view || subs.values().any(|s| s.view),
        None => false,
    }
}

/// Whether `role` may perform `action` on the addressed module or
/// submodule.
///
/// Superadmins pass every check, including for ids the state does not
/// declare at all. With a submodule the addressed leaf's flag decides;
/// addressing a submodule of a leaf module is `false`. Without a
/// submodule the module's own flag decides.
pub fn can(
    state: &PermissionState,
    role: Role,
    module: &str,
    submodule: Option<&str>,
    action: Action,
) -> bool {
    if role.is_superadmin() {
        return true;
    }

    match submodule {
        Some(sub) => state
            .submodule_actions(module, sub)
            .is_some_and(|set| set.get(action)),
        None => state
            .module(module)
            .is_some_and(|grant| grant.own().get(action)),
    }
}

/// Whether `role` may view the addressed module or submodule.
///
/// Unlike [`can`], a view check on a branch module without a submodule
/// argument aggregates over the children via [`module_visible`].
pub fn can_view(state: &PermissionState, role: Role, module: &str, submodule: Option<&str>) -> bool {
    if role.is_superadmin() {
        return true;
    }

    match submodule {
        Some(_) => can(state, role, module, submodule, Action::View),
        None => module_visible(state, module),
    }
}
