//! Action sets and the normalized permission state.
//!
//! A [`PermissionState`] is the fully-repaired, in-memory form of a stored
//! permission payload: every module and submodule declared in the catalog
//! has a complete [`ActionSet`]. It serializes back to the flat wire shape
//! the backend stores (a branch module is one object holding its own four
//! action flags plus one nested object per submodule).

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// One of the four capabilities attached to a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    /// All four actions, in wire order.
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    /// The wire key of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

/// The fixed four-flag capability record attached to a leaf.
///
/// No other actions exist; unknown keys in stored payloads are ignored on
/// read and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionSet {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl ActionSet {
    /// An action set with every flag set to `value`.
    pub const fn filled(value: bool) -> Self {
        Self {
            view: value,
            create: value,
            edit: value,
            delete: value,
        }
    }

    /// Read one flag.
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    /// Write one flag.
    pub fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::View => self.view = value,
            Action::Create => self.create = value,
            Action::Edit => self.edit = value,
            Action::Delete => self.delete = value,
        }
    }

    /// Flip one flag.
    pub fn toggle(&mut self, action: Action) {
        self.set(action, !self.get(action));
    }

    /// Whether all four flags are granted.
    pub fn is_fully_granted(&self) -> bool {
        self.view && self.create && self.edit && self.delete
    }
}

/// The grant held for one catalog module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleGrant {
    /// Module without submodules: one action set.
    Leaf(ActionSet),
    /// Module with submodules: its own action flags plus one set per
    /// submodule. The own flags participate in visibility aggregation but
    /// are not touched by whole-module bulk toggles.
    Branch {
        own: ActionSet,
        subs: BTreeMap<String, ActionSet>,
    },
}

impl ModuleGrant {
    /// The module's own action set (the leaf set, or a branch's own flags).
    pub fn own(&self) -> &ActionSet {
        match self {
            ModuleGrant::Leaf(set) => set,
            ModuleGrant::Branch { own, .. } => own,
        }
    }

    /// The submodule action sets, empty for a leaf.
    pub fn submodules(&self) -> Option<&BTreeMap<String, ActionSet>> {
        match self {
            ModuleGrant::Leaf(_) => None,
            ModuleGrant::Branch { subs, .. } => Some(subs),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ModuleGrant::Leaf(set) => json!(set),
            ModuleGrant::Branch { own, subs } => {
                let mut map = Map::new();
                for action in Action::ALL {
                    map.insert(action.as_str().to_string(), Value::Bool(own.get(action)));
                }
                for (id, set) in subs {
                    map.insert(id.clone(), json!(set));
                }
                Value::Object(map)
            }
        }
    }
}

/// A complete, repaired permission tree keyed by module id.
///
/// Instances come out of normalization or editing; both guarantee that
/// every declared module and submodule carries a full [`ActionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionState {
    modules: BTreeMap<String, ModuleGrant>,
}

impl PermissionState {
    /// Insert or replace a module grant.
    pub(crate) fn insert(&mut self, id: &str, grant: ModuleGrant) {
        self.modules.insert(id.to_string(), grant);
    }

    /// The grant for a module, if declared.
    pub fn module(&self, id: &str) -> Option<&ModuleGrant> {
        self.modules.get(id)
    }

    pub(crate) fn module_mut(&mut self, id: &str) -> Option<&mut ModuleGrant> {
        self.modules.get_mut(id)
    }

    /// The action set addressed by a submodule path, if it exists.
    pub fn submodule_actions(&self, module: &str, sub: &str) -> Option<&ActionSet> {
        match self.modules.get(module)? {
            ModuleGrant::Leaf(_) => None,
            ModuleGrant::Branch { subs, .. } => subs.get(sub),
        }
    }

    /// Iterate modules in stored (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleGrant)> {
        self.modules.iter().map(|(id, grant)| (id.as_str(), grant))
    }

    /// Number of modules held.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are held.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Force every flag in the tree to `true`.
    ///
    /// Applied when a principal's role is superadmin: the persisted tree
    /// must be fully open, not merely treated as open by the evaluator.
    pub fn grant_all(&mut self) {
        for grant in self.modules.values_mut() {
            match grant {
                ModuleGrant::Leaf(set) => *set = ActionSet::filled(true),
                ModuleGrant::Branch { own, subs } => {
                    *own = ActionSet::filled(true);
                    for set in subs.values_mut() {
                        *set = ActionSet::filled(true);
                    }
                }
            }
        }
    }

    /// The flat wire shape the backend stores.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (id, grant) in &self.modules {
            map.insert(id.clone(), grant.to_value());
        }
        Value::Object(map)
    }
}

impl Serialize for PermissionState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
