//! Repair of raw stored permission payloads.
//!
//! Stored permissions reach the portal in unreliable shapes: a JSON object,
//! a JSON-encoded string, null, or garbage. [`normalize`] is a total
//! function from any of those inputs to a complete [`PermissionState`]:
//! nothing is thrown, malformed input degrades to an all-false tree, and
//! partial input keeps every boolean it already carried.

use crate::catalog::ModuleSpec;
use crate::state::{Action, ActionSet, ModuleGrant, PermissionState};
use classport_core::serde::{parse_embedded_object, value_into_object};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

/// A permission payload as delivered by the session provider, before any
/// shape has been established.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawPermissions {
    /// No payload stored for the principal.
    #[default]
    Missing,
    /// Payload stored as a JSON-encoded string.
    Text(String),
    /// Payload already parsed; may still be any JSON shape.
    Value(Value),
}

impl RawPermissions {
    /// Extract the payload as an object map, degrading malformed input to
    /// an empty map.
    fn to_object(&self) -> Map<String, Value> {
        match self {
            RawPermissions::Missing => Map::new(),
            RawPermissions::Text(text) => {
                let map = parse_embedded_object(text);
                if map.is_empty() && !text.trim().is_empty() && text.trim() != "{}" {
                    debug!("stored permission payload is not a JSON object; starting empty");
                }
                map
            }
            RawPermissions::Value(value) => value_into_object(value.clone()),
        }
    }
}

impl From<Value> for RawPermissions {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawPermissions::Missing,
            Value::String(s) => RawPermissions::Text(s),
            other => RawPermissions::Value(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawPermissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<Value> = Option::deserialize(deserializer)?;
        Ok(opt.map(RawPermissions::from).unwrap_or_default())
    }
}

/// Repair a raw payload into a complete permission state for `tree`.
///
/// For every declared module: an absent entry becomes an all-false grant;
/// a present entry keeps its boolean flags and has only the missing (or
/// non-boolean) keys filled with `false`. Branch modules additionally get
/// every declared submodule repaired the same way. Keys not declared in
/// the catalog are dropped.
///
/// Normalizing an already-normalized state is a no-op.
pub fn normalize(raw: &RawPermissions, tree: &[ModuleSpec]) -> PermissionState {
    let source = raw.to_object();
    let mut state = PermissionState::default();

    for module in tree {
        let entry = source.get(module.id).and_then(Value::as_object);
        if module.is_branch() {
            let own = repair_action_set(entry);
            let subs = module
                .subs
                .iter()
                .map(|sub| {
                    let sub_entry = entry.and_then(|o| o.get(sub.id)).and_then(Value::as_object);
                    (sub.id.to_string(), repair_action_set(sub_entry))
                })
                .collect();
            state.insert(module.id, ModuleGrant::Branch { own, subs });
        } else {
            state.insert(module.id, ModuleGrant::Leaf(repair_action_set(entry)));
        }
    }

    state
}

/// Build a complete action set from a possibly-partial stored object.
///
/// Only strict booleans are honored; anything else counts as absent.
fn repair_action_set(stored: Option<&Map<String, Value>>) -> ActionSet {
    let mut set = ActionSet::default();
    if let Some(obj) = stored {
        for action in Action::ALL {
            if let Some(value) = obj.get(action.as_str()).and_then(Value::as_bool) {
                set.set(action, value);
            }
        }
    }
    set
}
