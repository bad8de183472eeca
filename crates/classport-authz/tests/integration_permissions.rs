//! End-to-end permission flows: stored payload -> normalize -> evaluate ->
//! edit -> wire shape.

use classport_authz::catalog::PORTAL_CATALOG;
use classport_authz::edit::PermissionEditor;
use classport_authz::evaluate::can_view;
use classport_authz::normalize::{normalize, RawPermissions};
use classport_authz::role::Role;
use classport_authz::state::{Action, ActionSet};
use serde_json::json;

#[test]
fn stored_string_payload_round_trips_through_repair() {
    // A real stored shape: string-encoded, one branch module with only its
    // own view flag set.
    let raw = RawPermissions::Text(r#"{"test_mgmt":{"view":true}}"#.to_string());
    let state = normalize(&raw, PORTAL_CATALOG);

    // The preserved flag and the repaired submodules.
    assert!(state.module("test_mgmt").unwrap().own().view);
    for sub in ["test_create", "test_allotment", "test_responses", "test_result"] {
        assert_eq!(
            *state.submodule_actions("test_mgmt", sub).unwrap(),
            ActionSet::filled(false)
        );
    }

    // The module is reachable through its own flag, no child needed.
    assert!(can_view(&state, Role::Staff, "test_mgmt", None));
    assert!(!can_view(&state, Role::Staff, "test_mgmt", Some("test_create")));

    // Wire shape: exactly the four canonical action keys plus the four
    // submodule objects, nothing fabricated.
    let value = state.to_value();
    let module = value["test_mgmt"].as_object().unwrap();
    assert_eq!(module.len(), 8);
    assert_eq!(module["view"], json!(true));
    assert_eq!(module["create"], json!(false));
}

#[test]
fn admin_edit_flow_persists_the_edited_tree() {
    let raw = RawPermissions::Value(json!({
        "question_bank": {"view": true}
    }));

    let mut editor = PermissionEditor::from_raw(PORTAL_CATALOG, Role::Staff, &raw);
    assert!(editor.toggle_action("question_bank", Action::Create, None));
    assert!(editor.toggle_all("admin_mgmt", Some("settings")));

    let saved = editor.into_state();
    let value = saved.to_value();
    assert_eq!(value["question_bank"]["view"], json!(true));
    assert_eq!(value["question_bank"]["create"], json!(true));
    assert_eq!(
        value["admin_mgmt"]["settings"],
        json!({"view": true, "create": true, "edit": true, "delete": true})
    );

    // What was saved normalizes back to itself.
    let reloaded = normalize(&RawPermissions::Value(value), PORTAL_CATALOG);
    assert_eq!(reloaded, saved);
}

#[test]
fn whole_module_toggle_cycles_between_open_and_closed() {
    let mut editor =
        PermissionEditor::from_raw(PORTAL_CATALOG, Role::Admin, &RawPermissions::Missing);

    // Open every admin_mgmt submodule, then close them, then reopen.
    assert!(editor.toggle_all("admin_mgmt", None));
    let open = editor.state().to_value();
    for sub in ["admin_system", "admin_student", "admin_parent", "admin_master_data", "settings"] {
        assert_eq!(
            open["admin_mgmt"][sub],
            json!({"view": true, "create": true, "edit": true, "delete": true})
        );
    }

    assert!(editor.toggle_all("admin_mgmt", None));
    let closed = editor.state().to_value();
    for sub in ["admin_system", "admin_student", "admin_parent", "admin_master_data", "settings"] {
        assert_eq!(
            closed["admin_mgmt"][sub],
            json!({"view": false, "create": false, "edit": false, "delete": false})
        );
    }
}

#[test]
fn promotion_to_superadmin_saves_a_fully_open_tree() {
    let mut editor =
        PermissionEditor::from_raw(PORTAL_CATALOG, Role::Staff, &RawPermissions::Missing);
    editor.set_role(Role::Superadmin);

    let value = editor.into_state().to_value();
    assert_eq!(value["centre_mgmt"]["delete"], json!(true));
    assert_eq!(value["test_mgmt"]["test_result"]["edit"], json!(true));
}
