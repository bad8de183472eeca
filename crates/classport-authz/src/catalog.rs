//! Static catalog of permission-gated portal modules.
//!
//! The catalog is pure data: an ordered list of modules, each optionally
//! carrying one level of submodules. Actions live at the leaves; nesting
//! never goes deeper than one level.
//!
//! Normalization, evaluation, and editing are all parameterized by a
//! `&[ModuleSpec]` so tests can run against reduced trees; production code
//! uses [`PORTAL_CATALOG`].

/// A nested unit of functionality under a parent module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmoduleSpec {
    pub id: &'static str,
    pub label: &'static str,
}

/// A top-level unit of functionality gated by permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub subs: &'static [SubmoduleSpec],
}

impl ModuleSpec {
    /// A module without submodules; actions attach directly to it.
    pub const fn leaf(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            subs: &[],
        }
    }

    /// A module whose actions live on its submodules.
    pub const fn branch(
        id: &'static str,
        label: &'static str,
        subs: &'static [SubmoduleSpec],
    ) -> Self {
        Self { id, label, subs }
    }

    /// Whether this module carries submodules.
    #[inline]
    pub fn is_branch(&self) -> bool {
        !self.subs.is_empty()
    }
}

/// The canonical portal catalog.
pub const PORTAL_CATALOG: &[ModuleSpec] = &[
    ModuleSpec::leaf("dashboard", "Dashboard"),
    ModuleSpec::leaf("centre_mgmt", "Centre Management"),
    ModuleSpec::leaf("section_mgmt", "Section Management"),
    ModuleSpec::branch(
        "test_mgmt",
        "Test Management",
        &[
            SubmoduleSpec {
                id: "test_create",
                label: "Test Create",
            },
            SubmoduleSpec {
                id: "test_allotment",
                label: "Test Allotment",
            },
            SubmoduleSpec {
                id: "test_responses",
                label: "Test Responses",
            },
            SubmoduleSpec {
                id: "test_result",
                label: "Test Result",
            },
        ],
    ),
    ModuleSpec::leaf("question_bank", "Question Bank"),
    ModuleSpec::branch(
        "admin_mgmt",
        "Admin Management",
        &[
            SubmoduleSpec {
                id: "admin_system",
                label: "System",
            },
            SubmoduleSpec {
                id: "admin_student",
                label: "Student",
            },
            SubmoduleSpec {
                id: "admin_parent",
                label: "Parent",
            },
            SubmoduleSpec {
                id: "admin_master_data",
                label: "Master Data",
            },
            SubmoduleSpec {
                id: "settings",
                label: "Settings",
            },
        ],
    ),
];

/// Look up a module by id within a catalog.
pub fn find_module<'a>(tree: &'a [ModuleSpec], id: &str) -> Option<&'a ModuleSpec> {
    tree.iter().find(|m| m.id == id)
}
