//! # Classport Models
//!
//! Session and principal models for the classport portal, plus the
//! persistence boundary an administrative flow saves through.
//!
//! - [`ids`]: strongly-typed entity IDs
//! - [`principal`]: the raw session payload and the normalized principal
//! - [`store`]: the one-call-per-principal save boundary
//!
//! # Example
//!
//! ```ignore
//! use classport_models::principal::{Principal, SessionUser};
//! use classport_authz::catalog::PORTAL_CATALOG;
//!
//! let session: SessionUser = serde_json::from_str(payload)?;
//! let principal = Principal::from_session(session, PORTAL_CATALOG);
//! ```

pub mod ids;
pub mod principal;
pub mod store;

// Re-export commonly used types at crate root
pub use ids::UserId;
pub use principal::{Principal, SessionUser};
pub use store::{ProfileStore, SaveError};
