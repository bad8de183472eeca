//! # Classport Core
//!
//! Shared utilities for the classport portal core.
//!
//! This crate provides the serde helpers used by the session and
//! permission payloads, which arrive from storage in loosely-shaped forms:
//!
//! - [`serde`]: lenient deserialization for embedded-JSON fields
//!
//! # Example
//!
//! ```ignore
//! use classport_core::serde::parse_embedded_object;
//!
//! // A stored payload may be a JSON-encoded string rather than an object.
//! let map = parse_embedded_object(r#"{"dashboard":{"view":true}}"#);
//! assert!(map.contains_key("dashboard"));
//! ```

pub mod serde;
