//! # Classport Observability
//!
//! Console logging bootstrap for portal processes and test harnesses.

mod console;

pub use console::init_console_logging;
