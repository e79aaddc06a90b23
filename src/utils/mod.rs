//! Utility functions and helpers.
//!
//! - [`paths`]: directory creation and the copy primitives every engine uses

/// File and tree copy helpers
pub mod paths;
