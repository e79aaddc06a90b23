//! Engine operations, one module per command.
//!
//! Every operation takes the [`DotgatherContext`](crate::DotgatherContext)
//! explicitly; comparison and confirmation are passed in by the caller.

pub mod clean;
pub mod disperse;
pub mod gather;
pub mod setup;
pub mod undo;
