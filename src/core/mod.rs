//! Core episode resolution logic.

pub mod filename;
pub mod placement;
pub mod reconciler;
pub mod resolver;
