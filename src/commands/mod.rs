//! Command implementations for the ipkdex CLI
//!
//! This module contains all command implementations organized by functional area:
//!
//! - **query**: Single-package inspection (index entry, raw control text)
//! - **index**: Packages index generation over a directory tree

pub mod index;
pub mod query;

pub use index::index;
pub use query::{cat_control, info};
