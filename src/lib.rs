//! Library interface for the ipkdex package index tool
//!
//! This library exposes the container resolution and control parsing
//! pipeline for testing and embedding.

pub mod control;
pub mod error;
pub mod extract;
pub mod index;

// Re-export the core pipeline types
pub use control::{ControlField, ControlRecord};
pub use error::{IpkError, Result};
pub use extract::{extract_control, read_package};
