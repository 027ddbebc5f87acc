//! Query commands for inspecting a single package archive.
//!
//! These are read-only commands that resolve one .ipk file and display its
//! metadata in one form or another.

use std::path::Path;

use anyhow::{Context, Result};

use crate::extract;

/// Show a package's rendered index entry, or the full record as JSON.
pub fn info(package: &Path, json: bool) -> Result<()> {
    let record = extract::read_package(package)
        .with_context(|| format!("failed to read package metadata from {}", package.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", record.render());
    }

    Ok(())
}

/// Print the raw control file text exactly as stored in the package.
pub fn cat_control(package: &Path) -> Result<()> {
    let bytes = extract::extract_control(package)
        .with_context(|| format!("failed to extract control file from {}", package.display()))?;
    print!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
