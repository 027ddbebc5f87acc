//! Packages index generation from a directory of .ipk archives.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::extract;

/// A built Packages index plus bookkeeping for the summary line.
#[derive(Debug)]
pub struct Index {
    pub text: String,
    pub packages: usize,
    pub skipped: usize,
}

/// Collect every .ipk file under `dir`, sorted by path.
///
/// Sorting keeps index output deterministic across runs and filesystems.
pub fn scan_packages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut packages = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry =
            entry.with_context(|| format!("failed to scan directory: {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "ipk")
        {
            packages.push(entry.into_path());
        }
    }

    packages.sort();
    Ok(packages)
}

/// Resolve, parse, and render the given packages into index entries.
///
/// Packages are processed in parallel; each resolution is independent and
/// opens its own handles. An unreadable package is logged and skipped so one
/// corrupt archive cannot sink a whole index run. `progress` is invoked once
/// per package, readable or not.
pub fn render_entries(files: &[PathBuf], progress: impl Fn() + Sync) -> Index {
    let entries: Vec<Option<String>> = files
        .par_iter()
        .map(|path| {
            let rendered = match extract::read_package(path) {
                Ok(record) => Some(record.render()),
                Err(err) => {
                    tracing::warn!("skipping {}: {}", path.display(), err);
                    None
                }
            };
            progress();
            rendered
        })
        .collect();

    let packages = entries.iter().flatten().count();
    let skipped = entries.len() - packages;

    // Each rendered entry already ends with a newline, so a single join
    // separator yields the blank line between entries.
    let text = entries
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n");

    Index {
        text,
        packages,
        skipped,
    }
}

/// Build a complete index for a directory tree of packages.
pub fn build_index(dir: &Path) -> Result<Index> {
    let files = scan_packages(dir)?;
    Ok(render_entries(&files, || {}))
}
