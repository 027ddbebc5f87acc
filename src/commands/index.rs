//! The `index` command: build a Packages index from a directory of .ipk files.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::index;

/// Scan `dir` for packages and write the rendered index to `output`, or to
/// stdout when no output path is given.
///
/// The index itself goes to stdout so it can be piped; progress and the
/// summary line go to stderr.
pub fn index(dir: &Path, output: Option<&Path>) -> Result<()> {
    let files = index::scan_packages(dir)?;

    if files.is_empty() {
        eprintln!("No .ipk packages found under {}", dir.display());
        return Ok(());
    }

    let pb = if std::io::stderr().is_terminal() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")?
                .progress_chars("#>-"),
        );
        pb.set_message("Indexing");
        pb
    } else {
        ProgressBar::hidden()
    };

    let built = index::render_entries(&files, || pb.inc(1));
    pb.finish_and_clear();

    match output {
        Some(path) => std::fs::write(path, &built.text)
            .with_context(|| format!("failed to write index to {}", path.display()))?,
        None => print!("{}", built.text),
    }

    let mut summary = format!("{} packages indexed", built.packages);
    if built.skipped > 0 {
        summary.push_str(&format!(", {} skipped", built.skipped));
    }
    eprintln!("{} {}", "✓".green(), summary.bold());

    Ok(())
}
