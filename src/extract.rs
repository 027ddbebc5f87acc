//! Nested container resolution for .ipk package archives.
//!
//! An .ipk file is an `ar` archive wrapping a handful of members:
//!
//! ```text
//! package_1.0.0_mips.ipk        (ar, or tar for legacy builds)
//!   debian-binary
//!   control.tar.gz              (gzip-compressed tar, sometimes plain)
//!     ./control                 (plain-text metadata)
//!     ./postinst, ...
//!   data.tar.gz
//! ```
//!
//! This module digs the `control` file out of that nesting:
//! - **Opens** the outer container, trying `ar` first and falling back to
//!   `tar` (some legacy build systems emit a gzipped tar instead of `ar`)
//! - **Locates** the control archive member leniently, tolerating `./`
//!   prefixes and trailing-slash artifacts in member names
//! - **Decompresses** the member in memory when it carries a `.gz` suffix
//! - **Extracts** the `control` member from the inner tar
//!
//! Everything happens on in-memory buffers scoped to the call; nothing is
//! written to disk and no handle outlives the resolution.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::control::ControlRecord;
use crate::error::{IpkError, Result};

/// Gzip magic bytes, used to recognize a gzip-compressed outer tar.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Outer container formats, in the order they are attempted.
const OUTER_FORMATS: [(&str, fn(&[u8]) -> std::io::Result<OuterScan>); 2] =
    [("ar", scan_ar), ("tar", scan_tar)];

/// Result of enumerating one outer container: the control archive member
/// (if any) and every member name seen, kept for diagnostics.
#[derive(Debug)]
struct OuterScan {
    control: Option<(String, Vec<u8>)>,
    members: Vec<String>,
}

/// Resolve the raw bytes of the `control` file inside a package archive.
pub fn extract_control(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|source| IpkError::UnreadableContainer {
        detail: format!("failed to read {}", path.display()),
        source,
    })?;

    let scan = scan_outer(&data)?;
    let (name, bytes) = scan.control.ok_or(IpkError::MissingControlArchive {
        members: scan.members,
    })?;
    tracing::debug!("found control archive member '{}' in {}", name, path.display());

    let inner = if name.trim_end_matches('/').ends_with(".gz") {
        gunzip(&bytes).map_err(IpkError::Decompression)?
    } else {
        bytes
    };

    control_from_tar(&inner)
}

/// Resolve and parse a package archive into a [`ControlRecord`].
///
/// The record's `filename` is the basename of `path`. Control text is
/// decoded lossily; packages with stray non-UTF-8 bytes in their metadata
/// still yield a usable record.
pub fn read_package(path: &Path) -> Result<ControlRecord> {
    let bytes = extract_control(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ControlRecord::parse(&text, filename))
}

/// Try each outer format in order; the first that parses wins.
///
/// A failed `ar` parse is not terminal: legacy .ipk files package the inner
/// layers in a (possibly gzipped) tar instead. Only when every attempt
/// fails is the container reported unreadable, naming all attempted formats
/// and carrying the last underlying error.
fn scan_outer(data: &[u8]) -> Result<OuterScan> {
    let mut last_err = None;
    for (format, scan) in OUTER_FORMATS {
        match scan(data) {
            Ok(scan) => {
                tracing::debug!("outer container opened as {}", format);
                return Ok(scan);
            }
            Err(err) => {
                tracing::debug!("outer format '{}' rejected container: {}", format, err);
                last_err = Some(err);
            }
        }
    }

    let attempted: Vec<&str> = OUTER_FORMATS.iter().map(|(name, _)| *name).collect();
    Err(IpkError::UnreadableContainer {
        detail: format!("no supported outer format (tried {})", attempted.join(", ")),
        source: last_err.expect("at least one outer format is always attempted"),
    })
}

fn scan_ar(data: &[u8]) -> std::io::Result<OuterScan> {
    let mut archive = ar::Archive::new(data);
    let mut scan = OuterScan {
        control: None,
        members: Vec::new(),
    };

    while let Some(entry) = archive.next_entry() {
        let mut entry = entry?;
        let name = String::from_utf8_lossy(entry.header().identifier()).into_owned();
        if scan.control.is_none() && is_control_archive(&name) {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            scan.control = Some((name.clone(), buf));
        }
        scan.members.push(name);
    }

    Ok(scan)
}

fn scan_tar(data: &[u8]) -> std::io::Result<OuterScan> {
    // Legacy .ipk files are often gzip-compressed tars; unwrap that layer
    // first when the magic bytes match.
    let decompressed;
    let data = if data.starts_with(&GZIP_MAGIC) {
        decompressed = gunzip(data)?;
        &decompressed[..]
    } else {
        data
    };

    let mut archive = tar::Archive::new(data);
    let mut scan = OuterScan {
        control: None,
        members: Vec::new(),
    };

    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        if scan.control.is_none() && is_control_archive(&name) {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            scan.control = Some((name.clone(), buf));
        }
        scan.members.push(name);
    }

    Ok(scan)
}

/// Pull the `control` member out of the inner tar.
fn control_from_tar(data: &[u8]) -> Result<Vec<u8>> {
    let unreadable = |source: std::io::Error| IpkError::UnreadableContainer {
        detail: "control archive is not a readable tar archive".to_string(),
        source,
    };

    let mut archive = tar::Archive::new(data);
    for entry in archive.entries().map_err(unreadable)? {
        let mut entry = entry.map_err(unreadable)?;
        let name = entry.path().map_err(unreadable)?.to_string_lossy().into_owned();
        if is_control_file(&name) {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf).map_err(unreadable)?;
            return Ok(buf);
        }
    }

    Err(IpkError::MissingControlFile)
}

/// Lenient match for the control archive member of the outer container.
///
/// Member names may carry path prefixes (`./control.tar.gz`) or trailing
/// slashes left behind by the archiver, so matching is substring/suffix
/// based, never exact equality.
fn is_control_archive(name: &str) -> bool {
    let name = name.trim_end_matches('/');
    name.contains("control.tar.gz") || name.ends_with("control.tar")
}

/// Match the `control` member of the inner tar, accepting
/// subdirectory-qualified names such as `./control`.
fn is_control_file(name: &str) -> bool {
    name == "control" || name.ends_with("/control")
}

fn gunzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
