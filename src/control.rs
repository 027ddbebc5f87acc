//! Control file parsing and index entry rendering.
//!
//! The `control` file inside an .ipk package is plain text, one
//! `Key: value` pair per line:
//!
//! ```text
//! Package: dropbear
//! Version: 2022.82-1
//! Architecture: mips_24kc
//! Depends: libc
//! Description: A small SSH server
//! ```
//!
//! Parsing is best-effort and never fails: lines without a colon are
//! skipped, unrecognized keys are ignored, and a later occurrence of a key
//! overwrites an earlier one. Whether a partial record is usable is the
//! caller's decision.

use serde::Serialize;

/// The recognized control file fields.
///
/// Keys are matched case-insensitively against this set; anything else in
/// the control file (checksums, conffile markers, vendor extensions) is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlField {
    Package,
    Version,
    Architecture,
    Description,
    Maintainer,
    Depends,
    Priority,
    Section,
}

impl ControlField {
    /// Look up a field from a raw control file key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "package" => Some(Self::Package),
            "version" => Some(Self::Version),
            "architecture" => Some(Self::Architecture),
            "description" => Some(Self::Description),
            "maintainer" => Some(Self::Maintainer),
            "depends" => Some(Self::Depends),
            "priority" => Some(Self::Priority),
            "section" => Some(Self::Section),
            _ => None,
        }
    }

    /// Canonical key name as written into an index entry.
    pub fn name(self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Version => "Version",
            Self::Architecture => "Architecture",
            Self::Description => "Description",
            Self::Maintainer => "Maintainer",
            Self::Depends => "Depends",
            Self::Priority => "Priority",
            Self::Section => "Section",
        }
    }
}

/// Field order for rendered index entries. Consumers appending entries to a
/// Packages index rely on this order being stable.
const RENDER_ORDER: [ControlField; 8] = [
    ControlField::Package,
    ControlField::Version,
    ControlField::Architecture,
    ControlField::Maintainer,
    ControlField::Depends,
    ControlField::Priority,
    ControlField::Section,
    ControlField::Description,
];

/// Parsed package metadata plus the originating archive's filename.
///
/// Every control field is optional; `filename` is derived from the .ipk
/// path, never from the control text itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlRecord {
    pub package: Option<String>,
    pub version: Option<String>,
    pub architecture: Option<String>,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub depends: Option<String>,
    pub priority: Option<String>,
    pub section: Option<String>,
    pub filename: String,
}

impl ControlRecord {
    /// Parse control file text into a record.
    ///
    /// `filename` is the basename of the package archive this text came
    /// from. Malformed lines are skipped rather than reported; duplicate
    /// keys keep the last occurrence.
    pub fn parse(text: &str, filename: impl Into<String>) -> Self {
        let mut record = ControlRecord {
            filename: filename.into(),
            ..Default::default()
        };

        for line in text.lines() {
            // Split on the first colon only; values may contain colons
            // themselves (URLs in Description, for example).
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Some(field) = ControlField::from_key(key.trim()) else {
                continue;
            };
            record.set(field, value.trim().to_string());
        }

        record
    }

    fn set(&mut self, field: ControlField, value: String) {
        let slot = match field {
            ControlField::Package => &mut self.package,
            ControlField::Version => &mut self.version,
            ControlField::Architecture => &mut self.architecture,
            ControlField::Description => &mut self.description,
            ControlField::Maintainer => &mut self.maintainer,
            ControlField::Depends => &mut self.depends,
            ControlField::Priority => &mut self.priority,
            ControlField::Section => &mut self.section,
        };
        *slot = Some(value);
    }

    /// Get a field's value, if set.
    pub fn get(&self, field: ControlField) -> Option<&str> {
        match field {
            ControlField::Package => self.package.as_deref(),
            ControlField::Version => self.version.as_deref(),
            ControlField::Architecture => self.architecture.as_deref(),
            ControlField::Description => self.description.as_deref(),
            ControlField::Maintainer => self.maintainer.as_deref(),
            ControlField::Depends => self.depends.as_deref(),
            ControlField::Priority => self.priority.as_deref(),
            ControlField::Section => self.section.as_deref(),
        }
    }

    /// Render this record as a Packages index entry.
    ///
    /// One `Key: value` line per set field in the fixed index order, then
    /// the `Filename` line, terminated by a newline. Unset fields produce no
    /// line at all.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in RENDER_ORDER {
            if let Some(value) = self.get(field) {
                out.push_str(field.name());
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out.push_str("Filename: ");
        out.push_str(&self.filename);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_fields() {
        let record = ControlRecord::parse(
            "Package: dropbear\nVersion: 2022.82-1\nArchitecture: mips_24kc\n",
            "dropbear_2022.82-1_mips_24kc.ipk",
        );
        assert_eq!(record.package.as_deref(), Some("dropbear"));
        assert_eq!(record.version.as_deref(), Some("2022.82-1"));
        assert_eq!(record.architecture.as_deref(), Some("mips_24kc"));
        assert_eq!(record.filename, "dropbear_2022.82-1_mips_24kc.ipk");
        assert!(record.maintainer.is_none());
    }

    #[test]
    fn test_parse_keys_case_insensitive() {
        let record = ControlRecord::parse("PACKAGE: foo\nversion: 1.0\nDePeNdS: bar\n", "foo.ipk");
        assert_eq!(record.package.as_deref(), Some("foo"));
        assert_eq!(record.version.as_deref(), Some("1.0"));
        assert_eq!(record.depends.as_deref(), Some("bar"));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let record = ControlRecord::parse("Version: 1.0.0\nVersion: 2.0.0\n", "foo.ipk");
        assert_eq!(record.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_parse_skips_lines_without_colon() {
        let record = ControlRecord::parse(
            "Package: foo\nthis line has no separator\nVersion: 1.0\n",
            "foo.ipk",
        );
        assert_eq!(record.package.as_deref(), Some("foo"));
        assert_eq!(record.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let record = ControlRecord::parse(
            "Package: foo\nInstalled-Size: 12345\nSHA256sum: abcdef\n",
            "foo.ipk",
        );
        assert_eq!(record.package.as_deref(), Some("foo"));
        assert!(record.render().lines().all(|l| !l.contains("Installed-Size")));
    }

    #[test]
    fn test_parse_value_keeps_embedded_colons() {
        let record =
            ControlRecord::parse("Description: docs at http://example.com/pkg\n", "foo.ipk");
        assert_eq!(
            record.description.as_deref(),
            Some("docs at http://example.com/pkg")
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let record = ControlRecord::parse("Package:    foo   \n  Version  : 1.0\n", "foo.ipk");
        assert_eq!(record.package.as_deref(), Some("foo"));
        assert_eq!(record.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_render_skips_unset_fields() {
        let record = ControlRecord::parse("Package: foo\nVersion: 1.0\n", "foo_1.0.ipk");
        assert_eq!(record.render(), "Package: foo\nVersion: 1.0\nFilename: foo_1.0.ipk\n");
    }

    #[test]
    fn test_render_fixed_field_order() {
        // Control text deliberately out of order; rendering must not follow it.
        let record = ControlRecord::parse(
            "Description: a tool\nSection: utils\nPackage: foo\nPriority: optional\nVersion: 1.0\n",
            "foo_1.0.ipk",
        );
        assert_eq!(
            record.render(),
            "Package: foo\nVersion: 1.0\nPriority: optional\nSection: utils\nDescription: a tool\nFilename: foo_1.0.ipk\n"
        );
    }

    #[test]
    fn test_render_full_entry() {
        let text = "Package: example-pkg\n\
                    Version: 1.0.0\n\
                    Architecture: mips\n\
                    Depends: libc, libgcc\n\
                    Description: a test package\n";
        let record = ControlRecord::parse(text, "example-pkg_1.0.0_mips.ipk");
        assert_eq!(
            record.render(),
            "Package: example-pkg\n\
             Version: 1.0.0\n\
             Architecture: mips\n\
             Depends: libc, libgcc\n\
             Description: a test package\n\
             Filename: example-pkg_1.0.0_mips.ipk\n"
        );
    }

    #[test]
    fn test_empty_text_yields_filename_only() {
        let record = ControlRecord::parse("", "empty.ipk");
        assert_eq!(record.render(), "Filename: empty.ipk\n");
    }
}
