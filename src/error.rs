use thiserror::Error;

/// Failures surfaced by the package resolution pipeline. Structural
/// failures carry the underlying I/O cause; a readable archive that is
/// merely missing an expected member is reported separately.
#[derive(Error, Debug)]
pub enum IpkError {
    #[error("unreadable package container: {detail}")]
    UnreadableContainer {
        detail: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no control archive in package; members found: [{}]", .members.join(", "))]
    MissingControlArchive { members: Vec<String> },

    #[error("no control file inside the control archive")]
    MissingControlFile,

    #[error("failed to decompress control archive: {0}")]
    Decompression(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IpkError>;
