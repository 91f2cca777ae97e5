use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while loading and parsing content.
///
/// Everything except [`Error::SourceEnumeration`] is scoped to a single
/// document: the index logs it and carries on without that document.
#[derive(Debug, Error)]
pub enum Error {
    /// The source has no `---` delimited header followed by a body.
    #[error("{name}: missing `---` delimited header and body")]
    MalformedStructure { name: String },

    /// Markdown conversion failed. The renderer writes into a `String`, so
    /// this is not reachable today; it stays so other renderers can report.
    #[error("{name}: failed to render markdown: {source}")]
    RenderFailure {
        name: String,
        #[source]
        source: std::fmt::Error,
    },

    #[error("{name}: failed to read source: {source}")]
    SourceRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The collection itself could not be listed. Nothing can be served.
    #[error("failed to list content in {}: {source}", path.display())]
    SourceEnumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the index build can continue past this error.
    pub fn is_per_document(&self) -> bool {
        !matches!(self, Error::SourceEnumeration { .. })
    }
}
