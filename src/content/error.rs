//! Errors raised while turning source documents into posts

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed document: expected front-matter between two `---` lines")]
    MalformedDocument,

    #[error("invalid front-matter: {0}")]
    InvalidMetadata(#[from] serde_yaml::Error),

    #[error("failed to tokenize code block: {0}")]
    Tokenize(#[from] syntect::Error),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read content directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
