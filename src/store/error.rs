use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::id::BlobId;
use crate::header::HeaderError;

/// Which half of a blob's file pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Container,
    Header,
    Both,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Artifact::Container => "data container",
            Artifact::Header => "header sidecar",
            Artifact::Both => "data container and header sidecar",
        })
    }
}

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Container of {requested} bytes exceeds the maximum of {max} bytes")]
    SizeExceeded { requested: u64, max: u64 },
    #[error("Blob {0} already exists")]
    AlreadyExists(BlobId),
    #[error("Blob {id} not found: missing {missing}")]
    NotFound { id: BlobId, missing: Artifact },
    #[error("Block {index} out of range for blob {id} with {block_count} blocks")]
    BlockOutOfRange { id: BlobId, index: u32, block_count: u32 },
    #[error("Payload of {len} bytes exceeds the block size of {block_size} bytes")]
    PayloadTooLarge { len: usize, block_size: u64 },
    #[error("Header sidecar of blob {id} is malformed: {source}")]
    Format {
        id: BlobId,
        #[source]
        source: HeaderError,
    },
    #[error("Invalid blob identity '{id}': {reason}")]
    InvalidIdentity { id: String, reason: &'static str },
    #[error("Container of blob {id} is corrupt: {reason}")]
    CorruptContainer { id: BlobId, reason: String },
    #[error("Blob {id} is incomplete: {missing} of {block_count} blocks unwritten")]
    Incomplete { id: BlobId, missing: usize, block_count: u32 },
    #[error("Content of blob {id} does not match its identity")]
    Corrupted { id: BlobId },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Stable, payload-free classification of a [`BlobError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SizeExceeded,
    AlreadyExists,
    NotFound,
    BlockOutOfRange,
    PayloadTooLarge,
    Format,
    InvalidIdentity,
    CorruptContainer,
    Incomplete,
    Corrupted,
    Io,
}

impl BlobError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlobError::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            BlobError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            BlobError::NotFound { .. } => ErrorKind::NotFound,
            BlobError::BlockOutOfRange { .. } => ErrorKind::BlockOutOfRange,
            BlobError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            BlobError::Format { .. } => ErrorKind::Format,
            BlobError::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
            BlobError::CorruptContainer { .. } => ErrorKind::CorruptContainer,
            BlobError::Incomplete { .. } => ErrorKind::Incomplete,
            BlobError::Corrupted { .. } => ErrorKind::Corrupted,
            BlobError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether resending the same request could succeed without caller changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, BlobError::Io { .. })
    }
}
