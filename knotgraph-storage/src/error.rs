use knotgraph_api::{EdgeKey, NodeId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeKey),

    #[error("endpoint not found: {0}")]
    EndpointNotFound(NodeId),

    /// A freshly generated ID already names a node. This breaks the store's
    /// uniqueness invariant and should be treated as fatal by callers.
    #[error("node id collision: {0}")]
    IdCollision(NodeId),

    #[error("unsupported snapshot version: {found} (expected {expected})")]
    VersionMismatch { found: String, expected: String },

    #[error("snapshot corrupted: {0}")]
    Corrupted(&'static str),

    #[error("snapshot checksum mismatch")]
    ChecksumMismatch,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}

impl Error {
    /// True for lookups of identities that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NodeNotFound(_) | Error::EdgeNotFound(_) | Error::EndpointNotFound(_)
        )
    }
}
