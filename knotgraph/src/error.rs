use std::fmt;

/// The error type for knotgraph operations.
#[derive(Debug)]
pub enum Error {
    /// IO error interacting with the filesystem.
    Io(std::io::Error),
    /// Error returned by the storage engine.
    Storage(knotgraph_storage::Error),
    /// Error while parsing, planning, or executing a query.
    Query(knotgraph_query::Error),
    /// Malformed configuration document.
    Config(serde_json::Error),
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Query(knotgraph_query::Error::Syntax { .. }))
    }

    pub fn is_plan(&self) -> bool {
        matches!(self, Error::Query(knotgraph_query::Error::Plan(_)))
    }

    /// True when a node, edge, or edge endpoint does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(e) if e.is_not_found())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Storage(e) => write!(f, "Storage error: {}", e),
            Error::Query(e) => write!(f, "Query error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Storage(e) => Some(e),
            Error::Query(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<knotgraph_storage::Error> for Error {
    fn from(e: knotgraph_storage::Error) -> Self {
        match e {
            knotgraph_storage::Error::Io(e) => Error::Io(e),
            _ => Error::Storage(e),
        }
    }
}

impl From<knotgraph_query::Error> for Error {
    fn from(e: knotgraph_query::Error) -> Self {
        Error::Query(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

/// A specialized Result type for knotgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
