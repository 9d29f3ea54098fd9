//! Error and result types for the query crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("syntax error at {line}:{column}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("plan error: {0}")]
    Plan(String),

    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl Error {
    pub(crate) fn plan(msg: impl Into<String>) -> Self {
        Error::Plan(msg.into())
    }
}
