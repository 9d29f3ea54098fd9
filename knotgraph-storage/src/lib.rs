//! In-memory storage engine for knotgraph.
//!
//! [`MemStore`] owns every node and edge behind a single reader/writer lock
//! and can write itself to, and restore itself from, a versioned snapshot
//! file.

pub mod error;
pub mod idgen;
mod persist;
mod store;

pub use error::{Error, Result};
pub use idgen::{DEFAULT_ID_LENGTH, MIN_ID_LENGTH, generate_id};
pub use store::{MemStore, StoreView};

/// Version tag written at the head of every snapshot file.
pub const FORMAT_VERSION: &str = "knotgraph/v1";
