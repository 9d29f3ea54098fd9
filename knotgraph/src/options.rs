use crate::Result;
use knotgraph_query::ExecuteOptions;
use knotgraph_storage::DEFAULT_ID_LENGTH;
use serde::{Deserialize, Serialize};

/// How a query reads the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadConsistency {
    /// Every storage call takes the lock on its own. Writes that land
    /// between the seed scan and a join are visible to the join.
    #[default]
    PerCall,
    /// The whole query runs under one read lock. Writers wait until the
    /// query finishes.
    Snapshot,
}

/// Engine configuration.
///
/// Every field has a default, so a config document only needs the keys it
/// changes:
///
/// ```
/// use knotgraph::{GraphOptions, ReadConsistency};
///
/// let options = GraphOptions::from_json(r#"{ "read_consistency": "snapshot" }"#).unwrap();
/// assert_eq!(options.read_consistency, ReadConsistency::Snapshot);
/// assert_eq!(options.id_length, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Subgraph applied to queries that do not pick one themselves.
    pub default_subgraph: Option<String>,
    /// Length of generated node IDs. Values below
    /// [`MIN_ID_LENGTH`](knotgraph_storage::MIN_ID_LENGTH) are raised to it.
    pub id_length: usize,
    pub read_consistency: ReadConsistency,
    pub execute: ExecuteOptions,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            default_subgraph: None,
            id_length: DEFAULT_ID_LENGTH,
            read_consistency: ReadConsistency::default(),
            execute: ExecuteOptions::default(),
        }
    }
}

impl GraphOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_default_subgraph(mut self, subgraph: impl Into<String>) -> Self {
        self.default_subgraph = Some(subgraph.into());
        self
    }

    /// Sets the generated ID length. Lengths below
    /// [`MIN_ID_LENGTH`](knotgraph_storage::MIN_ID_LENGTH) are raised to it
    /// when the store is created.
    pub fn with_id_length(mut self, id_length: usize) -> Self {
        self.id_length = id_length;
        self
    }

    pub fn with_read_consistency(mut self, read_consistency: ReadConsistency) -> Self {
        self.read_consistency = read_consistency;
        self
    }

    pub fn with_max_intermediate_rows(mut self, rows: usize) -> Self {
        self.execute.max_intermediate_rows = Some(rows);
        self
    }
}
