//! # knotgraph
//!
//! An embeddable property graph. Nodes carry a label and scalar attributes,
//! edges connect two nodes under a relationship kind, and queries match
//! patterns of labels, relationships, and attribute filters.
//!
//! ```rust
//! use knotgraph::{CompareOp, Graph, Verb, props};
//!
//! # fn main() -> knotgraph::Result<()> {
//! let graph = Graph::new();
//! graph.register_verb("has_skill", Verb::new("Skill", "name"));
//!
//! let alice = graph.add_node("User", props! { "name" => "Alice", "age" => 35 })?;
//! let go = graph.add_node("Skill", props! { "name" => "Go" })?;
//! graph.add_edge(&alice, &go, "has_skill", props! {})?;
//!
//! // Fluent form.
//! let fluent = graph
//!     .find("User")
//!     .has("has_skill", "Go")
//!     .where_("n.age", CompareOp::Gt, 31)
//!     .exec()?;
//!
//! // Text form.
//! let text = graph.query("Find('User').Has('has_skill','Go').Where('n.age','>',31)")?;
//!
//! assert_eq!(fluent, text);
//! assert_eq!(text.rows()[0]["n"].id, alice);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! - **[`Graph`]**: the engine context. Owns the store, the verb registry,
//!   and the options. Cheap to clone; clones share the same graph.
//! - **[`Verb`]**: what a relationship kind points at. `Has(kind, value)`
//!   uses it to pick the target label and the attribute to compare.
//! - **[`QueryPlan`]**: the declarative form every query compiles to. Use
//!   [`Graph::explain`] to see it.
//! - **[`ReadConsistency`]**: whether a query may observe concurrent writes
//!   between its stages.

mod builder;
mod error;
mod options;

use knotgraph_storage::MemStore;
use std::path::Path;
use std::sync::Arc;

pub use builder::QueryBuilder;
pub use error::{Error, Result};
pub use knotgraph_api::{
    DEFAULT_MATCH_PROPERTY, Edge, EdgeKey, FALLBACK_TARGET_LABEL, GraphStore, Node, NodeId,
    PropertyValue, Props, Verb, VerbRegistry, props,
};
pub use knotgraph_query as query;
pub use knotgraph_query::{CompareOp, ExecuteOptions, QueryPlan, ResultSet, Row};
pub use knotgraph_storage as storage;
pub use options::{GraphOptions, ReadConsistency};

/// The graph engine handle.
///
/// # Concurrency
///
/// `Graph` can be shared across threads. All storage mutations serialize
/// through a single writer lock; reads run concurrently. The verb registry
/// has its own lock and may be shared between graphs.
#[derive(Debug, Clone)]
pub struct Graph {
    store: Arc<MemStore>,
    verbs: Arc<VerbRegistry>,
    options: GraphOptions,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    pub fn with_options(options: GraphOptions) -> Self {
        Self::from_parts(options, Arc::new(VerbRegistry::new()))
    }

    /// Creates an empty graph that resolves verbs through `verbs`.
    pub fn with_verbs(verbs: Arc<VerbRegistry>) -> Self {
        Self::from_parts(GraphOptions::default(), verbs)
    }

    pub fn from_parts(options: GraphOptions, verbs: Arc<VerbRegistry>) -> Self {
        Self {
            store: Arc::new(MemStore::with_id_length(options.id_length)),
            verbs,
            options,
        }
    }

    /// Opens the snapshot at `path`, or starts an empty graph if no file
    /// exists there yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, GraphOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: GraphOptions) -> Result<Self> {
        let path = path.as_ref();
        let graph = Self::with_options(options);
        if path.exists() {
            graph.load(path)?;
        } else {
            tracing::info!(path = %path.display(), "no snapshot found, starting empty");
        }
        Ok(graph)
    }

    #[inline]
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Direct access to the storage engine.
    #[inline]
    pub fn store(&self) -> &MemStore {
        &self.store
    }

    // Nodes and edges

    pub fn add_node(&self, label: impl Into<String>, props: Props) -> Result<NodeId> {
        Ok(self.store.add_node(label, props)?)
    }

    pub fn add_edge(
        &self,
        from: &NodeId,
        to: &NodeId,
        kind: impl Into<String>,
        props: Props,
    ) -> Result<EdgeKey> {
        Ok(self.store.add_edge(from, to, kind, props)?)
    }

    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.store.node(id)
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<Edge> {
        self.store.edge(key)
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.store.nodes()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.store.edges()
    }

    pub fn nodes_in(&self, subgraph: &str) -> Vec<Node> {
        self.store.nodes_in(subgraph)
    }

    pub fn edges_in(&self, subgraph: &str) -> Vec<Edge> {
        self.store.edges_in(subgraph)
    }

    pub fn edges_from(&self, from: &NodeId) -> Vec<Edge> {
        self.store.edges_from(from)
    }

    pub fn edges_to(&self, to: &NodeId) -> Vec<Edge> {
        self.store.edges_to(to)
    }

    pub fn update_node(&self, id: &NodeId, props: Props) -> Result<()> {
        Ok(self.store.update_node(id, props)?)
    }

    pub fn update_edge(&self, key: &EdgeKey, props: Props) -> Result<()> {
        Ok(self.store.update_edge(key, props)?)
    }

    /// Deletes a node and every edge touching it.
    pub fn delete_node(&self, id: &NodeId) -> Result<()> {
        Ok(self.store.delete_node(id)?)
    }

    pub fn delete_edge(&self, key: &EdgeKey) -> Result<()> {
        Ok(self.store.delete_edge(key)?)
    }

    pub fn tag_node(&self, id: &NodeId, subgraph: impl Into<String>) -> Result<()> {
        Ok(self.store.tag_node(id, subgraph)?)
    }

    pub fn untag_node(&self, id: &NodeId, subgraph: &str) -> Result<()> {
        Ok(self.store.untag_node(id, subgraph)?)
    }

    pub fn tag_edge(&self, key: &EdgeKey, subgraph: impl Into<String>) -> Result<()> {
        Ok(self.store.tag_edge(key, subgraph)?)
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    // Verbs

    pub fn register_verb(&self, name: impl Into<String>, verb: Verb) {
        self.verbs.register(name, verb);
    }

    pub fn verb(&self, name: &str) -> Option<Verb> {
        self.verbs.lookup(name)
    }

    pub fn verbs(&self) -> &Arc<VerbRegistry> {
        &self.verbs
    }

    // Queries

    /// Starts a fluent query over nodes labelled `label`.
    pub fn find(&self, label: impl Into<String>) -> QueryBuilder<'_> {
        let mut inner = knotgraph_query::PlanBuilder::find(&self.verbs, label);
        if let Some(subgraph) = &self.options.default_subgraph {
            inner = inner.in_subgraph(subgraph.clone());
        }
        QueryBuilder::new(self, inner)
    }

    /// Compiles `text` into a plan without running it.
    pub fn compile(&self, text: &str) -> Result<QueryPlan> {
        let mut plan = knotgraph_query::compile(text, &self.verbs)?;
        if plan.subgraph.is_none() {
            plan.subgraph = self.options.default_subgraph.clone();
        }
        Ok(plan)
    }

    /// Renders the plan for `text`.
    pub fn explain(&self, text: &str) -> Result<String> {
        Ok(self.compile(text)?.to_string())
    }

    pub fn query(&self, text: &str) -> Result<ResultSet> {
        tracing::debug!(query = text, "running text query");
        let plan = self.compile(text)?;
        self.execute(&plan)
    }

    /// Runs `plan` under the configured [`ReadConsistency`].
    pub fn execute(&self, plan: &QueryPlan) -> Result<ResultSet> {
        let options = &self.options.execute;
        let result = match self.options.read_consistency {
            ReadConsistency::PerCall => knotgraph_query::execute(&*self.store, plan, options)?,
            ReadConsistency::Snapshot => {
                let view = self.store.read();
                knotgraph_query::execute(&view, plan, options)?
            }
        };
        Ok(result)
    }

    // Persistence

    /// Writes the graph and its verbs to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(self.store.save(path, Some(self.verbs.as_ref()))?)
    }

    /// Replaces the graph, and the verbs if the file has any, with the
    /// snapshot at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(self.store.load(path, Some(self.verbs.as_ref()))?)
    }
}
