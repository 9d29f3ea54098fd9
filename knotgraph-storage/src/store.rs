use crate::idgen::{DEFAULT_ID_LENGTH, generate_id};
use crate::{Error, Result};
use knotgraph_api::{Edge, EdgeKey, GraphStore, Node, NodeId, Props};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The node/edge arena guarded by [`MemStore`]'s lock.
///
/// Records reference each other by identity only. Adjacency is kept as
/// ordered key sets per node so that traversal order follows key order.
#[derive(Debug, Default)]
pub(crate) struct GraphData {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) edges: BTreeMap<EdgeKey, Edge>,
    out: HashMap<NodeId, BTreeSet<EdgeKey>>,
    inc: HashMap<NodeId, BTreeSet<EdgeKey>>,
}

impl GraphData {
    /// Rebuilds an arena from persisted records. Records filed under a key
    /// that disagrees with their own identity are dropped, then edges whose
    /// endpoints are missing.
    pub(crate) fn from_parts(
        mut nodes: BTreeMap<NodeId, Node>,
        edges: BTreeMap<EdgeKey, Edge>,
    ) -> Self {
        nodes.retain(|id, node| {
            let consistent = *id == node.id;
            if !consistent {
                tracing::warn!(key = %id, id = %node.id, "dropping node filed under a foreign key");
            }
            consistent
        });
        let mut data = GraphData {
            nodes,
            ..GraphData::default()
        };
        for (key, edge) in edges {
            if key != edge.key() {
                tracing::warn!(key = %key, edge = %edge.key(), "dropping edge filed under a foreign key");
                continue;
            }
            if !data.nodes.contains_key(&key.from) || !data.nodes.contains_key(&key.to) {
                tracing::warn!(edge = %key, "dropping edge with missing endpoint");
                continue;
            }
            data.insert_edge(key, edge);
        }
        data
    }

    fn insert_edge(&mut self, key: EdgeKey, edge: Edge) {
        self.out
            .entry(key.from.clone())
            .or_default()
            .insert(key.clone());
        self.inc.entry(key.to.clone()).or_default().insert(key.clone());
        self.edges.insert(key, edge);
    }

    fn remove_edge(&mut self, key: &EdgeKey) -> Option<Edge> {
        let edge = self.edges.remove(key)?;
        if let Some(set) = self.out.get_mut(&key.from) {
            set.remove(key);
            if set.is_empty() {
                self.out.remove(&key.from);
            }
        }
        if let Some(set) = self.inc.get_mut(&key.to) {
            set.remove(key);
            if set.is_empty() {
                self.inc.remove(&key.to);
            }
        }
        Some(edge)
    }

    fn collect_edges<'a>(&self, keys: impl Iterator<Item = &'a EdgeKey>) -> Vec<Edge> {
        keys.filter_map(|k| self.edges.get(k)).cloned().collect()
    }

    fn edges_from(&self, from: &NodeId) -> Vec<Edge> {
        match self.out.get(from) {
            Some(keys) => self.collect_edges(keys.iter()),
            None => Vec::new(),
        }
    }

    fn edges_to(&self, to: &NodeId) -> Vec<Edge> {
        match self.inc.get(to) {
            Some(keys) => self.collect_edges(keys.iter()),
            None => Vec::new(),
        }
    }

    fn nodes_in(&self, subgraph: &str) -> Vec<Node> {
        self.nodes
            .values()
            .filter(|n| n.in_subgraph(subgraph))
            .cloned()
            .collect()
    }

    fn edges_in(&self, subgraph: &str) -> Vec<Edge> {
        let member = |id: &NodeId| self.nodes.get(id).is_some_and(|n| n.in_subgraph(subgraph));
        self.edges
            .values()
            .filter(|e| member(&e.from) && member(&e.to))
            .map(|e| {
                let mut edge = e.clone();
                // Edges inherit membership from their endpoints.
                edge.subgraphs.insert(subgraph.to_string());
                edge
            })
            .collect()
    }
}

/// In-memory storage engine.
///
/// All nodes and edges live behind a single reader/writer lock that is taken
/// once per call. Reads run concurrently with each other; writes serialize
/// against everything. Use [`MemStore::read`] to hold one read lock across
/// several reads.
///
/// Iteration follows ascending [`NodeId`] / [`EdgeKey`] order.
#[derive(Debug)]
pub struct MemStore {
    pub(crate) data: RwLock<GraphData>,
    id_length: usize,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_id_length(DEFAULT_ID_LENGTH)
    }

    /// Creates a store whose generated node IDs have `id_length` characters.
    /// Lengths below [`MIN_ID_LENGTH`](crate::MIN_ID_LENGTH) are raised to it.
    pub fn with_id_length(id_length: usize) -> Self {
        Self {
            data: RwLock::new(GraphData::default()),
            id_length: id_length.max(crate::MIN_ID_LENGTH),
        }
    }

    /// Creates a node and returns its freshly generated ID.
    pub fn add_node(&self, label: impl Into<String>, props: Props) -> Result<NodeId> {
        let id = generate_id(self.id_length);
        let label = label.into();

        let mut data = self.data.write();
        if data.nodes.contains_key(&id) {
            return Err(Error::IdCollision(id));
        }
        tracing::debug!(id = %id, label = %label, "node added");
        data.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                label,
                props,
                subgraphs: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    /// Creates the edge `(from, to, kind)`, or overwrites the props of the
    /// existing edge with that identity. Subgraph tags of an existing edge
    /// are kept.
    pub fn add_edge(
        &self,
        from: &NodeId,
        to: &NodeId,
        kind: impl Into<String>,
        props: Props,
    ) -> Result<EdgeKey> {
        let mut data = self.data.write();
        for endpoint in [from, to] {
            if !data.nodes.contains_key(endpoint) {
                return Err(Error::EndpointNotFound(endpoint.clone()));
            }
        }

        let key = EdgeKey {
            from: from.clone(),
            to: to.clone(),
            kind: kind.into(),
        };
        if let Some(existing) = data.edges.get_mut(&key) {
            existing.props = props;
            tracing::debug!(edge = %key, "edge overwritten");
            return Ok(key);
        }

        let edge = Edge {
            from: key.from.clone(),
            to: key.to.clone(),
            kind: key.kind.clone(),
            props,
            subgraphs: BTreeSet::new(),
        };
        tracing::debug!(edge = %key, "edge added");
        data.insert_edge(key.clone(), edge);
        Ok(key)
    }

    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.data.read().nodes.get(id).cloned()
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<Edge> {
        self.data.read().edges.get(key).cloned()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.data.read().nodes.contains_key(id)
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.data.read().nodes.values().cloned().collect()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.data.read().edges.values().cloned().collect()
    }

    pub fn edges_from(&self, from: &NodeId) -> Vec<Edge> {
        self.data.read().edges_from(from)
    }

    pub fn edges_to(&self, to: &NodeId) -> Vec<Edge> {
        self.data.read().edges_to(to)
    }

    pub fn edges_by_kind(&self, kind: &str) -> Vec<Edge> {
        self.data
            .read()
            .edges
            .values()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Nodes tagged with `subgraph`.
    pub fn nodes_in(&self, subgraph: &str) -> Vec<Node> {
        self.data.read().nodes_in(subgraph)
    }

    /// Edges whose endpoints both belong to `subgraph`. The returned copies
    /// carry the subgraph tag even when the stored edge was never tagged.
    pub fn edges_in(&self, subgraph: &str) -> Vec<Edge> {
        self.data.read().edges_in(subgraph)
    }

    /// Merges `props` into the node's attributes. The label never changes.
    pub fn update_node(&self, id: &NodeId, props: Props) -> Result<()> {
        let mut data = self.data.write();
        let node = data
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.props.extend(props);
        tracing::debug!(id = %id, "node updated");
        Ok(())
    }

    /// Merges `props` into the edge's attributes.
    pub fn update_edge(&self, key: &EdgeKey, props: Props) -> Result<()> {
        let mut data = self.data.write();
        let edge = data
            .edges
            .get_mut(key)
            .ok_or_else(|| Error::EdgeNotFound(key.clone()))?;
        edge.props.extend(props);
        tracing::debug!(edge = %key, "edge updated");
        Ok(())
    }

    /// Removes a node together with every edge into or out of it.
    ///
    /// Deleting an ID that is already gone fails with
    /// [`Error::NodeNotFound`].
    pub fn delete_node(&self, id: &NodeId) -> Result<()> {
        let mut data = self.data.write();
        if data.nodes.remove(id).is_none() {
            return Err(Error::NodeNotFound(id.clone()));
        }

        let mut incident: Vec<EdgeKey> = Vec::new();
        if let Some(keys) = data.out.get(id) {
            incident.extend(keys.iter().cloned());
        }
        if let Some(keys) = data.inc.get(id) {
            incident.extend(keys.iter().cloned());
        }
        for key in &incident {
            data.remove_edge(key);
        }
        tracing::debug!(id = %id, edges = incident.len(), "node deleted");
        Ok(())
    }

    /// Removes a single edge. Deleting an edge that is already gone fails
    /// with [`Error::EdgeNotFound`].
    pub fn delete_edge(&self, key: &EdgeKey) -> Result<()> {
        let mut data = self.data.write();
        data.remove_edge(key)
            .ok_or_else(|| Error::EdgeNotFound(key.clone()))?;
        tracing::debug!(edge = %key, "edge deleted");
        Ok(())
    }

    pub fn tag_node(&self, id: &NodeId, subgraph: impl Into<String>) -> Result<()> {
        let mut data = self.data.write();
        let node = data
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.subgraphs.insert(subgraph.into());
        Ok(())
    }

    pub fn untag_node(&self, id: &NodeId, subgraph: &str) -> Result<()> {
        let mut data = self.data.write();
        let node = data
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.subgraphs.remove(subgraph);
        Ok(())
    }

    pub fn tag_edge(&self, key: &EdgeKey, subgraph: impl Into<String>) -> Result<()> {
        let mut data = self.data.write();
        let edge = data
            .edges
            .get_mut(key)
            .ok_or_else(|| Error::EdgeNotFound(key.clone()))?;
        edge.subgraphs.insert(subgraph.into());
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.data.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.data.read().edges.len()
    }

    /// Drops every node and edge.
    pub fn clear(&self) {
        *self.data.write() = GraphData::default();
    }

    /// Takes the read lock and keeps it until the returned view is dropped.
    ///
    /// Every read through the view sees the same state of the graph. Writers
    /// block until the view is released.
    pub fn read(&self) -> StoreView<'_> {
        StoreView {
            data: self.data.read(),
        }
    }
}

impl GraphStore for MemStore {
    fn node(&self, id: &NodeId) -> Option<Node> {
        MemStore::node(self, id)
    }

    fn nodes(&self) -> Vec<Node> {
        MemStore::nodes(self)
    }

    fn nodes_in(&self, subgraph: &str) -> Vec<Node> {
        MemStore::nodes_in(self, subgraph)
    }

    fn edges_from(&self, from: &NodeId) -> Vec<Edge> {
        MemStore::edges_from(self, from)
    }
}

/// A read-locked view of a [`MemStore`].
pub struct StoreView<'a> {
    data: RwLockReadGuard<'a, GraphData>,
}

impl StoreView<'_> {
    pub fn node_count(&self) -> usize {
        self.data.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.data.edges.len()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.data.edges.values().cloned().collect()
    }

    pub fn edges_to(&self, to: &NodeId) -> Vec<Edge> {
        self.data.edges_to(to)
    }

    pub fn edges_in(&self, subgraph: &str) -> Vec<Edge> {
        self.data.edges_in(subgraph)
    }
}

impl GraphStore for StoreView<'_> {
    fn node(&self, id: &NodeId) -> Option<Node> {
        self.data.nodes.get(id).cloned()
    }

    fn nodes(&self) -> Vec<Node> {
        self.data.nodes.values().cloned().collect()
    }

    fn nodes_in(&self, subgraph: &str) -> Vec<Node> {
        self.data.nodes_in(subgraph)
    }

    fn edges_from(&self, from: &NodeId) -> Vec<Edge> {
        self.data.edges_from(from)
    }
}
