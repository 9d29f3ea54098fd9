use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

mod verb;

pub use verb::{DEFAULT_MATCH_PROPERTY, FALLBACK_TARGET_LABEL, Verb, VerbRegistry};

/// Attribute map carried by nodes and edges, ordered by key.
pub type Props = BTreeMap<String, PropertyValue>;

/// Property value types for nodes and edges.
///
/// A closed set of scalars:
/// - String: UTF-8 strings
/// - Int: 64-bit signed integers
/// - Float: 64-bit floating point
/// - Bool: true/false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view used by ordering comparisons.
    ///
    /// Integers and floats coerce directly, strings coerce when they parse as
    /// a float. Booleans never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::String(s) => s.parse::<f64>().ok(),
            PropertyValue::Bool(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{s}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Int(i64::from(i))
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

/// Builds a [`Props`] map from `key => value` pairs.
///
/// ```
/// use knotgraph_api::{props, PropertyValue};
///
/// let p = props! { "name" => "Alice", "age" => 35 };
/// assert_eq!(p["age"], PropertyValue::Int(35));
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::Props::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Props::new();
        $( map.insert(::std::string::String::from($key), $crate::PropertyValue::from($value)); )+
        map
    }};
}

/// Opaque node identity.
///
/// Assigned by the storage engine on creation and never reused for the
/// lifetime of the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity of a directed edge: the ordered `(from, to, kind)` triple.
///
/// Because the key is the identity, at most one edge of a given kind exists
/// between the same ordered pair of nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
}

impl EdgeKey {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}@{}", self.from, self.to, self.kind)
    }
}

/// A stored node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub props: Props,
    pub subgraphs: BTreeSet<String>,
}

impl Node {
    pub fn prop(&self, key: &str) -> Option<&PropertyValue> {
        self.props.get(key)
    }

    pub fn in_subgraph(&self, subgraph: &str) -> bool {
        self.subgraphs.contains(subgraph)
    }
}

/// A stored directed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
    pub props: Props,
    pub subgraphs: BTreeSet<String>,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from.clone(),
            to: self.to.clone(),
            kind: self.kind.clone(),
        }
    }

    pub fn prop(&self, key: &str) -> Option<&PropertyValue> {
        self.props.get(key)
    }
}

/// Read surface of a graph store, as seen by the query executor.
///
/// Every method returns independent copies, so callers can hold on to the
/// results without borrowing the store. Implementations decide how long any
/// internal lock is held; a per-call lock means consecutive calls may observe
/// different states of the graph.
pub trait GraphStore {
    /// Looks up a single node.
    fn node(&self, id: &NodeId) -> Option<Node>;

    /// All nodes, in the store's iteration order.
    fn nodes(&self) -> Vec<Node>;

    /// Nodes tagged with `subgraph`.
    fn nodes_in(&self, subgraph: &str) -> Vec<Node>;

    /// Outgoing edges of `from`, in the store's iteration order.
    fn edges_from(&self, from: &NodeId) -> Vec<Edge>;
}
