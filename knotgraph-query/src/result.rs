use knotgraph_api::{Node, PropertyValue, Props};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, Serializer};
use std::collections::BTreeMap;

/// One match: plan variable to bound node.
pub type Row = BTreeMap<String, Node>;

/// Ordered query output. Rows hold copies of the matched nodes, so they stay
/// valid after the store changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Nodes bound to `var`, in row order. Rows without the variable are
    /// skipped.
    pub fn column(&self, var: &str) -> Vec<&Node> {
        self.rows.iter().filter_map(|row| row.get(var)).collect()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Renders the rows as a JSON array of `{var: node}` objects, with
    /// attribute values as bare JSON scalars.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

struct Scalar<'a>(&'a PropertyValue);

impl Serialize for Scalar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::Int(i) => serializer.serialize_i64(*i),
            PropertyValue::Float(f) => serializer.serialize_f64(*f),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

struct ScalarProps<'a>(&'a Props);

impl Serialize for ScalarProps<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, &Scalar(value))?;
        }
        map.end()
    }
}

struct NodeOut<'a>(&'a Node);

impl Serialize for NodeOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("id", node.id.as_str())?;
        state.serialize_field("label", &node.label)?;
        state.serialize_field("props", &ScalarProps(&node.props))?;
        state.serialize_field("subgraphs", &node.subgraphs)?;
        state.end()
    }
}

struct RowOut<'a>(&'a Row);

impl Serialize for RowOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (var, node) in self.0 {
            map.serialize_entry(var, &NodeOut(node))?;
        }
        map.end()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowOut(row))?;
        }
        seq.end()
    }
}
