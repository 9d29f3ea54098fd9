//! Declarative query plans.
//!
//! A [`QueryPlan`] is pure data: node patterns to bind, edge patterns to
//! join along, filters over bound variables, and an optional row cap.

use crate::error::Error;
use knotgraph_api::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }

    /// Compares an attribute value against a filter operand.
    ///
    /// `=` and `!=` compare values directly, so `Int(35)` and `Float(35.0)`
    /// are different. `>` and `<` compare numerically and are false when
    /// either side fails to coerce.
    pub fn evaluate(self, lhs: &PropertyValue, rhs: &PropertyValue) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Gt | CompareOp::Lt => {
                let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) else {
                    return false;
                };
                if self == CompareOp::Gt { l > r } else { l < r }
            }
        }
    }
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            other => Err(Error::Plan(format!("unsupported operator: {other}"))),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePattern {
    pub var: String,
    pub label: String,
}

/// A directed traversal `from -[kind]-> to` between two plan variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePattern {
    pub from: String,
    pub to: String,
    pub kind: String,
    /// Filters over the edge's own attributes. `field` is a bare attribute
    /// name.
    pub filters: Vec<Filter>,
}

/// An attribute comparison.
///
/// For node filters `field` is `<var>.<attr>`. For edge filters it is the
/// attribute name alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: CompareOp,
    pub value: PropertyValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<PropertyValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Applies the filter to an attribute. An absent attribute never matches.
    pub fn matches(&self, actual: Option<&PropertyValue>) -> bool {
        actual.is_some_and(|v| self.op.evaluate(v, &self.value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub nodes: Vec<NodePattern>,
    pub edges: Vec<EdgePattern>,
    pub filters: Vec<Filter>,
    pub outputs: Vec<String>,
    pub limit: Option<usize>,
    pub subgraph: Option<String>,
}

impl QueryPlan {
    pub fn node_pattern(&self, var: &str) -> Option<&NodePattern> {
        self.nodes.iter().find(|p| p.var == var)
    }
}

struct Operand<'a>(&'a PropertyValue);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PropertyValue::String(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, Operand(&self.value))
    }
}

/// Renders the plan as an indented operator listing.
impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QueryPlan")?;
        for node in &self.nodes {
            writeln!(f, "  Scan ({}:{})", node.var, node.label)?;
        }
        for edge in &self.edges {
            write!(f, "  Expand ({})-[:{}]->({})", edge.from, edge.kind, edge.to)?;
            for (i, filter) in edge.filters.iter().enumerate() {
                let sep = if i == 0 { " where " } else { " and " };
                write!(f, "{sep}{filter}")?;
            }
            writeln!(f)?;
        }
        for filter in &self.filters {
            writeln!(f, "  Filter {filter}")?;
        }
        if let Some(subgraph) = &self.subgraph {
            writeln!(f, "  Subgraph '{subgraph}'")?;
        }
        if let Some(limit) = self.limit {
            writeln!(f, "  Limit {limit}")?;
        }
        write!(f, "  Return {}", self.outputs.join(", "))
    }
}
