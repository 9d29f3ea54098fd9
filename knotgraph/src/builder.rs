use crate::{Graph, Result};
use knotgraph_api::PropertyValue;
use knotgraph_query::{CompareOp, PlanBuilder, QueryPlan, ResultSet};

/// Fluent query bound to a [`Graph`]. Created by [`Graph::find`].
///
/// ```
/// use knotgraph::{CompareOp, Graph, props};
///
/// let graph = Graph::new();
/// graph.add_node("User", props! { "name" => "Alice", "age" => 35 }).unwrap();
///
/// let result = graph
///     .find("User")
///     .where_("n.age", CompareOp::Gt, 30)
///     .exec()
///     .unwrap();
/// assert_eq!(result.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<'g> {
    graph: &'g Graph,
    inner: PlanBuilder<'g>,
}

impl<'g> QueryBuilder<'g> {
    pub(crate) fn new(graph: &'g Graph, inner: PlanBuilder<'g>) -> Self {
        Self { graph, inner }
    }

    pub fn has(self, kind: &str, value: impl Into<PropertyValue>) -> Self {
        self.map(|b| b.has(kind, value))
    }

    pub fn where_(
        self,
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.map(|b| b.where_(field, op, value))
    }

    pub fn where_edge(
        self,
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.map(|b| b.where_edge(field, op, value))
    }

    pub fn limit(self, n: usize) -> Self {
        self.map(|b| b.limit(n))
    }

    pub fn in_subgraph(self, subgraph: impl Into<String>) -> Self {
        self.map(|b| b.in_subgraph(subgraph))
    }

    /// The plan built so far, without running it.
    pub fn plan(self) -> Result<QueryPlan> {
        Ok(self.inner.build()?)
    }

    pub fn exec(self) -> Result<ResultSet> {
        let graph = self.graph;
        let plan = self.plan()?;
        graph.execute(&plan)
    }

    fn map(self, f: impl FnOnce(PlanBuilder<'g>) -> PlanBuilder<'g>) -> Self {
        Self {
            graph: self.graph,
            inner: f(self.inner),
        }
    }
}
