use crate::error::{Error, Result};
use crate::plan::{CompareOp, EdgePattern, Filter, NodePattern, QueryPlan};
use knotgraph_api::{FALLBACK_TARGET_LABEL, PropertyValue, Verb, VerbRegistry};

/// Variable bound by `find`.
pub const ROOT_VAR: &str = "n";

/// Fluent constructor for [`QueryPlan`]s.
///
/// Errors do not interrupt the chain: the first one is recorded and returned
/// by [`PlanBuilder::build`], and every call after it is ignored.
///
/// ```
/// use knotgraph_api::VerbRegistry;
/// use knotgraph_query::{CompareOp, PlanBuilder};
///
/// let verbs = VerbRegistry::new();
/// let plan = PlanBuilder::find(&verbs, "User")
///     .has("has_skill", "Go")
///     .where_("n.age", CompareOp::Gt, 31)
///     .limit(10)
///     .build()
///     .unwrap();
/// assert_eq!(plan.nodes.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PlanBuilder<'v> {
    verbs: &'v VerbRegistry,
    plan: QueryPlan,
    next_var: usize,
    error: Option<Error>,
}

impl<'v> PlanBuilder<'v> {
    pub fn find(verbs: &'v VerbRegistry, label: impl Into<String>) -> Self {
        let plan = QueryPlan {
            nodes: vec![NodePattern {
                var: ROOT_VAR.to_string(),
                label: label.into(),
            }],
            outputs: vec![ROOT_VAR.to_string()],
            ..QueryPlan::default()
        };
        Self {
            verbs,
            plan,
            next_var: 0,
            error: None,
        }
    }

    /// Follows a `kind` relationship from `n` to a node whose match attribute
    /// equals `value`. The target label and match attribute come from the
    /// registered verb, if any.
    pub fn has(mut self, kind: &str, value: impl Into<PropertyValue>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let verb = self
            .verbs
            .lookup(kind)
            .unwrap_or_else(|| Verb::new(FALLBACK_TARGET_LABEL, ""));

        let var = format!("v{}", self.next_var);
        self.next_var += 1;

        self.plan.nodes.push(NodePattern {
            var: var.clone(),
            label: verb.target_label.clone(),
        });
        self.plan.edges.push(EdgePattern {
            from: ROOT_VAR.to_string(),
            to: var.clone(),
            kind: kind.to_string(),
            filters: Vec::new(),
        });
        self.plan.filters.push(Filter::new(
            format!("{var}.{}", verb.match_property()),
            CompareOp::Eq,
            value,
        ));
        self
    }

    /// Adds a node filter. `field` must be `<var>.<attr>`.
    pub fn where_(
        mut self,
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<PropertyValue>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        let field = field.into();
        if !field.contains('.') {
            self.error = Some(Error::plan(format!(
                "Where field must be <var>.<attr>, got '{field}'"
            )));
            return self;
        }
        self.plan.filters.push(Filter::new(field, op, value));
        self
    }

    /// Adds a filter on the attributes of the most recent `has` edge.
    pub fn where_edge(
        mut self,
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<PropertyValue>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        let Some(edge) = self.plan.edges.last_mut() else {
            self.error = Some(Error::plan("WhereEdge requires a preceding Has"));
            return self;
        };
        edge.filters.push(Filter::new(field, op, value));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.plan.limit = Some(n);
        self
    }

    /// Restricts matching to nodes tagged with `subgraph`.
    pub fn in_subgraph(mut self, subgraph: impl Into<String>) -> Self {
        self.plan.subgraph = Some(subgraph.into());
        self
    }

    pub fn build(self) -> Result<QueryPlan> {
        match self.error {
            Some(err) => Err(err),
            None => {
                tracing::debug!(
                    nodes = self.plan.nodes.len(),
                    edges = self.plan.edges.len(),
                    filters = self.plan.filters.len(),
                    "plan built"
                );
                Ok(self.plan)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_binds_root() {
        let verbs = VerbRegistry::new();
        let plan = PlanBuilder::find(&verbs, "User").build().unwrap();
        assert_eq!(
            plan.nodes,
            vec![NodePattern {
                var: "n".into(),
                label: "User".into()
            }]
        );
        assert_eq!(plan.outputs, vec!["n".to_string()]);
        assert!(plan.edges.is_empty());
        assert_eq!(plan.limit, None);
    }

    #[test]
    fn has_uses_registered_verb() {
        let verbs = VerbRegistry::new();
        verbs.register("reports_to", Verb::new("Manager", "email"));

        let plan = PlanBuilder::find(&verbs, "User")
            .has("reports_to", "boss@example.com")
            .build()
            .unwrap();

        assert_eq!(plan.nodes[1].label, "Manager");
        assert_eq!(plan.edges[0].from, "n");
        assert_eq!(plan.edges[0].to, "v0");
        assert_eq!(plan.filters[0].field, "v0.email");
    }

    #[test]
    fn has_falls_back_for_unknown_kind() {
        let verbs = VerbRegistry::new();
        let plan = PlanBuilder::find(&verbs, "User")
            .has("likes", "Jazz")
            .has("visited", "Oslo")
            .build()
            .unwrap();

        assert_eq!(plan.nodes[1].label, FALLBACK_TARGET_LABEL);
        assert_eq!(plan.filters[0].field, "v0.name");
        assert_eq!(plan.filters[1].field, "v1.name");
        assert_eq!(plan.edges[1].to, "v1");
    }

    #[test]
    fn where_edge_attaches_to_latest_edge() {
        let verbs = VerbRegistry::new();
        let plan = PlanBuilder::find(&verbs, "User")
            .has("a", "x")
            .has("b", "y")
            .where_edge("weight", CompareOp::Gt, 2)
            .build()
            .unwrap();

        assert!(plan.edges[0].filters.is_empty());
        assert_eq!(plan.edges[1].filters.len(), 1);
    }

    #[test]
    fn where_edge_without_has_is_an_error() {
        let verbs = VerbRegistry::new();
        let err = PlanBuilder::find(&verbs, "User")
            .where_edge("weight", CompareOp::Gt, 2)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Plan(_)));
    }

    #[test]
    fn first_error_wins() {
        let verbs = VerbRegistry::new();
        let err = PlanBuilder::find(&verbs, "User")
            .where_("age", CompareOp::Gt, 2)
            .where_edge("weight", CompareOp::Gt, 2)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Where field"));
    }

    #[test]
    fn limit_overwrites_and_subgraph_is_recorded() {
        let verbs = VerbRegistry::new();
        let plan = PlanBuilder::find(&verbs, "User")
            .limit(10)
            .limit(3)
            .in_subgraph("eng")
            .build()
            .unwrap();
        assert_eq!(plan.limit, Some(3));
        assert_eq!(plan.subgraph.as_deref(), Some("eng"));
    }

    #[test]
    fn builds_are_deterministic() {
        let verbs = VerbRegistry::new();
        let build = || {
            PlanBuilder::find(&verbs, "User")
                .has("has_skill", "Go")
                .where_("n.age", CompareOp::Gt, 31)
                .build()
                .unwrap()
        };
        assert_eq!(build(), build());
    }
}
