//! Plan evaluation.
//!
//! Execution is a pipeline of seed scan, nested-loop joins along each edge
//! pattern, node filters, and limit. It only reads from the store.

use crate::error::{Error, Result};
use crate::plan::{Filter, QueryPlan};
use crate::result::{ResultSet, Row};
use knotgraph_api::GraphStore;
use serde::{Deserialize, Serialize};

/// Execution resource limits applied to each query.
///
/// No limit is set by default, so a query always returns the same rows it
/// would on an unbounded engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteOptions {
    /// Upper bound on the rows held between pipeline stages. It is checked
    /// before `Limit` truncates.
    pub max_intermediate_rows: Option<usize>,
}

impl ExecuteOptions {
    pub fn with_max_intermediate_rows(rows: usize) -> Self {
        Self {
            max_intermediate_rows: Some(rows),
        }
    }

    fn check(&self, observed: usize, stage: &str) -> Result<()> {
        if let Some(max) = self.max_intermediate_rows
            && observed > max
        {
            return Err(Error::ResourceLimit(format!(
                "{stage} produced more than {max} intermediate rows"
            )));
        }
        Ok(())
    }
}

pub fn execute<S: GraphStore + ?Sized>(
    store: &S,
    plan: &QueryPlan,
    options: &ExecuteOptions,
) -> Result<ResultSet> {
    let Some(first) = plan.nodes.first() else {
        return Ok(ResultSet::default());
    };
    let subgraph = plan.subgraph.as_deref();

    let candidates = match subgraph {
        Some(sub) => store.nodes_in(sub),
        None => store.nodes(),
    };
    let mut rows: Vec<Row> = Vec::new();
    for node in candidates {
        if node.label == first.label {
            rows.push(Row::from([(first.var.clone(), node)]));
            options.check(rows.len(), "scan")?;
        }
    }
    tracing::debug!(label = %first.label, rows = rows.len(), "seed scan");

    for pattern in &plan.edges {
        let target_label = plan.node_pattern(&pattern.to).map(|p| p.label.as_str());
        let mut expanded: Vec<Row> = Vec::new();

        for row in &rows {
            let Some(source) = row.get(&pattern.from) else {
                continue;
            };
            for edge in store.edges_from(&source.id) {
                if edge.kind != pattern.kind
                    || !pattern.filters.iter().all(|f| f.matches(edge.props.get(&f.field)))
                {
                    continue;
                }
                let Some(target) = store.node(&edge.to) else {
                    continue;
                };
                if target_label.is_some_and(|label| target.label != label)
                    || subgraph.is_some_and(|sub| !target.in_subgraph(sub))
                {
                    continue;
                }
                let mut next = row.clone();
                next.insert(pattern.to.clone(), target);
                expanded.push(next);
                options.check(expanded.len(), "expand")?;
            }
        }

        tracing::debug!(
            kind = %pattern.kind,
            rows_in = rows.len(),
            rows_out = expanded.len(),
            "expand"
        );
        rows = expanded;
    }

    rows.retain(|row| plan.filters.iter().all(|f| row_matches(row, f)));
    if let Some(limit) = plan.limit {
        rows.truncate(limit);
    }

    tracing::debug!(rows = rows.len(), "query executed");
    Ok(ResultSet::new(rows))
}

fn row_matches(row: &Row, filter: &Filter) -> bool {
    let Some((var, attr)) = filter.field.split_once('.') else {
        return false;
    };
    row.get(var)
        .is_some_and(|node| filter.matches(node.prop(attr)))
}
