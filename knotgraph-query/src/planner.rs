//! Turns a parsed call chain into a [`QueryPlan`].

use crate::ast::{Expression, MethodCall, Query};
use crate::builder::PlanBuilder;
use crate::error::{Error, Result};
use crate::plan::{CompareOp, QueryPlan};
use knotgraph_api::{PropertyValue, VerbRegistry};

pub fn plan_query(query: &Query, verbs: &VerbRegistry) -> Result<QueryPlan> {
    let (first, rest) = query
        .calls
        .split_first()
        .ok_or_else(|| Error::plan("empty query"))?;
    if first.name != "Find" {
        return Err(Error::plan("empty query"));
    }
    expect_arity(first, 1)?;
    let mut builder = PlanBuilder::find(verbs, string_arg(first, 0)?);

    for call in rest {
        builder = match call.name.as_str() {
            "Find" => {
                return Err(Error::plan(format!(
                    "Find may only start a query ({})",
                    position(call)
                )));
            }
            "Has" => {
                expect_arity(call, 2)?;
                builder.has(string_arg(call, 0)?, string_arg(call, 1)?)
            }
            "Where" => {
                expect_arity(call, 3)?;
                let (op, value) = comparison(call)?;
                builder.where_(string_arg(call, 0)?, op, value)
            }
            "WhereEdge" => {
                expect_arity(call, 3)?;
                let (op, value) = comparison(call)?;
                builder.where_edge(string_arg(call, 0)?, op, value)
            }
            "Limit" => {
                expect_arity(call, 1)?;
                let n = call.arguments[0]
                    .as_integer()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        Error::plan(format!(
                            "Limit expects a non-negative integer ({})",
                            position(call)
                        ))
                    })?;
                builder.limit(n)
            }
            other => {
                return Err(Error::plan(format!(
                    "unknown method: {other} ({})",
                    position(call)
                )));
            }
        };
    }

    builder.build()
}

fn position(call: &MethodCall) -> String {
    format!("line {}, column {}", call.line, call.column)
}

fn expect_arity(call: &MethodCall, n: usize) -> Result<()> {
    if call.arguments.len() == n {
        return Ok(());
    }
    Err(Error::plan(format!(
        "{} expects {n} argument{}, got {} ({})",
        call.name,
        if n == 1 { "" } else { "s" },
        call.arguments.len(),
        position(call)
    )))
}

fn string_arg(call: &MethodCall, index: usize) -> Result<&str> {
    let arg = &call.arguments[index];
    arg.as_str().ok_or_else(|| {
        Error::plan(format!(
            "{} argument {} must be a string, got {} ({})",
            call.name,
            index + 1,
            arg.type_name(),
            position(call)
        ))
    })
}

fn comparison(call: &MethodCall) -> Result<(CompareOp, PropertyValue)> {
    let op = string_arg(call, 1)?.parse::<CompareOp>().map_err(|e| {
        Error::plan(format!("{}: {} ({})", call.name, plan_message(e), position(call)))
    })?;
    let value = match &call.arguments[2] {
        Expression::String(s) => PropertyValue::String(s.clone()),
        Expression::Integer(i) => PropertyValue::Int(*i),
    };
    Ok((op, value))
}

fn plan_message(err: Error) -> String {
    match err {
        Error::Plan(msg) => msg,
        other => other.to_string(),
    }
}
