//! Query front end and execution for knotgraph.
//!
//! Text queries are chains of method calls:
//!
//! ```text
//! Find('User').Has('has_skill', 'Go').Where('n.age', '>', 31).Limit(10)
//! ```
//!
//! [`parse`] turns text into an [`ast::Query`], [`compile`] turns it into a
//! [`QueryPlan`], and [`execute`] evaluates a plan against any
//! [`knotgraph_api::GraphStore`]. Plans can also be built directly with
//! [`PlanBuilder`].

pub mod ast;
pub mod builder;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod plan;
pub mod planner;
pub mod result;

pub use builder::PlanBuilder;
pub use error::{Error, Result};
pub use executor::{ExecuteOptions, execute};
pub use plan::{CompareOp, EdgePattern, Filter, NodePattern, QueryPlan};
pub use result::{ResultSet, Row};

use knotgraph_api::VerbRegistry;

pub fn parse(text: &str) -> Result<ast::Query> {
    parser::Parser::parse(text)
}

/// Parses `text` and plans it against `verbs`.
pub fn compile(text: &str, verbs: &VerbRegistry) -> Result<QueryPlan> {
    let query = parse(text)?;
    planner::plan_query(&query, verbs)
}

/// Renders the plan for `text` without running it.
pub fn explain(text: &str, verbs: &VerbRegistry) -> Result<String> {
    Ok(compile(text, verbs)?.to_string())
}
