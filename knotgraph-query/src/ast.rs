use serde::{Deserialize, Serialize};

/// A parsed call chain such as `Find('User').Limit(5)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Query {
    pub calls: Vec<MethodCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodCall {
    pub name: String,
    pub arguments: Vec<Expression>,
    /// Position of the method name in the source text.
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Expression {
    String(String),
    Integer(i64),
}

impl Expression {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expression::String(s) => Some(s),
            Expression::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expression::Integer(i) => Some(*i),
            Expression::String(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Expression::String(_) => "string",
            Expression::Integer(_) => "integer",
        }
    }
}
