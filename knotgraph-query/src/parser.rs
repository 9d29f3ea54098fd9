use crate::ast::{Expression, MethodCall, Query};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenType};

/// Recognizes `call ('.' call)* EOF` where
/// `call = Identifier '(' [expr (',' expr)*] ')'`.
///
/// The parser pulls tokens from the lexer on demand and only ever looks at
/// the current token.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    pub fn parse(input: &'a str) -> Result<Query> {
        Parser::new(input).parse_query()
    }

    pub fn parse_query(&mut self) -> Result<Query> {
        let mut calls = Vec::new();
        loop {
            calls.push(self.parse_call()?);
            match self.current.token_type {
                TokenType::Dot => self.advance(),
                TokenType::Eof => break,
                _ => return Err(self.unexpected("'.' or end of input")),
            }
        }
        Ok(Query { calls })
    }

    fn parse_call(&mut self) -> Result<MethodCall> {
        let TokenType::Identifier(name) = &self.current.token_type else {
            return Err(self.unexpected("method name"));
        };
        let name = name.clone();
        let (line, column) = (self.current.line, self.current.column);
        self.advance();

        self.consume(&TokenType::LeftParen, "'('")?;
        let mut arguments = Vec::new();
        if self.current.token_type != TokenType::RightParen {
            loop {
                arguments.push(self.parse_expression()?);
                match self.current.token_type {
                    TokenType::Comma => self.advance(),
                    TokenType::RightParen => break,
                    _ => return Err(self.unexpected("',' or ')'")),
                }
            }
        }
        self.consume(&TokenType::RightParen, "')'")?;

        Ok(MethodCall {
            name,
            arguments,
            line,
            column,
        })
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        let expression = match &self.current.token_type {
            TokenType::String(s) => Expression::String(s.clone()),
            TokenType::Integer(digits) => match digits.parse::<i64>() {
                Ok(value) => Expression::Integer(value),
                Err(_) => return Err(self.unexpected("integer within i64 range")),
            },
            _ => return Err(self.unexpected("string or integer literal")),
        };
        self.advance();
        Ok(expression)
    }

    fn consume(&mut self, token_type: &TokenType, expected: &str) -> Result<()> {
        if self.current.token_type == *token_type {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::Syntax {
            expected: expected.to_string(),
            found: self.current.token_type.describe(),
            line: self.current.line,
            column: self.current.column,
        }
    }
}
