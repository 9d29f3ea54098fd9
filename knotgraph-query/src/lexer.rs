use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Identifier(String),
    String(String),
    /// Decimal digits, kept as text so the parser can report overflow.
    Integer(String),

    // Symbols
    Dot,
    LeftParen,
    RightParen,
    Comma,

    // Special
    Illegal(char),
    Eof,
}

impl TokenType {
    /// Short description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenType::Identifier(name) => format!("identifier '{name}'"),
            TokenType::String(s) => format!("string '{s}'"),
            TokenType::Integer(digits) => format!("integer {digits}"),
            TokenType::Dot => "'.'".to_string(),
            TokenType::LeftParen => "'('".to_string(),
            TokenType::RightParen => "')'".to_string(),
            TokenType::Comma => "','".to_string(),
            TokenType::Illegal(c) => format!("illegal character {c:?}"),
            TokenType::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
}

/// Lazy scanner over query text.
///
/// Once the input is exhausted every further call to [`Lexer::next_token`]
/// returns `Eof` again. The iterator view yields `Eof` exactly once.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Restarts scanning from the beginning of the input.
    pub fn reset(&mut self) {
        *self = Lexer::new(self.input);
    }

    /// Scans the remaining input, including the trailing `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if eof {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;
        let Some(char) = self.advance() else {
            return Token {
                token_type: TokenType::Eof,
                line,
                column,
            };
        };

        let token_type = match char {
            '.' => TokenType::Dot,
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            ',' => TokenType::Comma,
            '\'' => self.read_string(),
            c if c.is_ascii_digit() => self.read_integer(c),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(c),
            c => TokenType::Illegal(c),
        };

        Token {
            token_type,
            line,
            column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        char
    }

    fn skip_whitespace(&mut self) {
        while let Some(&char) = self.chars.peek() {
            if matches!(char, ' ' | '\t' | '\n' | '\r') {
                self.advance();
            } else {
                break;
            }
        }
    }

    // An unterminated string runs to end of input.
    fn read_string(&mut self) -> TokenType {
        let mut value = String::new();
        while let Some(char) = self.advance() {
            if char == '\'' {
                break;
            }
            value.push(char);
        }
        TokenType::String(value)
    }

    fn read_integer(&mut self, first: char) -> TokenType {
        let mut value = String::from(first);
        while let Some(&char) = self.chars.peek() {
            if !char.is_ascii_digit() {
                break;
            }
            value.push(char);
            self.advance();
        }
        TokenType::Integer(value)
    }

    fn read_identifier(&mut self, first: char) -> TokenType {
        let mut value = String::from(first);
        while let Some(&char) = self.chars.peek() {
            if !(char.is_alphanumeric() || char == '_') {
                break;
            }
            value.push(char);
            self.advance();
        }
        TokenType::Identifier(value)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.token_type == TokenType::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
