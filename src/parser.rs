use std::mem;

use thiserror::Error;

use crate::{
    ast::{Expr, Program, QueryKind, Statement, Token},
    lexer::Lexer,
};

/// Grammar violations. Each variant carries enough context to name the
/// offending construct in a diagnostic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unknown statement '{0}'")]
    UnknownStatement(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("unterminated block: reached end of input before '}}'")]
    UnterminatedBlock,

    #[error("unknown document query '{0}' (expected 'id' or 'type')")]
    UnknownQuery(String),
}

/// Recursive-descent parser with one token of lookahead and no backtracking.
///
/// Produces a pure AST: document queries are recorded as [`Expr::Query`]
/// nodes and executed later by the resolution pass, never during parsing.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Take the current token and advance past it.
    fn bump(&mut self) -> Token {
        let token = mem::replace(&mut self.current_token, Token::Eof);
        self.current_token = self.lexer.next_token();
        token
    }

    fn check_symbol(&self, symbol: char) -> bool {
        self.current_token == Token::Symbol(symbol)
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), ParseError> {
        if self.check_symbol(symbol) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("'{}'", symbol),
                found: self.current_token.describe(),
            })
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.bump() {
            Token::Identifier(name) => Ok(name),
            token => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            }),
        }
    }

    /// Parse a whole program: statements until end of input.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut program = Vec::new();
        while self.current_token != Token::Eof {
            program.push(self.parse_statement()?);
        }
        Ok(program)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = match &self.current_token {
            Token::Identifier(name) => name.clone(),
            token => return Err(ParseError::UnknownStatement(token.describe())),
        };

        match keyword.as_str() {
            "def" | "var" => {
                self.advance();
                let name = self.expect_identifier("a binding name")?;
                self.expect_symbol('=')?;
                let value = self.parse_value()?;
                Ok(Statement::Assign {
                    constant: keyword == "def",
                    name,
                    value,
                })
            }
            "msg" => {
                self.advance();
                self.expect_symbol('(')?;
                let value = self.parse_value()?;
                self.expect_symbol(')')?;
                Ok(Statement::Print(value))
            }
            "popup" => {
                self.advance();
                self.expect_symbol('(')?;
                let value = self.parse_value()?;
                self.expect_symbol(')')?;
                Ok(Statement::Notify(value))
            }
            "si" => {
                self.advance();
                self.expect_symbol('(')?;
                let condition = self.parse_value()?;
                self.expect_symbol(')')?;
                self.expect_symbol('{')?;
                let body = self.parse_block()?;
                Ok(Statement::If { condition, body })
            }
            "repeter" => {
                self.advance();
                // The count is unparenthesized.
                let count = self.parse_value()?;
                self.expect_symbol('{')?;
                let body = self.parse_block()?;
                Ok(Statement::Repeat { count, body })
            }
            _ => {
                self.advance();
                if keyword == "doc" && self.check_symbol('.') {
                    // Inline query target: doc.id("x").texte = ... or
                    // doc.type("p").suppr(). 'doc' is reserved as the query
                    // prefix; it cannot name a binding in member position.
                    let target = self.parse_query()?;
                    self.expect_symbol('.')?;
                    self.parse_member_statement(target)
                } else if self.check_symbol('.') {
                    self.advance(); // consume '.'
                    self.parse_member_statement(Expr::Variable(keyword))
                } else if self.check_symbol('(') {
                    let args = self.parse_call_args()?;
                    Ok(Statement::NativeCall {
                        name: keyword,
                        args,
                    })
                } else {
                    Err(ParseError::UnknownStatement(keyword))
                }
            }
        }
    }

    /// `target.member = value` or `target.member(args...)`; the target and
    /// the '.' after it are already consumed.
    fn parse_member_statement(&mut self, target: Expr) -> Result<Statement, ParseError> {
        let member = self.expect_identifier("a member name")?;

        if self.check_symbol('=') {
            self.advance();
            let value = self.parse_value()?;
            Ok(Statement::MemberAssign {
                target,
                member,
                value,
            })
        } else if self.check_symbol('(') {
            let args = self.parse_call_args()?;
            Ok(Statement::MemberCall {
                target,
                member,
                args,
            })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "'=' or '('".to_string(),
                found: self.current_token.describe(),
            })
        }
    }

    /// Comma-separated value list between parentheses. The opening '(' is
    /// the current token.
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_symbol('(')?;
        let mut args = Vec::new();
        if !self.check_symbol(')') {
            loop {
                args.push(self.parse_value()?);
                if self.check_symbol(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect_symbol(')')?;
        Ok(args)
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        while !self.check_symbol('}') {
            if self.current_token == Token::Eof {
                return Err(ParseError::UnterminatedBlock);
            }
            statements.push(self.parse_statement()?);
        }
        self.advance(); // consume '}'
        Ok(statements)
    }

    /// One value expression: literal, variable reference, or document query.
    fn parse_value(&mut self) -> Result<Expr, ParseError> {
        match self.bump() {
            Token::Integer(n) => Ok(Expr::Integer(n)),
            Token::String(s) => Ok(Expr::String(s)),
            Token::Identifier(name) if name == "doc" && self.check_symbol('.') => {
                self.parse_query()
            }
            Token::Identifier(name) => Ok(Expr::Variable(name)),
            token => Err(ParseError::InvalidValue(token.describe())),
        }
    }

    /// `doc . <method> ( <literal> )`, recorded as a pure query node; the
    /// resolution pass executes it against a live document.
    fn parse_query(&mut self) -> Result<Expr, ParseError> {
        self.advance(); // consume '.'
        let method = self.expect_identifier("a query method")?;
        let kind = match method.as_str() {
            "id" => QueryKind::ById,
            "type" => QueryKind::ByTag,
            _ => return Err(ParseError::UnknownQuery(method)),
        };

        self.expect_symbol('(')?;
        let key = match self.bump() {
            Token::String(s) => s,
            Token::Integer(n) => n.to_string(),
            token => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a string or number literal".to_string(),
                    found: token.describe(),
                });
            }
        };
        self.expect_symbol(')')?;

        Ok(Expr::Query { kind, key })
    }
}
