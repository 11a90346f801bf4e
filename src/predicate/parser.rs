//! Predicate lexer, parser, and evaluator

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ============================================================================
// AST
// ============================================================================

/// A literal value in a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Single-quoted string
    String(String),
    /// Integer
    Long(i64),
    /// Float
    Double(f64),
    /// true / false
    Boolean(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Long(n) => write!(f, "{n}"),
            Literal::Double(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        f.write_str(s)
    }
}

/// A parsed pushdown predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column op literal`
    Compare {
        /// Referenced column
        column: String,
        /// Operator
        op: CompareOp,
        /// Right-hand literal
        value: Literal,
    },
    /// `column [not] in (a, b, ...)`
    InList {
        /// Referenced column
        column: String,
        /// Allowed values
        values: Vec<Literal>,
        /// Whether the membership test is negated
        negated: bool,
    },
    /// Logical conjunction
    And(Box<Predicate>, Box<Predicate>),
    /// Logical disjunction
    Or(Box<Predicate>, Box<Predicate>),
    /// Logical negation
    Not(Box<Predicate>),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => write!(f, "{column} {op} {value}"),
            Predicate::InList {
                column,
                values,
                negated,
            } => {
                let list = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                if *negated {
                    write!(f, "{column} not in ({list})")
                } else {
                    write!(f, "{column} in ({list})")
                }
            }
            Predicate::And(a, b) => write!(f, "({a} and {b})"),
            Predicate::Or(a, b) => write!(f, "({a} or {b})"),
            Predicate::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

impl Predicate {
    /// Parse a predicate expression
    pub fn parse(text: &str) -> Result<Predicate> {
        let tokens = tokenize(text)?;
        let mut parser = Parser { tokens, pos: 0 };
        let predicate = parser.parse_or()?;
        parser.expect_end()?;
        Ok(predicate)
    }

    /// Column names referenced by this predicate
    pub fn columns(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::Compare { column, .. } | Predicate::InList { column, .. } => {
                out.insert(column.as_str());
            }
            Predicate::And(a, b) | Predicate::Or(a, b) => {
                a.collect_columns(out);
                b.collect_columns(out);
            }
            Predicate::Not(inner) => inner.collect_columns(out),
        }
    }

    /// Evaluate against one partition's `column -> value` map
    ///
    /// String comparison by default; numeric comparison when the literal is
    /// numeric and the partition value parses as a number. A numeric or
    /// boolean literal compared against a non-parsing value is false
    /// (unknown), mirroring SQL's null-on-cast-failure behavior.
    pub fn evaluate(&self, values: &HashMap<String, String>) -> Result<bool> {
        match self {
            Predicate::Compare { column, op, value } => {
                let actual = lookup(values, column)?;
                compare(actual, *op, value)
            }
            Predicate::InList {
                column,
                values: list,
                negated,
            } => {
                let actual = lookup(values, column)?;
                let mut matched = false;
                for lit in list {
                    if compare(actual, CompareOp::Eq, lit)? {
                        matched = true;
                        break;
                    }
                }
                Ok(matched != *negated)
            }
            Predicate::And(a, b) => Ok(a.evaluate(values)? && b.evaluate(values)?),
            Predicate::Or(a, b) => Ok(a.evaluate(values)? || b.evaluate(values)?),
            Predicate::Not(inner) => Ok(!inner.evaluate(values)?),
        }
    }
}

fn lookup<'a>(values: &'a HashMap<String, String>, column: &str) -> Result<&'a str> {
    values
        .get(column)
        .map(String::as_str)
        .ok_or_else(|| Error::predicate_eval(format!("column '{column}' has no partition value")))
}

fn compare(actual: &str, op: CompareOp, literal: &Literal) -> Result<bool> {
    match literal {
        Literal::String(s) => Ok(op_matches(actual.cmp(s.as_str()), op)),
        Literal::Long(n) => {
            if let Ok(v) = actual.trim().parse::<i64>() {
                Ok(op_matches(v.cmp(n), op))
            } else {
                Ok(compare_f64(actual, *n as f64, op))
            }
        }
        Literal::Double(n) => Ok(compare_f64(actual, *n, op)),
        Literal::Boolean(b) => {
            let actual_bool = match actual.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            };
            match op {
                CompareOp::Eq => Ok(actual_bool == Some(*b)),
                CompareOp::NotEq => Ok(actual_bool.is_some_and(|v| v != *b)),
                _ => Err(Error::predicate_eval(format!(
                    "ordered comparison '{op}' is not defined for booleans"
                ))),
            }
        }
    }
}

fn compare_f64(actual: &str, target: f64, op: CompareOp) -> bool {
    match actual.trim().parse::<f64>() {
        Ok(v) => v
            .partial_cmp(&target)
            .map(|ord| op_matches(ord, op))
            .unwrap_or(false),
        Err(_) => false,
    }
}

fn op_matches(ord: Ordering, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::NotEq => ord != Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::LtEq => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::GtEq => ord != Ordering::Less,
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    StringLit(String),
    LongLit(i64),
    DoubleLit(f64),
    Op(CompareOp),
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    pos,
                });
            }
            ')' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    pos,
                });
            }
            ',' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    pos,
                });
            }
            '\'' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == '\'' {
                        // Doubled quote is an escaped quote
                        if chars.peek().map(|&(_, c)| c) == Some('\'') {
                            value.push('\'');
                            chars.next();
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        value.push(c);
                    }
                }
                if !closed {
                    return Err(Error::predicate_parse(pos, "unterminated string literal"));
                }
                tokens.push(Token {
                    kind: TokenKind::StringLit(value),
                    pos,
                });
            }
            '=' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Op(CompareOp::Eq),
                    pos,
                });
            }
            '!' => {
                chars.next();
                if chars.peek().map(|&(_, c)| c) == Some('=') {
                    chars.next();
                    tokens.push(Token {
                        kind: TokenKind::Op(CompareOp::NotEq),
                        pos,
                    });
                } else {
                    return Err(Error::predicate_parse(pos, "expected '=' after '!'"));
                }
            }
            '<' => {
                chars.next();
                let kind = match chars.peek().map(|&(_, c)| c) {
                    Some('=') => {
                        chars.next();
                        TokenKind::Op(CompareOp::LtEq)
                    }
                    Some('>') => {
                        chars.next();
                        TokenKind::Op(CompareOp::NotEq)
                    }
                    _ => TokenKind::Op(CompareOp::Lt),
                };
                tokens.push(Token { kind, pos });
            }
            '>' => {
                chars.next();
                let kind = if chars.peek().map(|&(_, c)| c) == Some('=') {
                    chars.next();
                    TokenKind::Op(CompareOp::GtEq)
                } else {
                    TokenKind::Op(CompareOp::Gt)
                };
                tokens.push(Token { kind, pos });
            }
            c if c.is_ascii_digit() || c == '-' => {
                let kind = lex_number(&mut chars, pos)?;
                tokens.push(Token { kind, pos });
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(ident),
                    pos,
                });
            }
            c => {
                return Err(Error::predicate_parse(
                    pos,
                    format!("unexpected character '{c}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

fn lex_number(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pos: usize,
) -> Result<TokenKind> {
    let mut text = String::new();

    if chars.peek().map(|&(_, c)| c) == Some('-') {
        text.push('-');
        chars.next();
    }

    let mut saw_dot = false;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            chars.next();
        } else if c == '.' && !saw_dot {
            saw_dot = true;
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if saw_dot {
        text.parse::<f64>()
            .map(TokenKind::DoubleLit)
            .map_err(|_| Error::predicate_parse(pos, format!("invalid number '{text}'")))
    } else {
        text.parse::<i64>()
            .map(TokenKind::LongLit)
            .map_err(|_| Error::predicate_parse(pos, format!("invalid number '{text}'")))
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn end_pos(&self) -> usize {
        self.tokens.last().map_or(0, |t| t.pos + 1)
    }

    /// True when the next token is the given keyword (case-insensitive)
    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(
            self.peek(),
            Some(Token { kind: TokenKind::Ident(word), .. }) if word.eq_ignore_ascii_case(keyword)
        )
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(Error::predicate_parse(
                token.pos,
                "unexpected trailing input",
            )),
        }
    }

    fn parse_or(&mut self) -> Result<Predicate> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("and") {
            let right = self.parse_not()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Predicate> {
        // Prefix form `not expr`; the postfix form `col not in (...)` is
        // handled in parse_comparison
        if self.at_keyword("not") {
            self.pos += 1;
            let inner = self.parse_not()?;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Predicate> {
        match self.next() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(token) => {
                        Err(Error::predicate_parse(token.pos, "expected closing ')'"))
                    }
                    None => Err(Error::predicate_parse(self.end_pos(), "expected closing ')'")),
                }
            }
            Some(Token {
                kind: TokenKind::Ident(column),
                pos,
            }) => self.parse_comparison(column, pos),
            Some(token) => Err(Error::predicate_parse(
                token.pos,
                "expected column name or '('",
            )),
            None => Err(Error::predicate_parse(
                self.end_pos(),
                "expected column name or '('",
            )),
        }
    }

    fn parse_comparison(&mut self, column: String, pos: usize) -> Result<Predicate> {
        // `column not in (...)`
        if self.at_keyword("not") {
            self.pos += 1;
            if !self.eat_keyword("in") {
                return Err(Error::predicate_parse(pos, "expected 'in' after 'not'"));
            }
            let values = self.parse_in_list()?;
            return Ok(Predicate::InList {
                column,
                values,
                negated: true,
            });
        }

        if self.eat_keyword("in") {
            let values = self.parse_in_list()?;
            return Ok(Predicate::InList {
                column,
                values,
                negated: false,
            });
        }

        match self.next() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) => {
                let value = self.parse_literal()?;
                Ok(Predicate::Compare { column, op, value })
            }
            Some(token) => Err(Error::predicate_parse(
                token.pos,
                format!("expected operator after column '{column}'"),
            )),
            None => Err(Error::predicate_parse(
                self.end_pos(),
                format!("expected operator after column '{column}'"),
            )),
        }
    }

    fn parse_in_list(&mut self) -> Result<Vec<Literal>> {
        match self.next() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {}
            Some(token) => {
                return Err(Error::predicate_parse(token.pos, "expected '(' after 'in'"));
            }
            None => {
                return Err(Error::predicate_parse(self.end_pos(), "expected '(' after 'in'"));
            }
        }

        let mut values = vec![self.parse_literal()?];
        loop {
            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => values.push(self.parse_literal()?),
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => break,
                Some(token) => {
                    return Err(Error::predicate_parse(token.pos, "expected ',' or ')'"));
                }
                None => {
                    return Err(Error::predicate_parse(self.end_pos(), "expected ',' or ')'"));
                }
            }
        }

        Ok(values)
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        match self.next() {
            Some(Token {
                kind: TokenKind::StringLit(s),
                ..
            }) => Ok(Literal::String(s)),
            Some(Token {
                kind: TokenKind::LongLit(n),
                ..
            }) => Ok(Literal::Long(n)),
            Some(Token {
                kind: TokenKind::DoubleLit(n),
                ..
            }) => Ok(Literal::Double(n)),
            Some(Token {
                kind: TokenKind::Ident(word),
                pos,
            }) => {
                if word.eq_ignore_ascii_case("true") {
                    Ok(Literal::Boolean(true))
                } else if word.eq_ignore_ascii_case("false") {
                    Ok(Literal::Boolean(false))
                } else {
                    Err(Error::predicate_parse(
                        pos,
                        format!("expected literal, got '{word}'"),
                    ))
                }
            }
            Some(token) => Err(Error::predicate_parse(token.pos, "expected literal")),
            None => Err(Error::predicate_parse(self.end_pos(), "expected literal")),
        }
    }
}
