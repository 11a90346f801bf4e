//! Pushdown predicate parsing and evaluation
//!
//! # Overview
//!
//! A pushdown predicate is a small SQL-subset expression evaluated against
//! partition values before any data is read. Partitions whose values fail
//! the predicate are pruned from the scan entirely.
//!
//! Supported grammar:
//!
//! ```text
//! expr       := and_expr ( OR and_expr )*
//! and_expr   := not_expr ( AND not_expr )*
//! not_expr   := NOT not_expr | primary
//! primary    := '(' expr ')' | comparison
//! comparison := ident op literal
//!             | ident [NOT] IN '(' literal ( ',' literal )* ')'
//! op         := '=' | '!=' | '<>' | '<' | '<=' | '>' | '>='
//! literal    := 'string' | integer | float | true | false
//! ```
//!
//! Keywords are case-insensitive. String literals use single quotes with
//! a doubled-quote escape.

mod parser;

pub use parser::{CompareOp, Literal, Predicate};
