//! Record transforms
//!
//! # Overview
//!
//! The three in-memory transform stages between source and sink:
//!
//! - `SchemaMapper` imposes the declared field mapping on every record
//! - `ChoiceResolver` handles fields observed with more than one type
//! - `drop_null_fields` removes columns that are null in every record
//!
//! Each stage consumes and returns the whole record set; they run strictly
//! in that order.

mod mapping;
mod nulls;
mod resolve;

pub use mapping::SchemaMapper;
pub use nulls::drop_null_fields;
pub use resolve::{ChoiceReport, ChoiceResolver};

#[cfg(test)]
mod tests;
