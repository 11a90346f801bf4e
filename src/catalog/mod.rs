//! Table metadata catalog
//!
//! # Overview
//!
//! The catalog is the registry of table definitions a job reads from. A
//! table definition names the storage location, format, partition keys,
//! and declared columns of a dataset. Definitions live as YAML files laid
//! out as `<root>/<database>/<table>.yaml`.

mod registry;
mod types;

pub use registry::Catalog;
pub use types::{ColumnDef, TableDef};
