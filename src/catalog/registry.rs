//! Catalog registry
//!
//! Loads and indexes table definitions, either from a directory tree of
//! YAML files or from in-memory definitions.

use crate::catalog::types::TableDef;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// An indexed set of table definitions
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<(String, String), TableDef>,
}

impl Catalog {
    /// Load a catalog from a directory laid out as `<root>/<database>/<table>.yaml`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::catalog(format!(
                "Catalog directory '{}' not found",
                root.display()
            )));
        }

        let mut tables = HashMap::new();

        for db_entry in fs::read_dir(root)? {
            let db_entry = db_entry?;
            if !db_entry.file_type()?.is_dir() {
                continue;
            }
            let database = db_entry.file_name().to_string_lossy().to_string();

            for table_entry in fs::read_dir(db_entry.path())? {
                let path = table_entry?.path();
                let is_yaml = path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml");
                if !is_yaml {
                    continue;
                }

                let def = load_table_file(&path)?;
                check_placement(&def, &database, &path)?;
                tables.insert((def.database.clone(), def.name.clone()), def);
            }
        }

        Ok(Self { tables })
    }

    /// Build a catalog from in-memory definitions
    pub fn from_tables(defs: Vec<TableDef>) -> Result<Self> {
        let mut tables = HashMap::new();

        for def in defs {
            def.validate()?;
            let key = (def.database.clone(), def.name.clone());
            if tables.insert(key, def).is_some() {
                return Err(Error::catalog("Duplicate table definition"));
            }
        }

        Ok(Self { tables })
    }

    /// Look up a table definition
    pub fn table(&self, database: &str, name: &str) -> Result<&TableDef> {
        self.tables
            .get(&(database.to_string(), name.to_string()))
            .ok_or_else(|| {
                let known: Vec<&str> = self.table_names(database);
                if known.is_empty() {
                    tracing::debug!("No tables known in database '{database}'");
                } else {
                    tracing::debug!(
                        "Known tables in '{database}': {}",
                        known.join(", ")
                    );
                }
                Error::table_not_found(database, name)
            })
    }

    /// Number of tables in the catalog
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog holds no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names within one database, sorted
    fn table_names(&self, database: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tables
            .keys()
            .filter(|(db, _)| db == database)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Load and validate one table definition file
fn load_table_file(path: &Path) -> Result<TableDef> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::catalog(format!(
            "Failed to read table definition '{}': {e}",
            path.display()
        ))
    })?;

    let def: TableDef = serde_yaml::from_str(&content).map_err(|e| {
        Error::catalog(format!(
            "Failed to parse table definition '{}': {e}",
            path.display()
        ))
    })?;

    def.validate()?;
    Ok(def)
}

/// A definition must sit at `<database>/<name>.yaml`
fn check_placement(def: &TableDef, database: &str, path: &Path) -> Result<()> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if def.database != database || def.name != stem {
        return Err(Error::catalog(format!(
            "Table definition '{}' declares '{}' but sits at '{database}/{stem}.yaml'",
            path.display(),
            def.qualified_name()
        )));
    }

    Ok(())
}
