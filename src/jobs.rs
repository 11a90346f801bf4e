//! Built-in job definitions embedded in the binary
//!
//! This module embeds the shipped job YAML files directly into the binary,
//! allowing users to run `--job raw-statistics-cleansed` instead of
//! specifying a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in job YAML definitions
pub static BUILTIN_JOBS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Trending video statistics cleansing
    m.insert(
        "raw-statistics-cleansed",
        include_str!("../jobs/raw_statistics_cleansed.yaml"),
    );

    m
});

/// Get a built-in job by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_JOBS.get(name).copied()
}

/// Check if a job name is a built-in job
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_JOBS.contains_key(name)
}

/// List all built-in job names
pub fn list_builtin() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN_JOBS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_job_from_str;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("raw-statistics-cleansed"));
        assert!(!is_builtin("unknown"));
        assert_eq!(list_builtin(), vec!["raw-statistics-cleansed"]);
    }

    #[test]
    fn test_builtin_jobs_parse_and_validate() {
        for name in list_builtin() {
            let yaml = get_builtin(name).unwrap();
            let config = load_job_from_str(yaml)
                .unwrap_or_else(|e| panic!("built-in job '{name}' is invalid: {e}"));
            assert_eq!(config.name, name);
        }
    }

    #[test]
    fn test_shipped_job_shape() {
        let config = load_job_from_str(get_builtin("raw-statistics-cleansed").unwrap()).unwrap();
        assert_eq!(config.source.database, "data_youtube_raw");
        assert_eq!(config.source.table, "raw_statistics");
        assert_eq!(
            config.source.push_down_predicate.as_deref(),
            Some("region in ('ca', 'gb', 'us')")
        );
        assert_eq!(config.mappings.len(), 17);
        assert_eq!(config.sink.partition_keys, vec!["region"]);
        assert_eq!(config.sink.coalesce, 1);
    }
}
