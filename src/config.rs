use std::path::PathBuf;

use crate::db::Database;

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub records_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Config {
            db_path: non_empty("JOBTRACK_DB")
                .map(PathBuf::from)
                .unwrap_or_else(Database::default_path),
            records_path: non_empty("JOBTRACK_RECORDS").map(PathBuf::from),
            log_level: non_empty("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.db_path, Database::default_path());
        assert_eq!(config.records_path, None);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JOBTRACK_DB", "/tmp/view.db"),
            ("JOBTRACK_RECORDS", "jobs.json"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/view.db"));
        assert_eq!(config.records_path, Some(PathBuf::from("jobs.json")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("JOBTRACK_RECORDS", "  "), ("RUST_LOG", "")]);
        assert_eq!(config.records_path, None);
        assert_eq!(config.log_level, "warn");
    }
}
