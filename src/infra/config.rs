// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds allowed per answer. The countdown restarts from here.
    pub time_limit_secs: u32,
    pub tick_interval_ms: u64,
    /// Allow `next` on a question that has no recorded answer.
    pub allow_skip: bool,
    /// Pause between stopping and re-acquiring devices on a toggle.
    pub restart_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 180,
            tick_interval_ms: 1000,
            allow_skip: true,
            restart_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub latency_ms: u64,
    pub min_score: u32,
    pub max_score: u32,
    /// Chance that each key point counts as covered.
    pub coverage_probability: f64,
    /// Fixed RNG seed for reproducible scores.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            min_score: 70,
            max_score: 99,
            coverage_probability: 0.7,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML question file; the built-in catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub question_count: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            question_count: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(paths::db_path)
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session engine cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session.time_limit_secs == 0 {
            anyhow::bail!("session.time_limit_secs must be at least 1");
        }
        if self.session.tick_interval_ms == 0 {
            anyhow::bail!("session.tick_interval_ms must be at least 1");
        }
        if self.evaluator.min_score > self.evaluator.max_score || self.evaluator.max_score > 100 {
            anyhow::bail!(
                "evaluator score range {}..={} is invalid",
                self.evaluator.min_score,
                self.evaluator.max_score
            );
        }
        if !(0.0..=1.0).contains(&self.evaluator.coverage_probability) {
            anyhow::bail!("evaluator.coverage_probability must be within 0.0..=1.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.session.time_limit_secs, 180);
        assert_eq!(c.session.tick_interval_ms, 1000);
        assert!(c.session.allow_skip);
        assert_eq!(c.evaluator.latency_ms, 1500);
        assert_eq!(c.evaluator.min_score, 70);
        assert_eq!(c.evaluator.max_score, 99);
        assert!((c.evaluator.coverage_probability - 0.7).abs() < 0.001);
        assert_eq!(c.catalog.question_count, 5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.session.time_limit_secs, 180);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[session]\ntime_limit_secs = 60\n").unwrap();
        assert_eq!(config.session.time_limit_secs, 60);
        assert_eq!(config.session.tick_interval_ms, 1000);
        assert!(config.session.allow_skip);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[session]
time_limit_secs = 90
tick_interval_ms = 500
allow_skip = false
restart_delay_ms = 0

[evaluator]
latency_ms = 0
min_score = 50
max_score = 60
coverage_probability = 1.0
seed = 42

[catalog]
path = "questions.toml"
question_count = 3

[storage]
db_path = "/tmp/mockprep-test.db"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.time_limit_secs, 90);
        assert!(!config.session.allow_skip);
        assert_eq!(config.evaluator.seed, Some(42));
        assert_eq!(config.evaluator.max_score, 60);
        assert_eq!(config.catalog.question_count, 3);
        assert_eq!(
            config.storage.resolved_db_path(),
            PathBuf::from("/tmp/mockprep-test.db")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_score_range() {
        let mut c = Config::default();
        c.evaluator.min_score = 90;
        c.evaluator.max_score = 80;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_time_limit() {
        let mut c = Config::default();
        c.session.time_limit_secs = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.session.time_limit_secs,
            config.session.time_limit_secs
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
