use std::path::{Path, PathBuf};

use qacheck_core::{LengthRatioLimits, QaError, RunConfig};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "qacheck.toml";
/// Points at a single config file and disables the default search.
pub const CONFIG_ENV: &str = "QACHECK_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QaCheckConfig {
    pub min_ratio: Option<f64>,
    pub max_ratio: Option<f64>,
    /// Glossary CSV applied when the command line names none.
    pub glossary: Option<String>,
    /// auto | position | id
    pub align: Option<String>,
    /// text | json | csv
    pub format: Option<String>,
    /// Max issues printed in text output.
    pub list_limit: Option<usize>,
    pub batch: Option<BatchCfg>,
    /// Free-form settings handed to the checker as its run config.
    pub rules: Option<toml::Table>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCfg {
    pub recursive: Option<bool>,
    pub fail_on_issues: Option<bool>,
}

impl QaCheckConfig {
    /// Ratio bounds from config, with built-in defaults for unset values.
    pub fn ratio_limits(&self) -> Result<LengthRatioLimits, QaError> {
        LengthRatioLimits::new(
            self.min_ratio.unwrap_or(LengthRatioLimits::DEFAULT_MIN),
            self.max_ratio.unwrap_or(LengthRatioLimits::DEFAULT_MAX),
        )
    }

    pub fn run_config(&self) -> Option<RunConfig> {
        let table = self.rules.as_ref()?;
        match serde_json::to_value(table) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

fn read_file(path: &Path) -> Result<Option<QaCheckConfig>, ConfigError> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Candidate files, highest priority first.
pub fn config_paths() -> Vec<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return vec![PathBuf::from(p)];
    }
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("qacheck").join(CONFIG_FILE));
    }
    paths
}

/// Search order: $QACHECK_CONFIG alone, else CWD/qacheck.toml then
/// <config_dir>/qacheck/qacheck.toml. Earlier files win per field.
pub fn load_config() -> Result<QaCheckConfig, ConfigError> {
    load_config_from(&config_paths())
}

pub fn load_config_from(paths: &[PathBuf]) -> Result<QaCheckConfig, ConfigError> {
    let mut merged = QaCheckConfig::default();
    for path in paths {
        if let Some(cfg) = read_file(path)? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn merge(mut a: QaCheckConfig, b: QaCheckConfig) -> QaCheckConfig {
    if a.min_ratio.is_none() {
        a.min_ratio = b.min_ratio;
    }
    if a.max_ratio.is_none() {
        a.max_ratio = b.max_ratio;
    }
    if a.glossary.is_none() {
        a.glossary = b.glossary;
    }
    if a.align.is_none() {
        a.align = b.align;
    }
    if a.format.is_none() {
        a.format = b.format;
    }
    if a.list_limit.is_none() {
        a.list_limit = b.list_limit;
    }
    a.batch = merge_opt(a.batch, b.batch, merge_batch);
    a.rules = merge_opt(a.rules, b.rules, merge_rules);
    a
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_batch(mut a: BatchCfg, b: BatchCfg) -> BatchCfg {
    if a.recursive.is_none() {
        a.recursive = b.recursive;
    }
    if a.fail_on_issues.is_none() {
        a.fail_on_issues = b.fail_on_issues;
    }
    a
}

fn merge_rules(mut a: toml::Table, b: toml::Table) -> toml::Table {
    for (k, v) in b {
        a.entry(k).or_insert(v);
    }
    a
}
