pub mod align;
pub mod batch;
pub mod check;
pub mod schema;

use std::path::PathBuf;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use qacheck_config::QaCheckConfig;
use qacheck_core::{Glossary, LengthRatioLimits};
use qacheck_services::AlignMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlignArg {
    /// By id when both inputs carry ids, else by position
    Auto,
    /// i-th source with i-th target
    Position,
    /// Merge rows sharing an id
    Id,
}

impl From<AlignArg> for AlignMode {
    fn from(a: AlignArg) -> Self {
        match a {
            AlignArg::Auto => AlignMode::Auto,
            AlignArg::Position => AlignMode::Position,
            AlignArg::Id => AlignMode::Id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RatioArgs {
    /// Lowest accepted target/source length ratio [default: 0.5]
    #[arg(long)]
    pub min_ratio: Option<f64>,
    /// Highest accepted target/source length ratio [default: 3.0]
    #[arg(long)]
    pub max_ratio: Option<f64>,
}

impl RatioArgs {
    /// Command line first, then config, then built-in defaults.
    pub fn resolve(&self, cfg: &QaCheckConfig) -> Result<LengthRatioLimits> {
        let min = self
            .min_ratio
            .or(cfg.min_ratio)
            .unwrap_or(LengthRatioLimits::DEFAULT_MIN);
        let max = self
            .max_ratio
            .or(cfg.max_ratio)
            .unwrap_or(LengthRatioLimits::DEFAULT_MAX);
        Ok(LengthRatioLimits::new(min, max)?)
    }
}

pub fn resolve_align(arg: Option<AlignArg>, cfg: &QaCheckConfig) -> Result<AlignMode> {
    if let Some(a) = arg {
        return Ok(a.into());
    }
    match cfg.align.as_deref() {
        Some(s) => Ok(s.parse::<AlignMode>().wrap_err("invalid 'align' in config")?),
        None => Ok(AlignMode::Auto),
    }
}

pub fn resolve_format(arg: Option<OutputFormat>, cfg: &QaCheckConfig) -> Result<OutputFormat> {
    if let Some(f) = arg {
        return Ok(f);
    }
    match cfg.format.as_deref() {
        Some(s) => OutputFormat::from_str(s, true)
            .map_err(|e| color_eyre::eyre::eyre!("invalid 'format' in config: {e}")),
        None => Ok(OutputFormat::Text),
    }
}

/// Glossary path from the command line or config, and the loaded table.
pub fn load_glossary(
    arg: Option<PathBuf>,
    cfg: &QaCheckConfig,
) -> Result<Option<(PathBuf, Glossary)>> {
    let Some(path) = arg.or_else(|| cfg.glossary.as_ref().map(PathBuf::from)) else {
        return Ok(None);
    };
    let glossary = qacheck_import::read_glossary(&path)?;
    if glossary.is_empty() {
        crate::ui_warn!("glossary {} has no usable terms", path.display());
    }
    tracing::info!(event = "glossary_loaded", path = %path.display(), terms = glossary.len());
    Ok(Some((path, glossary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_beat_config() {
        let cfg = QaCheckConfig {
            min_ratio: Some(0.2),
            max_ratio: Some(5.0),
            align: Some("id".into()),
            format: Some("JSON".into()),
            ..Default::default()
        };
        let ratio = RatioArgs {
            min_ratio: Some(0.4),
            max_ratio: None,
        };
        let limits = ratio.resolve(&cfg).unwrap();
        assert_eq!((limits.min(), limits.max()), (0.4, 5.0));
        assert_eq!(resolve_align(None, &cfg).unwrap(), AlignMode::Id);
        assert_eq!(
            resolve_align(Some(AlignArg::Position), &cfg).unwrap(),
            AlignMode::Position
        );
        assert_eq!(resolve_format(None, &cfg).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn bad_config_values_are_errors() {
        let cfg = QaCheckConfig {
            align: Some("fuzzy".into()),
            format: Some("xml".into()),
            ..Default::default()
        };
        assert!(resolve_align(None, &cfg).is_err());
        assert!(resolve_format(None, &cfg).is_err());
        let swapped = RatioArgs {
            min_ratio: Some(3.0),
            max_ratio: Some(1.0),
        };
        assert!(swapped.resolve(&QaCheckConfig::default()).is_err());
    }
}
