//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `default_grade`.
pub const GRADE_ENV: &str = "MATHGRADE_GRADE";

/// Top-level mathgrade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathgradeConfig {
    /// Grade used when neither the command line nor the batch names one.
    #[serde(default = "default_grade")]
    pub default_grade: String,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report format written by `grade`: json, markdown or all.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Pretty-print JSON written to stdout.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_grade() -> String {
    "Grade 5".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./mathgrade-results")
}
fn default_format() -> String {
    "json".to_string()
}
fn default_pretty() -> bool {
    true
}

impl Default for MathgradeConfig {
    fn default() -> Self {
        Self {
            default_grade: default_grade(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            pretty: default_pretty(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. the explicit path, which must exist
/// 2. `mathgrade.toml` in the current directory
/// 3. `~/.config/mathgrade/config.toml`
///
/// `MATHGRADE_GRADE` overrides `default_grade` wherever it came from.
pub fn load_config_from(path: Option<&Path>) -> Result<MathgradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathgrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MathgradeConfig::default(),
    };

    if let Ok(grade) = std::env::var(GRADE_ENV) {
        if !grade.trim().is_empty() {
            config.default_grade = grade;
        }
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<MathgradeConfig> {
    let mut config: MathgradeConfig = toml::from_str(content)?;
    config.default_grade = resolve_env_vars(&config.default_grade);
    config.default_format = resolve_env_vars(&config.default_format);
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathgrade"))
}
