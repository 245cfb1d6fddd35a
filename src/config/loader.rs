use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::models::AnalysisConfig;

const CONFIG_FILENAME: &str = ".idea-miner.yaml";

/// Resolve the config: an explicit path must exist; otherwise
/// `$HOME/.idea-miner.yaml` is used when present, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    match global_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!("using config {}", path.display());
            load_file(&path)
        }
        _ => Ok(AnalysisConfig::default()),
    }
}

/// `$HOME/.idea-miner.yaml`
pub fn global_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(CONFIG_FILENAME))
}

/// YAML for `.yaml` / `.yml`, JSON for anything else.
pub fn load_file(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref(),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML config '{}'", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON config '{}'", path.display()))
    }
}

/// Default config as YAML (for `--print-config`).
pub fn defaults_yaml() -> Result<String> {
    Ok(serde_yaml::to_string(&AnalysisConfig::default())?)
}
