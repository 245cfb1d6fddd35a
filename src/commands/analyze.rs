use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analyzers::Analyzer;
use crate::config::{loader, AnalysisConfig};
use crate::parsers::load_exports;
use crate::report::{self, ReportFormat};
use crate::types::AnalysisResult;

/// Where the rendered report goes.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    /// Every format, written as `analysis_report.{json,md,txt}`
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub paths: Vec<PathBuf>,
    pub format: ReportFormat,
    pub output: OutputTarget,
    pub config_path: Option<PathBuf>,
    pub top_keywords: Option<usize>,
    pub top_bigrams: Option<usize>,
    pub top_themes: Option<usize>,
    pub min_token_length: Option<usize>,
    pub extra_stopwords: Vec<String>,
}

/// Resolve the config the way the CLI does: file (explicit or global),
/// then flag overrides.
pub fn resolve_config(options: &AnalyzeOptions) -> Result<AnalysisConfig> {
    let mut config = loader::load(options.config_path.as_deref())?;
    config.apply_overrides(
        options.top_keywords,
        options.top_bigrams,
        options.top_themes,
        options.min_token_length,
        &options.extra_stopwords,
    );
    Ok(config)
}

pub fn run(options: &AnalyzeOptions) -> Result<()> {
    let config = resolve_config(options)?;
    let analyzer = Analyzer::new(&config).context("invalid configuration")?;

    let conversations = load_exports(&options.paths)?;
    if conversations.is_empty() {
        tracing::warn!("no conversations found; the report will be empty");
    }

    let result = analyzer.analyze(&conversations);
    write_report(&result, options.format, &options.output)
}

fn write_report(
    result: &AnalysisResult,
    format: ReportFormat,
    output: &OutputTarget,
) -> Result<()> {
    match output {
        OutputTarget::Stdout => {
            print!("{}", report::render(result, format)?);
            Ok(())
        }
        OutputTarget::File(path) => write_file(path, &report::render(result, format)?),
        OutputTarget::Directory(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
            for format in ReportFormat::ALL {
                write_file(&dir.join(format.file_name()), &report::render(result, format)?)?;
            }
            Ok(())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
