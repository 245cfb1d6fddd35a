use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use idea_miner::commands::analyze::{self, AnalyzeOptions, OutputTarget};
use idea_miner::config::loader;
use idea_miner::report::ReportFormat;

#[derive(Parser)]
#[command(name = "idea-miner")]
#[command(version)]
#[command(about = "Mine conversation exports for keywords, sentiment, business themes and opportunities")]
struct Cli {
    /// Export files (.json, .zip) or directories containing them
    #[arg(required_unless_present = "print_config")]
    paths: Vec<PathBuf>,

    /// Output format: text, markdown, or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Write the report to a file instead of stdout
    #[arg(long, short, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write JSON, Markdown and text reports into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Config file (.yaml/.yml or .json). Defaults to ~/.idea-miner.yaml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of top keywords
    #[arg(long)]
    top_keywords: Option<usize>,

    /// Number of top bigrams
    #[arg(long)]
    top_bigrams: Option<usize>,

    /// Number of top themes used for opportunities
    #[arg(long)]
    top_themes: Option<usize>,

    /// Minimum token length in characters
    #[arg(long)]
    min_token_length: Option<usize>,

    /// Extra stopword (repeatable)
    #[arg(long = "stopword")]
    stopwords: Vec<String>,

    /// Print the default configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("idea_miner=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", loader::defaults_yaml()?);
        return Ok(());
    }

    let format: ReportFormat = cli.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let output = match (cli.output, cli.output_dir) {
        (_, Some(dir)) => OutputTarget::Directory(dir),
        (Some(file), None) => OutputTarget::File(file),
        (None, None) => OutputTarget::Stdout,
    };

    analyze::run(&AnalyzeOptions {
        paths: cli.paths,
        format,
        output,
        config_path: cli.config,
        top_keywords: cli.top_keywords,
        top_bigrams: cli.top_bigrams,
        top_themes: cli.top_themes,
        min_token_length: cli.min_token_length,
        extra_stopwords: cli.stopwords,
    })
}
