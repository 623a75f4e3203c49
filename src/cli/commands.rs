use crate::convert::{markdown_convert, summary_convert, SummaryOptions, DEFAULT_BRANCH, DEFAULT_TITLE};
use crate::diff::load_diff;
use crate::generator::{generate, GeneratorConfig, DEFAULT_OUTPUT_DIR, SUMMARY_FILE};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::spec::load_spec;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for diff2curl
///
/// Turns an OpenAPI diff into curl examples, per-endpoint markdown pages and a
/// README summarizing the changes.
#[derive(Parser, Debug)]
#[command(name = "diff2curl", version)]
#[command(about = "Generate curl examples and release notes from an OpenAPI diff", long_about = None)]
pub struct Cli {
    /// Log at debug level (adds `diff2curl=debug` even when RUST_LOG is set)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate example files, summary log and README from a spec and a diff
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        openapi: PathBuf,

        /// Path to the diff (JSON/YAML entries, or the sectioned text format)
        diff: PathBuf,

        /// Output directory for example files and summary.txt
        #[arg(short, long, env = "DIFF2CURL_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Base URL for examples (default: first `servers` entry)
        #[arg(long, env = "DIFF2CURL_BASE_URL")]
        base_url: Option<String>,

        /// Also write per-endpoint markdown pages here
        #[arg(short, long, env = "DIFF2CURL_MARKDOWN_DIR")]
        markdown_dir: Option<PathBuf>,

        /// Base URL for README hyperlinks, e.g. https://github.com/org/repo/blob
        #[arg(long, env = "DIFF2CURL_GITHUB_URL")]
        github_url: Option<String>,

        /// Branch name used in README hyperlinks
        #[arg(long, env = "DIFF2CURL_BRANCH", default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Repository directory holding the output tree, used in README hyperlinks
        #[arg(long)]
        source_dir: Option<String>,

        /// Do not write <OUTPUT_DIR>/README.md
        #[arg(long, default_value_t = false)]
        no_readme: bool,
    },
    /// Convert generated example files into markdown pages
    Markdown {
        /// Output directory of a previous `generate` run
        output_dir: PathBuf,

        /// Directory for the markdown pages
        markdown_dir: PathBuf,
    },
    /// Render a README from a summary log
    Summary {
        /// Path to summary.txt
        summary_file: PathBuf,

        /// Write the README here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL for hyperlinks, e.g. https://github.com/org/repo/blob
        #[arg(long, env = "DIFF2CURL_GITHUB_URL")]
        github_url: Option<String>,

        /// Branch name used in hyperlinks
        #[arg(long, env = "DIFF2CURL_BRANCH", default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Repository directory holding the output tree
        #[arg(long)]
        source_dir: Option<String>,

        /// README title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Leave out shields.io badges
        #[arg(long, default_value_t = false)]
        no_badges: bool,

        /// Leave out the table of contents
        #[arg(long, default_value_t = false)]
        no_toc: bool,
    },
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            openapi,
            diff,
            output_dir,
            base_url,
            markdown_dir,
            github_url,
            branch,
            source_dir,
            no_readme,
        } => {
            let spec = load_spec(&openapi, base_url.as_deref())?;
            let records = load_diff(&diff)?;
            let config = GeneratorConfig {
                output_dir: output_dir.clone(),
                base_url: None,
            };
            let results = generate(&spec, &records, &config)?;

            if let Some(md_dir) = &markdown_dir {
                markdown_convert(&output_dir, md_dir)?;
            }

            if !no_readme {
                let options = SummaryOptions {
                    github_url,
                    branch,
                    source_dir,
                    ..SummaryOptions::default()
                };
                let readme = summary_convert(&output_dir.join(SUMMARY_FILE), &options)?;
                let readme_path = output_dir.join("README.md");
                write_file(&readme_path, &readme)?;
                info!(readme = %readme_path.display(), "README written");
            }

            let generated = results.iter().filter(|r| r.is_generated()).count();
            println!(
                "Generated {generated} example(s), skipped {} in {}",
                results.len() - generated,
                output_dir.display()
            );
            Ok(())
        }
        Commands::Markdown {
            output_dir,
            markdown_dir,
        } => {
            let pages = markdown_convert(&output_dir, &markdown_dir)?;
            println!("Wrote {} markdown page(s) to {}", pages.len(), markdown_dir.display());
            Ok(())
        }
        Commands::Summary {
            summary_file,
            output,
            github_url,
            branch,
            source_dir,
            title,
            no_badges,
            no_toc,
        } => {
            let options = SummaryOptions {
                title,
                github_url,
                branch,
                source_dir,
                include_badges: !no_badges,
                include_toc: !no_toc,
            };
            let readme = summary_convert(&summary_file, &options)?;
            match output {
                Some(path) => write_file(&path, &readme)?,
                None => print!("{readme}"),
            }
            Ok(())
        }
    }
}

/// Parse process arguments, set up logging and run.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging_with_config(&log_config)?;
    run(cli)
}
