use anyhow::{Context, Result};
use api_compat::compat::{CheckConfig, CompatEngine, Severity};
use api_compat::raw::RawRevision;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code when changes with a failing severity were found.
const EXIT_FAILING_CHANGES: i32 = 2;

#[derive(Parser)]
#[command(name = "api-compat")]
#[command(about = "Check Go API backward compatibility between two revisions")]
#[command(version)]
struct Args {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    #[command(about = "Compare two revisions and classify every API change")]
    Compare {
        #[arg(help = "Path to the before revision (JSON declaration tree)")]
        before: PathBuf,
        #[arg(help = "Path to the after revision (JSON declaration tree)")]
        after: PathBuf,
        #[arg(long, help = "YAML config file with an `apicompat:` section")]
        config: Option<PathBuf>,
        #[arg(long, help = "Show non-breaking changes too")]
        all: bool,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long = "exclude-file", help = "Regex of file names to exclude (repeatable)")]
        exclude_files: Vec<String>,
        #[arg(long = "exclude-dir", help = "Regex of import paths to exclude (repeatable)")]
        exclude_dirs: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Severities that fail the check (comma-separated)")]
        fail_on: Vec<Severity>,
    },
    #[command(about = "Generate the semantic fingerprint of a revision")]
    Fingerprint {
        #[arg(help = "Path to the revision (JSON declaration tree)")]
        file: PathBuf,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    match args.command {
        Commands::Compare {
            before,
            after,
            config,
            all,
            format,
            exclude_files,
            exclude_dirs,
            fail_on,
        } => {
            let mut config = match config {
                Some(path) => CheckConfig::from_yaml_file(&path)?,
                None => CheckConfig::default(),
            };
            config.exclude_files.extend(exclude_files);
            config.exclude_dirs.extend(exclude_dirs);
            config.show_all |= all;
            if !fail_on.is_empty() {
                config.fail_on = fail_on;
            }

            let before_revision = read_revision(&before)?;
            let after_revision = read_revision(&after)?;

            let engine = CompatEngine::new(config)?;
            let report = engine.check(&before_revision, &after_revision)?;
            let config = engine.config();

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report)?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    print!("{}", report.render_text(config.show_all, &config.fail_on));
                }
            }

            if report.fails(&config.fail_on) {
                std::process::exit(EXIT_FAILING_CHANGES);
            }
        }
        Commands::Fingerprint { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file '{}'", file.display()))?;

            let fingerprint = api_compat::generate_fingerprint(&content)?;
            println!("{}", fingerprint);
        }
    }

    Ok(())
}

fn read_revision(path: &Path) -> Result<RawRevision> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read revision '{}'", path.display()))?;
    RawRevision::from_json_str(&content)
        .with_context(|| format!("Failed to parse revision '{}'", path.display()))
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
