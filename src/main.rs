use anyhow::{Context, bail};
use clap::Parser;
use docstring_generator::provider::openai::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use docstring_generator::{
    AnnotateError, FileOutcome, FileReport, OpenAiProvider, Options, Pipeline, ProviderConfig,
};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docgen")]
#[command(about = "Generate docstrings for Python functions and classes")]
struct Cli {
    /// Folder to generate docs for
    #[arg(short = 'f', long)]
    folder: PathBuf,

    /// Folder to place the newly generated files
    #[arg(short = 'l', long)]
    location: PathBuf,

    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Model used for generation
    #[arg(long, env = "DOCGEN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Extension of the files to annotate
    #[arg(long, default_value = "py")]
    extension: String,

    /// Skip files whose name starts with this prefix
    #[arg(long, default_value = "test_")]
    skip_prefix: String,

    /// Print a JSON report of the run on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docstring_generator=info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.folder.is_dir() {
        eprintln!("Error: folder {} does not exist", cli.folder.display());
        std::process::exit(1);
    }

    let Some(api_key) = cli.api_key.filter(|key| !key.trim().is_empty()) else {
        bail!("no API key: set OPENAI_API_KEY or pass --api-key");
    };

    let config = ProviderConfig {
        api_url: cli.api_url,
        api_key,
        model: cli.model,
        temperature: cli.temperature,
        timeout_secs: cli.timeout,
    };
    let provider = OpenAiProvider::new(config).context("failed to set up the completion client")?;
    info!(model = %provider.config().model, "using model");

    let options = Options {
        extension: cli.extension,
        skip_prefix: cli.skip_prefix,
    };
    let pipeline = Pipeline::new(provider).with_options(options);

    let start = Instant::now();
    let outcomes = pipeline
        .process_folder(&cli.folder, &cli.location)
        .with_context(|| format!("failed to process {}", cli.folder.display()))?;

    if outcomes.is_empty() {
        eprintln!(
            "No .{} files found in {}",
            pipeline.options().extension,
            cli.folder.display()
        );
    }

    for outcome in &outcomes {
        match &outcome.result {
            Ok(insertions) => print_generated(outcome, insertions.len()),
            Err(err) => print_failed(outcome, err),
        }
    }

    if cli.json {
        let reports: Vec<FileReport> = outcomes.iter().map(FileOutcome::report).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    print_summary(outcomes.len() - failed, failed, start.elapsed());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_generated(outcome: &FileOutcome, docstrings: usize) {
    let plural = if docstrings == 1 { "docstring" } else { "docstrings" };
    if io::stderr().is_terminal() {
        eprintln!(
            "  \x1b[32m✓\x1b[0m {} \x1b[2m({} {})\x1b[0m",
            outcome.output.display(),
            docstrings,
            plural
        );
    } else {
        eprintln!("  ✓ {} ({} {})", outcome.output.display(), docstrings, plural);
    }
}

fn print_failed(outcome: &FileOutcome, err: &AnnotateError) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[31m✗\x1b[0m {}", outcome.input.display());
    } else {
        eprintln!("  ✗ {}", outcome.input.display());
    }

    let source = fs::read_to_string(&outcome.input).unwrap_or_default();
    let filename = outcome.input.display().to_string();
    eprint!("{}", err.render(&source, &filename, is_tty));
}

fn print_summary(written: usize, failed: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if written == 1 { "file" } else { "files" };
    let failed_str = if failed > 0 {
        format!(", {} failed", failed)
    } else {
        String::new()
    };

    if is_tty {
        eprintln!(
            "\n\x1b[1m✨ Annotated {} {}{} in {}\x1b[0m",
            written, files_word, failed_str, time_str
        );
    } else {
        eprintln!("\n✨ Annotated {} {}{} in {}", written, files_word, failed_str, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let millis = d.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}
