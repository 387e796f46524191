use anyhow::{Context, Result};
use clap::Parser;
use smilsub::config::{Config, OutputFormat};
use smilsub::pipeline::{convert_file, print_summary};
use smilsub::smil::SmilFormat;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "smilsub")]
#[command(version, about = "Convert SMIL media overlays to subtitles")]
#[command(long_about = "Resolve the text and audio references of a SMIL media overlay and render it as SRT, WebVTT, JSON, or normalized SMIL.")]
struct Cli {
    /// Input SMIL file
    input: PathBuf,

    /// Output subtitle file (defaults to input name with appropriate extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: srt, vtt, json, smil (defaults to the configured format)
    #[arg(short, long)]
    format: Option<String>,

    /// Print the rendered subtitles instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Only print the path of the first referenced audio file
    #[arg(long)]
    first_media: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn derive_output_path(input: &Path, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.{}", stem.to_string_lossy(), format.extension()));
    output
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Validate input file exists
    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    if cli.first_media {
        let media = SmilFormat::new()
            .first_media(&cli.input)
            .context("Failed to read SMIL document")?;
        match media {
            Some(path) => println!("{}", path.display()),
            None => info!("No audio file found for {}", cli.input.display()),
        }
        return Ok(());
    }

    // Load and validate configuration
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    // Parse format
    let format: OutputFormat = match cli.format {
        Some(ref f) => f.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_format,
    };

    let output = if cli.stdout {
        None
    } else {
        Some(
            cli.output
                .clone()
                .unwrap_or_else(|| derive_output_path(&cli.input, &format)),
        )
    };

    if output.as_deref() == Some(cli.input.as_path()) {
        anyhow::bail!("Refusing to overwrite input file: {}", cli.input.display());
    }

    info!("Input:    {}", cli.input.display());
    if let Some(ref path) = output {
        info!("Output:   {}", path.display());
    }
    info!("Format:   {}", format);

    let result = convert_file(&cli.input, output.as_deref(), format, &config)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if cli.stdout {
        println!("{}", result.content);
    } else {
        print_summary(&result);
    }

    Ok(())
}
