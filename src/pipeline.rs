use crate::config::{Config, OutputFormat};
use crate::error::{Result, SmilError};
use crate::smil::SmilFormat;
use crate::subtitle::{create_formatter, json::JsonFormatter, Subtitle, SubtitleFormatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Statistics from one conversion.
#[derive(Debug, Clone)]
pub struct ConvertStats {
    /// Total time taken.
    pub total_time: Duration,
    /// Number of subtitle entries loaded.
    pub subtitle_entries: usize,
    /// Number of distinct text documents parsed.
    pub text_documents: usize,
    /// Sum of entry durations.
    pub audio_duration: Duration,
}

/// Result of converting a SMIL document.
#[derive(Debug)]
pub struct ConvertResult {
    /// Where the rendered output went, `None` when returned in memory only.
    pub output_path: Option<PathBuf>,
    /// Rendered output.
    pub content: String,
    /// Loaded subtitle.
    pub subtitle: Subtitle,
    pub stats: ConvertStats,
}

/// Read `input` as lines.
pub fn read_lines(input: &Path) -> Result<Vec<String>> {
    if !input.is_file() {
        return Err(SmilError::FileNotFound(input.display().to_string()));
    }
    Ok(fs::read_to_string(input)?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Load a SMIL document and render it in `format`.
///
/// When `output` is given the rendering is written there as well.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    config: &Config,
) -> Result<ConvertResult> {
    let start_time = Instant::now();

    let lines = read_lines(input)?;
    let mut smil = SmilFormat::with_options(config.load_options());

    let file_name = input.display().to_string();
    if !smil.is_mine(&lines, &file_name) {
        return Err(SmilError::Parse {
            file: file_name,
            message: "not a SMIL document".to_string(),
        });
    }

    info!("Loading {}", input.display());
    let subtitle = smil.load_subtitle(Some(lines.as_slice()), input)?;

    let formatter: Box<dyn SubtitleFormatter> = match format {
        OutputFormat::Json => Box::new(JsonFormatter {
            source_file: Some(file_name),
        }),
        other => create_formatter(other),
    };
    let content = formatter.format(&subtitle);

    if let Some(path) = output {
        fs::write(path, &content)?;
        info!("Wrote {} entries to {:?}", subtitle.len(), path);
    }

    let stats = ConvertStats {
        total_time: start_time.elapsed(),
        subtitle_entries: subtitle.len(),
        text_documents: smil.cache().len(),
        audio_duration: subtitle.entries.iter().map(|e| e.duration()).sum(),
    };

    Ok(ConvertResult {
        output_path: output.map(Path::to_path_buf),
        content,
        subtitle,
        stats,
    })
}

/// Print a summary of the conversion.
pub fn print_summary(result: &ConvertResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                        Conversion Complete                     ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    if let Some(ref path) = result.output_path {
        println!("  Output:     {}", path.display());
    }
    println!("  Entries:    {}", result.stats.subtitle_entries);
    println!("  Text docs:  {}", result.stats.text_documents);
    if let Some(ref audio) = result.subtitle.audio_file {
        println!("  Audio:      {}", audio);
    }
    println!(
        "  Duration:   {:.1}s audio",
        result.stats.audio_duration.as_secs_f64()
    );
    println!(
        "  Total:      {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
