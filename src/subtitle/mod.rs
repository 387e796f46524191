pub mod json;
pub mod postprocess;
pub mod srt;
pub mod vtt;

pub use postprocess::{post_process, PostProcessConfig};

use crate::config::OutputFormat;
use crate::smil::SmilFormatter;
use crate::time::TimeCode;

/// One synchronized unit: resolved text plus the references it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start: TimeCode,
    pub end: TimeCode,
    pub text: String,
    /// Identifier of the entry in the source document.
    pub id: String,
    /// Text reference exactly as written in the source, fragment included.
    pub text_file: String,
    /// Audio reference exactly as written in the source.
    pub audio_file: String,
}

impl SubtitleEntry {
    pub fn duration(&self) -> std::time::Duration {
        self.end.as_duration().saturating_sub(self.start.as_duration())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subtitle {
    pub entries: Vec<SubtitleEntry>,
    /// First entry's text reference with the fragment stripped.
    pub text_file: Option<String>,
    /// First entry's audio reference.
    pub audio_file: Option<String>,
}

impl Subtitle {
    /// Build a subtitle, deriving the top-level metadata from the first entry.
    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        let text_file = entries
            .first()
            .and_then(|e| e.text_file.split('#').next())
            .map(str::to_string);
        let audio_file = entries.first().map(|e| e.audio_file.clone());

        Self {
            entries,
            text_file,
            audio_file,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub trait SubtitleFormatter {
    fn format(&self, subtitle: &Subtitle) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn SubtitleFormatter> {
    match format {
        OutputFormat::Srt => Box::new(srt::SrtFormatter),
        OutputFormat::Vtt => Box::new(vtt::VttFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::default()),
        OutputFormat::Smil => Box::new(SmilFormatter::default()),
    }
}
