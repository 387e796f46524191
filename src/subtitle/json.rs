// JSON subtitle format
use super::{Subtitle, SubtitleFormatter};
use serde::Serialize;

#[derive(Default)]
pub struct JsonFormatter {
    pub source_file: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    metadata: JsonMetadata,
    subtitles: Vec<JsonSubtitle>,
}

#[derive(Serialize)]
struct JsonMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_file: Option<String>,
    subtitle_count: usize,
}

#[derive(Serialize)]
struct JsonSubtitle {
    index: usize,
    id: String,
    start: f64,
    end: f64,
    start_formatted: String,
    end_formatted: String,
    text: String,
    text_file: String,
    audio_file: String,
}

impl SubtitleFormatter for JsonFormatter {
    fn format(&self, subtitle: &Subtitle) -> String {
        let output = JsonOutput {
            metadata: JsonMetadata {
                source_file: self.source_file.clone(),
                text_file: subtitle.text_file.clone(),
                audio_file: subtitle.audio_file.clone(),
                subtitle_count: subtitle.len(),
            },
            subtitles: subtitle
                .entries
                .iter()
                .map(|e| JsonSubtitle {
                    index: e.index,
                    id: e.id.clone(),
                    start: e.start.as_duration().as_secs_f64(),
                    end: e.end.as_duration().as_secs_f64(),
                    start_formatted: e.start.to_string(),
                    end_formatted: e.end.to_string(),
                    text: e.text.clone(),
                    text_file: e.text_file.clone(),
                    audio_file: e.audio_file.clone(),
                })
                .collect(),
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
