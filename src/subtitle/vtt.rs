// WebVTT subtitle format
use super::{Subtitle, SubtitleFormatter};

pub struct VttFormatter;

impl SubtitleFormatter for VttFormatter {
    fn format(&self, subtitle: &Subtitle) -> String {
        let mut output = String::from("WEBVTT\n\n");

        for entry in &subtitle.entries {
            output.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                entry.id, entry.start, entry.end, entry.text
            ));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "vtt"
    }
}
