use super::SubtitleEntry;

/// Configuration for post-processing loaded entries.
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Trim text and collapse whitespace runs to a single space (default: true).
    pub normalize_whitespace: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
        }
    }
}

/// Post-process entries after load. Timing is passed through untouched.
pub fn post_process(entries: Vec<SubtitleEntry>, config: &PostProcessConfig) -> Vec<SubtitleEntry> {
    let mut result = entries;

    // Step 1: Normalize text
    if config.normalize_whitespace {
        result = normalize_text(result);
    }

    // Step 2: Re-number entries sequentially
    renumber_entries(result)
}

/// Collapse markup whitespace (line breaks, indentation) the way a renderer would.
fn normalize_text(entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            entry.text = entry.text.split_whitespace().collect::<Vec<_>>().join(" ");
            entry
        })
        .collect()
}

/// Re-number entries sequentially starting from 1.
fn renumber_entries(entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, mut entry)| {
            entry.index = i + 1;
            entry
        })
        .collect()
}
