use crate::error::{Result, SmilError};
use crate::time::TimeCode;
use roxmltree::Node;

/// Decoded `<audio>` reference of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReference {
    /// The `src` value as written.
    pub file: String,
    pub start: TimeCode,
    pub end: TimeCode,
}

/// Extract the audio reference of `par`, or `None` if it has no `<audio>` child.
///
/// Both clip bounds must be present and parse; otherwise the whole entry fails.
pub fn resolve(par: Node<'_, '_>) -> Result<Option<AudioReference>> {
    let Some(audio) = par.descendants().find(|n| n.has_tag_name("audio")) else {
        return Ok(None);
    };

    let file = audio.attribute("src").unwrap_or_default().to_string();
    let start = clip_time(audio, "clipBegin")?;
    let end = clip_time(audio, "clipEnd")?;

    Ok(Some(AudioReference { file, start, end }))
}

fn clip_time(audio: Node<'_, '_>, name: &str) -> Result<TimeCode> {
    let value = audio
        .attribute(name)
        .or_else(|| audio.attribute(name.to_lowercase().as_str()))
        .ok_or_else(|| SmilError::MalformedTime(format!("<missing {}>", name)))?;

    TimeCode::parse(value)
}
