use super::SMIL_NAMESPACE;
use crate::subtitle::{Subtitle, SubtitleFormatter};

const EPUB_NAMESPACE: &str = "http://www.idpf.org/2007/ops";

/// Render `subtitle` as a SMIL 3.0 document.
///
/// References are written back exactly as they were loaded; nothing is
/// re-resolved or validated. `_title` has no place in the output.
pub fn to_text(subtitle: &Subtitle, _title: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "<smil xmlns=\"{}\" xmlns:epub=\"{}\" version=\"3.0\">\n",
        SMIL_NAMESPACE, EPUB_NAMESPACE
    ));
    output.push_str("\t<body>\n");
    output.push_str(&format!(
        "\t\t<seq id=\"seq000001\" epub:textref=\"{}\">\n",
        escape_attr(subtitle.text_file.as_deref().unwrap_or_default())
    ));

    for entry in &subtitle.entries {
        output.push_str(&format!("\t\t\t<par id=\"{}\">\n", escape_attr(&entry.id)));
        output.push_str(&format!(
            "\t\t\t\t<text src=\"{}\"/>\n",
            escape_attr(&entry.text_file)
        ));
        output.push_str(&format!(
            "\t\t\t\t<audio src=\"{}\" clipBegin=\"{}\" clipEnd=\"{}\"/>\n",
            escape_attr(&entry.audio_file),
            entry.start,
            entry.end
        ));
        output.push_str("\t\t\t</par>\n");
    }

    output.push_str("\t\t</seq>\n");
    output.push_str("\t</body>\n");
    output.push_str("</smil>");

    output.trim().to_string()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

/// [`SubtitleFormatter`] adapter over [`to_text`].
#[derive(Default)]
pub struct SmilFormatter {
    pub title: String,
}

impl SubtitleFormatter for SmilFormatter {
    fn format(&self, subtitle: &Subtitle) -> String {
        to_text(subtitle, &self.title)
    }

    fn extension(&self) -> &'static str {
        "smil"
    }
}
