/// Namespace every SMIL 3.0 document declares on its root element.
pub const SMIL_NAMESPACE: &str = "http://www.w3.org/ns/SMIL";

/// Whether `lines` look like a SMIL document: the first line must carry the
/// SMIL namespace. Anything else is simply another format.
pub fn is_smil(lines: &[String], file_name: &str) -> bool {
    let Some(first) = lines.first() else {
        return false;
    };

    if !first.contains(SMIL_NAMESPACE) {
        return false;
    }

    has_content(lines, file_name)
}

fn has_content(lines: &[String], _file_name: &str) -> bool {
    lines.iter().any(|line| !line.trim().is_empty())
}
