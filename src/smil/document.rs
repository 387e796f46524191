use crate::error::{Result, SmilError};
use regex::{Captures, Regex};
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("Invalid regex"));

const XML_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

/// Return the document source: the supplied lines when present, else the file.
pub fn read_source(file_name: &Path, lines: Option<&[String]>) -> Result<String> {
    match lines {
        Some(lines) if !lines.is_empty() => Ok(lines.join("\n")),
        _ => {
            if !file_name.is_file() {
                return Err(SmilError::FileNotFound(file_name.display().to_string()));
            }
            Ok(fs::read_to_string(file_name)?)
        }
    }
}

/// Parse markup into a tree. A DOCTYPE is tolerated; entity definitions are not expanded.
pub fn parse<'input>(source: &'input str, file_name: &Path) -> Result<Document<'input>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    Document::parse_with_options(source, options).map_err(|e| SmilError::Parse {
        file: file_name.display().to_string(),
        message: e.to_string(),
    })
}

/// Rewrite HTML named entities as numeric character references.
///
/// The five XML entities and unknown names are left alone, so the parser
/// still decodes the former and rejects the latter.
pub fn expand_html_entities(source: &str) -> Cow<'_, str> {
    NAMED_ENTITY.replace_all(source, |caps: &Captures<'_>| {
        let entity = &caps[0];
        if XML_ENTITIES.contains(&&caps[1]) {
            return entity.to_string();
        }

        let decoded = html_escape::decode_html_entities(entity);
        if decoded == entity {
            return entity.to_string();
        }

        decoded
            .chars()
            .map(|c| format!("&#x{:X};", u32::from(c)))
            .collect()
    })
}

/// `<par>` elements carrying an `id`, in document order.
pub fn entry_nodes<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants()
        .filter(|n| n.has_tag_name("par") && n.attribute("id").is_some())
}
