//! Text reference resolution.
//!
//! A `<text src="../text/chapter.xhtml#frag"/>` reference is resolved against
//! the directory above the SMIL file. When that file is missing and it lives
//! directly under `text/`, one more attempt is made under the configured
//! fallback sibling (`sync_text/` by default) using only the file name.
//! No other locations are searched.

use super::{containing_dir, LoadOptions, TextDocumentCache, PARENT_DIR_PREFIX};
use crate::error::{Result, SmilError};
use roxmltree::Node;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Decoded `<text>` reference of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReference {
    /// The `src` value as written.
    pub file: String,
    pub text: String,
}

/// Resolve the text reference of `par`.
///
/// Returns `Ok(None)` when the entry has no `<text>` child or its `src` is
/// blank. A file that cannot be found in either location is
/// [`SmilError::UnresolvablePath`]; a found file without the fragment is
/// [`SmilError::MissingFragment`].
pub fn resolve(
    par: Node<'_, '_>,
    smil_file: &Path,
    options: &LoadOptions,
    cache: &mut TextDocumentCache,
) -> Result<Option<TextReference>> {
    let Some(text_node) = par.descendants().find(|n| n.has_tag_name("text")) else {
        return Ok(None);
    };

    let src = match text_node.attribute("src") {
        Some(src) if !src.trim().is_empty() => src,
        _ => return Ok(None),
    };

    let (rel_path, fragment) = split_reference(src)?;

    let base_dir = containing_dir(smil_file)
        .ok_or_else(|| SmilError::UnresolvablePath(src.to_string()))?;

    let path = resolve_text_path(base_dir, rel_path, &options.fallback_text_dir)
        .ok_or_else(|| SmilError::UnresolvablePath(base_dir.join(rel_path).display().to_string()))?;

    let text = cache
        .get_or_load(&path)?
        .fragment(fragment)
        .ok_or_else(|| SmilError::MissingFragment {
            file: path.display().to_string(),
            fragment: fragment.to_string(),
        })?
        .to_string();

    debug!("Resolved {} to {} chars", src, text.len());

    Ok(Some(TextReference {
        file: src.to_string(),
        text,
    }))
}

/// Split `../path#fragment` into `("path", "fragment")`.
///
/// Performs no file-system access.
pub fn split_reference(src: &str) -> Result<(&str, &str)> {
    let rest = src
        .strip_prefix(PARENT_DIR_PREFIX)
        .ok_or_else(|| SmilError::MalformedReference(src.to_string()))?;

    let mut parts = rest.split('#');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(path), Some(fragment), None) if !path.is_empty() && !fragment.is_empty() => {
            Ok((path, fragment))
        }
        _ => Err(SmilError::MalformedReference(src.to_string())),
    }
}

/// Locate `rel_path` under `base_dir`, with the `text` -> fallback retry.
pub fn resolve_text_path(base_dir: &Path, rel_path: &str, fallback_dir: &str) -> Option<PathBuf> {
    let primary = base_dir.join(rel_path);
    if primary.is_file() {
        return Some(primary);
    }

    let rel = Path::new(rel_path);
    if rel.parent() != Some(Path::new("text")) {
        return None;
    }

    let fallback = base_dir.join(fallback_dir).join(rel.file_name()?);
    if !fallback.is_file() {
        return None;
    }

    warn!(
        "{} not found, using {}",
        primary.display(),
        fallback.display()
    );
    Some(fallback)
}
