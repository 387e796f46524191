use super::{audio, containing_dir, document, PARENT_DIR_PREFIX};
use crate::error::{Result, SmilError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locate the audio file referenced by the first entry of `smil_file`.
///
/// This is a best-effort preview lookup: `Ok(None)` when there are no
/// entries, the reference is not `../`-relative, the SMIL file has no
/// grandparent directory, or the audio file does not exist. Unreadable or
/// unparseable documents and a first entry without `<audio>` are errors.
pub fn first_media(smil_file: &Path) -> Result<Option<PathBuf>> {
    let source = document::read_source(smil_file, None)?;
    let doc = document::parse(&source, smil_file)?;

    let Some(node) = document::entry_nodes(&doc).next() else {
        return Ok(None);
    };

    let audio = audio::resolve(node)?.ok_or_else(|| SmilError::MissingReference {
        entry: node.attribute("id").unwrap_or_default().to_string(),
        kind: "audio",
    })?;

    let Some(base_dir) = containing_dir(smil_file) else {
        return Ok(None);
    };

    let Some(rel_path) = audio.file.strip_prefix(PARENT_DIR_PREFIX) else {
        debug!("First audio reference is not parent-relative: {}", audio.file);
        return Ok(None);
    };

    let path = base_dir.join(rel_path);
    if !path.is_file() {
        debug!("First audio file does not exist: {}", path.display());
        return Ok(None);
    }

    Ok(Some(path))
}
