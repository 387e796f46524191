//! SMIL media-overlay format.
//!
//! Entries in a SMIL document do not carry their own text. Each `<par>`
//! points into an external text document (`<text src="../text/a.xhtml#id"/>`)
//! and into an audio clip (`<audio src=".." clipBegin=".." clipEnd=".."/>`).
//! Loading resolves those references relative to the directory above the
//! SMIL file, caching parsed text documents in a [`TextDocumentCache`] owned
//! by the [`SmilFormat`] instance.

pub mod audio;
pub mod cache;
pub mod detect;
pub mod document;
pub mod media;
pub mod serialize;
pub mod text;

pub use cache::{TextDocument, TextDocumentCache};
pub use detect::{is_smil, SMIL_NAMESPACE};
pub use serialize::{to_text, SmilFormatter};

use crate::error::{Result, SmilError};
use crate::subtitle::{post_process, PostProcessConfig, Subtitle, SubtitleEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// References must point one directory above the SMIL file.
pub const PARENT_DIR_PREFIX: &str = "../";

/// Knobs for loading; the defaults reproduce the standard EPUB layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Sibling directory tried when a reference under `text/` is missing.
    pub fallback_text_dir: String,
    /// Collapse whitespace runs in resolved text.
    pub normalize_whitespace: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fallback_text_dir: "sync_text".to_string(),
            normalize_whitespace: true,
        }
    }
}

/// Load/save entry points for the SMIL format.
///
/// The text document cache lives as long as this value. Reusing one
/// instance across loads reuses earlier parses, even if the files changed
/// on disk in between; call [`TextDocumentCache::clear`] to drop them.
#[derive(Debug, Default)]
pub struct SmilFormat {
    options: LoadOptions,
    cache: TextDocumentCache,
}

impl SmilFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            cache: TextDocumentCache::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        "SMIL"
    }

    pub fn extension(&self) -> &'static str {
        ".smil"
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn cache(&self) -> &TextDocumentCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TextDocumentCache {
        &mut self.cache
    }

    /// Whether `lines` look like a SMIL document.
    pub fn is_mine(&self, lines: &[String], file_name: &str) -> bool {
        is_smil(lines, file_name)
    }

    /// Load a SMIL document, resolving every entry's text and audio reference.
    ///
    /// `lines` may carry the already-read content of `file_name`; when absent
    /// or empty the file is read from disk. Any failing entry aborts the load.
    pub fn load_subtitle(&mut self, lines: Option<&[String]>, file_name: &Path) -> Result<Subtitle> {
        let source = document::read_source(file_name, lines)?;
        let doc = document::parse(&source, file_name)?;

        let mut entries = Vec::new();

        for node in document::entry_nodes(&doc) {
            let id = node.attribute("id").unwrap_or_default().to_string();

            let text = text::resolve(node, file_name, &self.options, &mut self.cache)?
                .ok_or_else(|| SmilError::MissingReference {
                    entry: id.clone(),
                    kind: "text",
                })?;

            let audio = audio::resolve(node)?.ok_or_else(|| SmilError::MissingReference {
                entry: id.clone(),
                kind: "audio",
            })?;

            debug!(
                "Entry {}: {} -> {} ({})",
                id, audio.start, audio.end, text.file
            );

            entries.push(SubtitleEntry {
                index: 0,
                start: audio.start,
                end: audio.end,
                text: text.text,
                id,
                text_file: text.file,
                audio_file: audio.file,
            });
        }

        let config = PostProcessConfig {
            normalize_whitespace: self.options.normalize_whitespace,
        };
        let subtitle = Subtitle::from_entries(post_process(entries, &config));

        info!(
            "Loaded {} entries from {} ({} text documents cached)",
            subtitle.len(),
            file_name.display(),
            self.cache.len()
        );

        Ok(subtitle)
    }

    /// Render `subtitle` as a SMIL document. `title` is accepted but unused.
    pub fn to_text(&self, subtitle: &Subtitle, title: &str) -> String {
        to_text(subtitle, title)
    }

    /// Path of the first entry's audio file, if it can be found on disk.
    pub fn first_media(&self, smil_file: &Path) -> Result<Option<PathBuf>> {
        media::first_media(smil_file)
    }
}

/// Directory one level above the one holding `file`, if it has one.
pub(crate) fn containing_dir(file: &Path) -> Option<&Path> {
    let dir = file.parent().filter(|p| !p.as_os_str().is_empty())?;
    dir.parent().filter(|p| !p.as_os_str().is_empty())
}
