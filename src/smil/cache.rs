//! Parsed text documents keyed by resolved path.

use super::document;
use crate::error::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A referenced text document, reduced to its addressable fragments.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    fragments: HashMap<String, String>,
}

impl TextDocument {
    /// Index every element carrying an `id` by that id. The first element wins on duplicates.
    ///
    /// HTML named entities (`&nbsp;`, `&mdash;`, ...) are accepted alongside
    /// the XML ones.
    pub fn parse(source: &str, file_name: &Path) -> Result<Self> {
        let source = document::expand_html_entities(source);
        let doc = document::parse(&source, file_name)?;
        let mut fragments = HashMap::new();

        for node in doc.descendants().filter(|n| n.is_element()) {
            if let Some(id) = node.attribute("id") {
                fragments
                    .entry(id.to_string())
                    .or_insert_with(|| text_content(node));
            }
        }

        Ok(Self { fragments })
    }

    pub fn fragment(&self, id: &str) -> Option<&str> {
        self.fragments.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Append-only cache of parsed text documents.
///
/// Entries are never invalidated on their own: a file edited after it was
/// cached keeps serving the old content until [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct TextDocumentCache {
    documents: HashMap<PathBuf, TextDocument>,
    parse_count: usize,
}

impl TextDocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document for `path`, reading and parsing it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&TextDocument> {
        match self.documents.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => {
                debug!("Text document cache hit: {}", path.display());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!("Text document cache miss: {}", path.display());
                let source = fs::read_to_string(path)?;
                let doc = TextDocument::parse(&source, path)?;
                self.parse_count += 1;
                Ok(entry.insert(doc))
            }
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents read and parsed since creation or the last [`clear`](Self::clear).
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Drop every cached document and reset [`parse_count`](Self::parse_count).
    pub fn clear(&mut self) {
        self.documents.clear();
        self.parse_count = 0;
    }
}
