//! Integration tests for smilsub
//!
//! Each test builds an EPUB-style layout on disk:
//!
//! ```text
//! <root>/smil/chapter.smil
//! <root>/text/001.xhtml
//! <root>/audio/001.mp3
//! ```

use smilsub::config::{Config, OutputFormat};
use smilsub::smil::{is_smil, LoadOptions, SmilFormat};
use smilsub::subtitle::{create_formatter, Subtitle};
use smilsub::{convert_file, SmilError, TimeCode};

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEXT_001: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Chapter 1</title></head>
<body>
  <p>
    <span id="t1">Hello world</span>
    <span id="t2">Second   line,
      with <em>emphasis</em> &amp; more.</span>
  </p>
</body>
</html>"#;

struct Book {
    dir: TempDir,
}

impl Book {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["smil", "text", "audio"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn smil(&self, pars: &str) -> PathBuf {
        self.write("smil/chapter.smil", &smil_document(pars))
    }
}

fn smil_document(pars: &str) -> String {
    format!(
        r#"<smil xmlns="http://www.w3.org/ns/SMIL" xmlns:epub="http://www.idpf.org/2007/ops" version="3.0">
	<body>
		<seq id="seq000001" epub:textref="../text/001.xhtml">
{}
		</seq>
	</body>
</smil>"#,
        pars
    )
}

fn par(id: &str, text_src: &str, begin: &str, end: &str) -> String {
    format!(
        r#"			<par id="{}">
				<text src="{}"/>
				<audio src="../audio/001.mp3" clipBegin="{}" clipEnd="{}"/>
			</par>"#,
        id, text_src, begin, end
    )
}

fn load(path: &Path) -> smilsub::Result<Subtitle> {
    SmilFormat::new().load_subtitle(None, path)
}

// ============================================================================
// Loading
// ============================================================================

mod load_tests {
    use super::*;

    #[test]
    fn test_single_entry_end_to_end() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par(
            "p1",
            "../text/001.xhtml#t1",
            "00:00:00.000",
            "00:00:02.340",
        ));

        let subtitle = load(&smil).unwrap();

        assert_eq!(subtitle.len(), 1);
        let entry = &subtitle.entries[0];
        assert_eq!(entry.index, 1);
        assert_eq!(entry.id, "p1");
        assert_eq!(entry.start.as_millis(), 0);
        assert_eq!(entry.end.as_millis(), 2340);
        assert_eq!(entry.text, "Hello world");
        assert_eq!(entry.text_file, "../text/001.xhtml#t1");
        assert_eq!(entry.audio_file, "../audio/001.mp3");
        assert_eq!(subtitle.text_file.as_deref(), Some("../text/001.xhtml"));
        assert_eq!(subtitle.audio_file.as_deref(), Some("../audio/001.mp3"));
    }

    #[test]
    fn test_text_is_normalized_and_decoded() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p2", "../text/001.xhtml#t2", "1", "2"));

        let subtitle = load(&smil).unwrap();

        assert_eq!(subtitle.entries[0].text, "Second line, with emphasis & more.");
    }

    #[test]
    fn test_html_named_entities_in_text_document() {
        let book = Book::new();
        book.write(
            "text/001.xhtml",
            r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><span id="t1">Hello&nbsp;world&hellip;</span></body></html>"#,
        );
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        let subtitle = load(&smil).unwrap();
        assert_eq!(subtitle.entries[0].text, "Hello world\u{2026}");

        let mut raw = SmilFormat::with_options(LoadOptions {
            normalize_whitespace: false,
            ..Default::default()
        });
        let subtitle = raw.load_subtitle(None, &smil).unwrap();
        assert_eq!(subtitle.entries[0].text, "Hello\u{a0}world\u{2026}");
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p2", "../text/001.xhtml#t2", "1", "2"));

        let mut format = SmilFormat::with_options(LoadOptions {
            normalize_whitespace: false,
            ..Default::default()
        });
        let subtitle = format.load_subtitle(None, &smil).unwrap();

        assert!(subtitle.entries[0].text.contains("Second   line,\n"));
    }

    #[test]
    fn test_entries_keep_document_order_and_are_renumbered() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let pars = [
            par("b", "../text/001.xhtml#t2", "00:00:05.000", "00:00:06.000"),
            par("a", "../text/001.xhtml#t1", "00:00:01.000", "00:00:02.000"),
        ]
        .join("\n");
        let smil = book.smil(&pars);

        let subtitle = load(&smil).unwrap();

        let ids: Vec<&str> = subtitle.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(subtitle.entries[0].index, 1);
        assert_eq!(subtitle.entries[1].index, 2);
        assert_eq!(subtitle.text_file.as_deref(), Some("../text/001.xhtml"));
    }

    #[test]
    fn test_broad_clip_time_notation() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "1:05.5", "66.25s"));

        let subtitle = load(&smil).unwrap();

        assert_eq!(subtitle.entries[0].start, TimeCode::from_millis(65_500));
        assert_eq!(subtitle.entries[0].end, TimeCode::from_millis(66_250));
    }

    #[test]
    fn test_empty_sequence_yields_empty_subtitle() {
        let book = Book::new();
        let smil = book.smil("");

        let subtitle = load(&smil).unwrap();

        assert!(subtitle.is_empty());
        assert!(subtitle.text_file.is_none());
        assert!(subtitle.audio_file.is_none());
    }

    #[test]
    fn test_supplied_lines_are_used_instead_of_file() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        // Only the directory matters; the file itself is never written
        let smil = book.root().join("smil/in-memory.smil");
        let lines: Vec<String> = smil_document(&par("p1", "../text/001.xhtml#t1", "0", "1"))
            .lines()
            .map(str::to_string)
            .collect();

        let subtitle = SmilFormat::new()
            .load_subtitle(Some(lines.as_slice()), &smil)
            .unwrap();

        assert_eq!(subtitle.entries[0].text, "Hello world");
    }
}

// ============================================================================
// Reference cache
// ============================================================================

mod cache_tests {
    use super::*;

    #[test]
    fn test_shared_text_file_parsed_once() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let pars = [
            par("p1", "../text/001.xhtml#t1", "0", "1"),
            par("p2", "../text/001.xhtml#t2", "1", "2"),
        ]
        .join("\n");
        let smil = book.smil(&pars);

        let mut format = SmilFormat::new();
        let subtitle = format.load_subtitle(None, &smil).unwrap();

        assert_eq!(format.cache().parse_count(), 1);
        assert_eq!(format.cache().len(), 1);
        assert_eq!(subtitle.entries[0].text, "Hello world");
        assert_ne!(subtitle.entries[0].text, subtitle.entries[1].text);
    }

    #[test]
    fn test_cache_outlives_a_single_load() {
        let book = Book::new();
        let text = book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        let mut format = SmilFormat::new();
        format.load_subtitle(None, &smil).unwrap();

        fs::write(&text, r#"<html><span id="t1">Changed</span></html>"#).unwrap();

        let second = format.load_subtitle(None, &smil).unwrap();
        assert_eq!(second.entries[0].text, "Hello world");
        assert_eq!(format.cache().parse_count(), 1);

        format.cache_mut().clear();
        let third = format.load_subtitle(None, &smil).unwrap();
        assert_eq!(third.entries[0].text, "Changed");
    }

    #[test]
    fn test_fresh_format_does_not_share_cache() {
        let book = Book::new();
        let text = book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        load(&smil).unwrap();
        fs::write(&text, r#"<html><span id="t1">Changed</span></html>"#).unwrap();

        assert_eq!(load(&smil).unwrap().entries[0].text, "Changed");
    }
}

// ============================================================================
// Directory fallback
// ============================================================================

mod fallback_tests {
    use super::*;

    #[test]
    fn test_text_falls_back_to_sync_text() {
        let book = Book::new();
        book.write("sync_text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        let subtitle = load(&smil).unwrap();

        assert_eq!(subtitle.entries[0].text, "Hello world");
        // Provenance keeps the reference as written
        assert_eq!(subtitle.entries[0].text_file, "../text/001.xhtml#t1");
    }

    #[test]
    fn test_configured_fallback_dir() {
        let book = Book::new();
        book.write("overlay_text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        let mut format = SmilFormat::with_options(LoadOptions {
            fallback_text_dir: "overlay_text".to_string(),
            ..Default::default()
        });

        assert_eq!(
            format.load_subtitle(None, &smil).unwrap().entries[0].text,
            "Hello world"
        );
    }

    #[test]
    fn test_no_fallback_for_other_directories() {
        let book = Book::new();
        book.write("sync_text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../content/001.xhtml#t1", "0", "1"));

        let result = load(&smil);

        assert!(matches!(result, Err(SmilError::UnresolvablePath(_))));
    }

    #[test]
    fn test_missing_everywhere_is_unresolvable() {
        let book = Book::new();
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        assert!(matches!(load(&smil), Err(SmilError::UnresolvablePath(_))));
    }
}

// ============================================================================
// Fatal errors
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_missing_fragment_is_distinct_from_missing_file() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#nope", "0", "1"));

        match load(&smil) {
            Err(SmilError::MissingFragment { fragment, .. }) => assert_eq!(fragment, "nope"),
            other => panic!("expected MissingFragment, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_shape_rejected_before_file_lookup() {
        let book = Book::new();
        // None of these files exist; shape is checked first
        for src in ["../text/001.xhtml", "../text/001.xhtml#a#b", "text/001.xhtml#t1"] {
            let smil = book.smil(&par("p1", src, "0", "1"));
            assert!(
                matches!(load(&smil), Err(SmilError::MalformedReference(_))),
                "{} should be malformed",
                src
            );
        }
    }

    #[test]
    fn test_one_bad_time_aborts_whole_load() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let pars = [
            par("p1", "../text/001.xhtml#t1", "0", "1"),
            par("p2", "../text/001.xhtml#t2", "later", "2"),
        ]
        .join("\n");
        let smil = book.smil(&pars);

        assert!(matches!(load(&smil), Err(SmilError::MalformedTime(_))));
    }

    #[test]
    fn test_missing_audio_reference() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(r#"<par id="p1"><text src="../text/001.xhtml#t1"/></par>"#);

        match load(&smil) {
            Err(SmilError::MissingReference { entry, kind }) => {
                assert_eq!(entry, "p1");
                assert_eq!(kind, "audio");
            }
            other => panic!("expected MissingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_reference() {
        let book = Book::new();
        let smil = book.smil(
            r#"<par id="p1"><audio src="../audio/001.mp3" clipBegin="0" clipEnd="1"/></par>"#,
        );

        assert!(matches!(
            load(&smil),
            Err(SmilError::MissingReference { kind: "text", .. })
        ));
    }

    #[test]
    fn test_unparseable_smil() {
        let book = Book::new();
        let smil = book.write("smil/broken.smil", "<smil xmlns=\"http://www.w3.org/ns/SMIL\"><body>");

        assert!(matches!(load(&smil), Err(SmilError::Parse { .. })));
    }

    #[test]
    fn test_unparseable_text_document() {
        let book = Book::new();
        book.write("text/001.xhtml", "<html><span id=\"t1\">&bogus;</span></html>");
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        assert!(matches!(load(&smil), Err(SmilError::Parse { .. })));
    }
}

// ============================================================================
// Serialization and detection
// ============================================================================

mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_serialize_and_reload() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let pars = [
            par("p1", "../text/001.xhtml#t1", "0:00:00.5", "2.34"),
            par("p2", "../text/001.xhtml#t2", "00:00:02.340", "00:01:00.001"),
        ]
        .join("\n");
        let smil = book.smil(&pars);

        let mut format = SmilFormat::new();
        let original = format.load_subtitle(None, &smil).unwrap();
        let rendered = format.to_text(&original, "Chapter 1");

        let copy = book.write("smil/copy.smil", &rendered);
        let reloaded = SmilFormat::new().load_subtitle(None, &copy).unwrap();

        assert_eq!(reloaded.len(), original.len());
        for (a, b) in original.entries.iter().zip(&reloaded.entries) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert_eq!(a.text, b.text);
            assert_eq!(a.id, b.id);
        }
        assert_eq!(reloaded.text_file, original.text_file);
        assert!(rendered.contains("clipBegin=\"00:00:00.500\" clipEnd=\"00:00:02.340\""));
    }

    #[test]
    fn test_serialized_output_is_detected() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        let subtitle = load(&smil).unwrap();
        let rendered = create_formatter(OutputFormat::Smil).format(&subtitle);
        let lines: Vec<String> = rendered.lines().map(str::to_string).collect();

        assert!(is_smil(&lines, "copy.smil"));
        assert!(!is_smil(&["WEBVTT".to_string()], "a.vtt"));
    }
}

// ============================================================================
// First media and conversion
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_first_media() {
        let book = Book::new();
        let audio = book.write("audio/001.mp3", "ID3");
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        // Text resolution is not needed to find the audio
        assert_eq!(SmilFormat::new().first_media(&smil).unwrap(), Some(audio));
    }

    #[test]
    fn test_first_media_absent() {
        let book = Book::new();
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "1"));

        assert_eq!(SmilFormat::new().first_media(&smil).unwrap(), None);
    }

    #[test]
    fn test_convert_to_srt_file() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "00:00:01.500", "00:00:04.000"));
        let output = book.root().join("smil/chapter.srt");

        let result = convert_file(&smil, Some(&output), OutputFormat::Srt, &Config::default()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, result.content);
        assert!(written.contains("1\n00:00:01,500 --> 00:00:04,000\nHello world"));
        assert_eq!(result.stats.subtitle_entries, 1);
        assert_eq!(result.stats.text_documents, 1);
    }

    #[test]
    fn test_convert_to_json_in_memory() {
        let book = Book::new();
        book.write("text/001.xhtml", TEXT_001);
        let smil = book.smil(&par("p1", "../text/001.xhtml#t1", "0", "2.5"));

        let result = convert_file(&smil, None, OutputFormat::Json, &Config::default()).unwrap();

        assert!(result.output_path.is_none());
        assert!(result.content.contains("\"subtitle_count\": 1"));
        assert!(result.content.contains("\"end_formatted\": \"00:00:02.500\""));
    }
}
