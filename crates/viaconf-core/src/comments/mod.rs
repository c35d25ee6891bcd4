//! Comment records harvested from the template and re-rendered on save.
//!
//! JSON has no comments, so `serde_json` cannot carry them through a
//! decode/encode cycle. Instead the template text is scanned once per load
//! and every comment is remembered against the dotted path of the key it
//! annotates:
//!
//! ```text
//! # ViaConf settings            <- document header (path "")
//!
//! {
//!  # Check for updates on boot  <- header of "checkforupdates"
//!  "checkforupdates":true,
//!  "max-pps":800, # -1 disables <- inline comment of "max-pps"
//! ```
//!
//! When the effective document is saved, its encoded text is walked line by
//! line with the same path derivation and each record is put back above (or
//! after) the line of its key. Comments are only ever sourced from the
//! template; whatever a user writes into their own file is discarded on the
//! next load.

pub mod scan;

use std::collections::HashMap;

use crate::document::UnsupportedOptions;
use scan::{split_comment, PathTracker};

/// Comments attached to one key path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentRecord {
    /// Full-line comments above the key, markers included. An empty string
    /// separates two comment blocks.
    pub header: Vec<String>,
    /// Comment trailing the key's line, marker included.
    pub inline: Option<String>,
}

impl CommentRecord {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.inline.is_none()
    }

    fn clear(&mut self) {
        self.header.clear();
        self.inline = None;
    }
}

/// The comment records of one template, keyed by dotted path.
#[derive(Debug, Clone)]
pub struct CommentStore {
    separator: char,
    records: HashMap<String, CommentRecord>,
}

impl CommentStore {
    /// Path under which the document-level header is stored.
    pub const DOCUMENT: &'static str = "";

    /// Scans template text and collects its comments.
    ///
    /// Consecutive comment lines form a block; a blank line ends a block.
    /// Blocks seen before the first key are split: up to
    /// `header_block_count` of them belong to the document, the remainder
    /// to the first key.
    pub fn parse(raw: &str, separator: char, header_block_count: usize) -> Self {
        let mut records = HashMap::new();
        let mut tracker = PathTracker::new(separator);
        let mut pending: Vec<Vec<String>> = Vec::new();
        let mut block_open = false;
        let mut seen_key = false;

        for line in raw.lines() {
            let (code, comment) = split_comment(line);
            if code.trim().is_empty() {
                match comment {
                    Some(text) => {
                        if !block_open {
                            pending.push(Vec::new());
                            block_open = true;
                        }
                        if let Some(block) = pending.last_mut() {
                            block.push(text.to_string());
                        }
                    }
                    None => block_open = false,
                }
                continue;
            }
            block_open = false;

            // Opening lines leave pending comments for the next key; a
            // closing line ends the scope they were written in.
            let Some(path) = tracker.advance(code) else {
                if code.contains(['}', ']']) {
                    pending.clear();
                }
                continue;
            };

            if !seen_key {
                seen_key = true;
                let count = header_block_count.min(pending.len());
                let document: Vec<Vec<String>> = pending.drain(..count).collect();
                if !document.is_empty() {
                    records.insert(
                        Self::DOCUMENT.to_string(),
                        CommentRecord {
                            header: flatten(document),
                            inline: None,
                        },
                    );
                }
            }

            let record = CommentRecord {
                header: flatten(std::mem::take(&mut pending)),
                inline: comment.map(str::to_string),
            };
            if !record.is_empty() {
                records.insert(path, record);
            }
        }

        Self { separator, records }
    }

    /// Returns the header lines recorded for `path`.
    pub fn header_for(&self, path: &str) -> Option<&[String]> {
        self.records.get(path).map(|r| r.header.as_slice())
    }

    /// Returns the full record for `path`.
    pub fn record(&self, path: &str) -> Option<&CommentRecord> {
        self.records.get(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clears (without removing) the records of every unsupported path.
    pub fn suppress(&mut self, unsupported: &UnsupportedOptions) {
        for path in unsupported.iter() {
            if let Some(record) = self.records.get_mut(path) {
                record.clear();
            }
        }
    }

    /// Re-inserts recorded comments into encoded JSON text.
    ///
    /// Header lines are indented like the key they annotate; inline comments
    /// are appended after one space. Unsupported paths and paths with no
    /// record pass through untouched.
    pub fn render(&self, json_text: &str, unsupported: &UnsupportedOptions) -> String {
        let mut out = String::with_capacity(json_text.len() * 2);

        if let Some(document) = self.visible(Self::DOCUMENT, unsupported) {
            for line in &document.header {
                out.push_str(line);
                out.push('\n');
            }
            if !document.header.is_empty() {
                out.push('\n');
            }
        }

        let mut tracker = PathTracker::new(self.separator);
        for line in json_text.lines() {
            let record = tracker
                .advance(line)
                .and_then(|path| self.visible(&path, unsupported));
            match record {
                Some(record) => {
                    let indent = &line[..line.len() - line.trim_start().len()];
                    for header in &record.header {
                        if !header.is_empty() {
                            out.push_str(indent);
                            out.push_str(header);
                        }
                        out.push('\n');
                    }
                    out.push_str(line);
                    if let Some(inline) = &record.inline {
                        out.push(' ');
                        out.push_str(inline);
                    }
                }
                None => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }

    fn visible(&self, path: &str, unsupported: &UnsupportedOptions) -> Option<&CommentRecord> {
        if unsupported.contains(path) {
            return None;
        }
        self.records.get(path).filter(|r| !r.is_empty())
    }
}

fn flatten(blocks: Vec<Vec<String>>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in blocks.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(block);
    }
    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"# ViaConf settings
# Edit with care.

# Section about a
{
 # Maximum widgets
 "a":1, # per second

 # First block of b

 # Second block of b
 "b":{
  // nested flag
  "c":true
 },
 "hosts":[
  {
   # host name
   "name":"x"
  }
 ]
}
"#;

    fn store() -> CommentStore {
        CommentStore::parse(TEMPLATE, '.', 1)
    }

    #[test]
    fn test_parse_assigns_first_block_to_document() {
        // Arrange / Act
        let store = store();

        // Assert
        assert_eq!(
            store.header_for(CommentStore::DOCUMENT),
            Some(&["# ViaConf settings".to_string(), "# Edit with care.".to_string()][..])
        );
    }

    #[test]
    fn test_parse_gives_remaining_leading_blocks_to_first_key() {
        let store = store();
        assert_eq!(
            store.header_for("a"),
            Some(
                &[
                    "# Section about a".to_string(),
                    String::new(),
                    "# Maximum widgets".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn test_parse_records_inline_comment() {
        let store = store();
        assert_eq!(store.record("a").and_then(|r| r.inline.as_deref()), Some("# per second"));
    }

    #[test]
    fn test_parse_separates_blocks_with_empty_line() {
        let store = store();
        assert_eq!(
            store.header_for("b"),
            Some(
                &[
                    "# First block of b".to_string(),
                    String::new(),
                    "# Second block of b".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn test_parse_addresses_nested_and_array_paths() {
        let store = store();
        assert_eq!(store.header_for("b.c"), Some(&["// nested flag".to_string()][..]));
        assert_eq!(store.header_for("hosts.0.name"), Some(&["# host name".to_string()][..]));
    }

    #[test]
    fn test_parse_drops_comment_trailing_a_nested_section() {
        // Arrange
        let text = "{\n \"b\":{\n  \"c\":true\n  # left after the last member\n },\n \"d\":1\n}\n";

        // Act
        let store = CommentStore::parse(text, '.', 0);

        // Assert
        assert!(store.header_for("d").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_parse_with_zero_header_blocks_gives_everything_to_first_key() {
        let store = CommentStore::parse(TEMPLATE, '.', 0);
        assert!(store.header_for(CommentStore::DOCUMENT).is_none());
        assert_eq!(store.header_for("a").map(<[String]>::len), Some(6));
    }

    #[test]
    fn test_parse_key_without_comments_has_no_record() {
        let store = CommentStore::parse("{\n \"a\":1\n}", '.', 1);
        assert!(store.is_empty());
        assert!(store.header_for("a").is_none());
    }

    #[test]
    fn test_render_places_comments_around_keys() {
        // Arrange
        let store = store();
        let json = "{\n \"a\":5,\n \"b\":{\n  \"c\":false\n }\n}";

        // Act
        let rendered = store.render(json, &UnsupportedOptions::new());

        // Assert
        let expected = concat!(
            "# ViaConf settings\n# Edit with care.\n\n{\n",
            " # Section about a\n\n # Maximum widgets\n",
            " \"a\":5, # per second\n",
            " # First block of b\n\n # Second block of b\n",
            " \"b\":{\n  // nested flag\n  \"c\":false\n }\n}\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_skips_unsupported_paths() {
        // Arrange
        let store = store();
        let unsupported: UnsupportedOptions = ["b"].into_iter().collect();
        let json = "{\n \"a\":5,\n \"b\":{\n  \"c\":false\n }\n}";

        // Act
        let rendered = store.render(json, &unsupported);

        // Assert
        assert!(!rendered.contains("block of b"));
        assert!(rendered.contains("// nested flag"));
    }

    #[test]
    fn test_suppress_clears_without_removing() {
        // Arrange
        let mut store = store();
        let unsupported: UnsupportedOptions = ["b"].into_iter().collect();

        // Act
        store.suppress(&unsupported);

        // Assert
        assert_eq!(store.header_for("b"), Some(&[][..]));
        let rendered = store.render("{\n \"b\":{}\n}", &UnsupportedOptions::new());
        assert!(!rendered.contains("block of b"));
    }

    #[test]
    fn test_render_output_decodes_to_same_document() {
        let store = store();
        let json = "{\n \"a\":5,\n \"b\":{\n  \"c\":false\n }\n}";
        let rendered = store.render(json, &UnsupportedOptions::new());
        assert_eq!(
            crate::codec::decode(&rendered).expect("decode rendered"),
            crate::codec::decode(json).expect("decode plain")
        );
    }
}
