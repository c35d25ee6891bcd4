//! Line-oriented scanning shared by comment parsing and rendering.
//!
//! This is deliberately not a JSON parser. It looks at one line at a time,
//! counts braces and brackets outside string literals, and reports which key
//! path (if any) a line starts. Parsing the template and rendering encoded
//! output both go through [`PathTracker`], so a key resolves to the same
//! path in both directions as long as each member starts on its own line.

use serde_json::from_str;

/// Splits `line` into its code and a trailing `#` or `//` comment.
///
/// The comment keeps its marker and loses trailing whitespace. A line that
/// is only a comment returns empty code.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'#' => return (&line[..i], Some(line[i..].trim_end())),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], Some(line[i..].trim_end()))
            }
            _ => {}
        }
    }
    (line, None)
}

/// Reads a quoted key followed by `:` at the start of `code`.
///
/// Returns the unescaped key and the text after the colon.
pub fn leading_key(code: &str) -> Option<(String, &str)> {
    let code = code.trim_start();
    if !code.starts_with('"') {
        return None;
    }
    let mut escaped = false;
    let mut end = None;
    for (i, c) in code.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            end = Some(i);
            break;
        }
    }
    let end = end?;
    let after = code[end + 1..].trim_start();
    let value = after.strip_prefix(':')?;
    let key: String = from_str(&code[..=end]).ok()?;
    Some((key, value))
}

#[derive(Debug)]
enum Frame {
    Object { segment: Option<String> },
    Array { segment: Option<String>, next_index: usize },
}

impl Frame {
    fn segment(&self) -> Option<&str> {
        match self {
            Frame::Object { segment } | Frame::Array { segment, .. } => segment.as_deref(),
        }
    }
}

/// Tracks object/array nesting across lines and derives dotted key paths.
///
/// Array elements are addressed by index, so the `name` key of the second
/// object in `"hosts":[...]` resolves to `hosts.1.name`.
#[derive(Debug)]
pub struct PathTracker {
    separator: char,
    frames: Vec<Frame>,
}

impl PathTracker {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            frames: Vec::new(),
        }
    }

    /// Consumes one line of code (comments already removed).
    ///
    /// Returns the path of the member or array element the line starts, or
    /// `None` for purely structural lines such as `{` or `},`.
    pub fn advance(&mut self, code: &str) -> Option<String> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut rest = trimmed;
        let segment = match self.frames.last_mut() {
            Some(Frame::Array { next_index, .. }) if !trimmed.starts_with(']') => {
                let index = *next_index;
                *next_index += 1;
                Some(index.to_string())
            }
            Some(Frame::Object { .. }) => match leading_key(trimmed) {
                Some((key, after)) => {
                    rest = after;
                    Some(key)
                }
                None => None,
            },
            _ => None,
        };

        let path = segment.as_deref().map(|s| self.path_with(s));
        self.apply_structure(rest, segment);
        path
    }

    fn path_with(&self, last: &str) -> String {
        let mut path = String::new();
        for segment in self.frames.iter().filter_map(Frame::segment) {
            path.push_str(segment);
            path.push(self.separator);
        }
        path.push_str(last);
        path
    }

    fn apply_structure(&mut self, code: &str, mut segment: Option<String>) {
        let mut in_string = false;
        let mut escaped = false;
        for c in code.chars() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => self.frames.push(Frame::Object {
                    segment: segment.take(),
                }),
                '[' => self.frames.push(Frame::Array {
                    segment: segment.take(),
                    next_index: 0,
                }),
                '}' | ']' => {
                    self.frames.pop();
                }
                _ => {}
            }
        }
    }
}
