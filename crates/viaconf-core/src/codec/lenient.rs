//! Lenient pre-processing of settings text.
//!
//! Persisted settings files are a JSON superset: they carry the template's
//! comments (re-inserted on every save) and users editing by hand leave
//! trailing commas behind. [`sanitize`] reduces such text to strict JSON so
//! `serde_json` can read it.
//!
//! Comments are discarded here, never attributed to keys; only the template
//! is a source of comments (see [`crate::comments`]).
//!
//! Recognised outside string literals:
//!
//! | Syntax        | Effect                                   |
//! |---------------|------------------------------------------|
//! | `// ...`      | dropped up to end of line                |
//! | `# ...`       | dropped up to end of line                |
//! | `/* ... */`   | dropped; contained newlines are kept     |
//! | `,` before `}` or `]` | dropped                          |
//!
//! Newlines are always preserved so `serde_json` error positions still point
//! at the right line of the original file.

/// Returns `text` with comments and trailing commas removed.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    // Byte offset in `out` of a comma that may turn out to be trailing.
    let mut trailing_comma: Option<usize> = None;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
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
            '"' => {
                in_string = true;
                trailing_comma = None;
                out.push(c);
            }
            '#' => skip_line(&mut chars, &mut out),
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars, &mut out),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            ',' => {
                trailing_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(pos) = trailing_comma.take() {
                    out.remove(pos);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                trailing_comma = None;
                out.push(c);
            }
        }
    }
    out
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    for c in chars.by_ref() {
        if c == '\n' {
            out.push('\n');
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_hash_and_slash_line_comments() {
        let text = "{\n # header\n \"a\":1, // inline\n \"b\":2\n}";
        assert_eq!(sanitize(text), "{\n \n \"a\":1, \n \"b\":2\n}");
    }

    #[test]
    fn test_sanitize_keeps_comment_markers_inside_strings() {
        let text = r#"{"url":"http://example.com/#anchor"}"#;
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_handles_escaped_quote_in_string() {
        let text = r#"{"msg":"say \"hi\" # not a comment"}"#;
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_drops_block_comment_keeping_newlines() {
        let text = "{/* one\ntwo */\"a\":1}";
        assert_eq!(sanitize(text), "{\n\"a\":1}");
    }

    #[test]
    fn test_sanitize_removes_trailing_commas() {
        let text = "{\"a\":[1,2,],\n\"b\":3,\n}";
        assert_eq!(sanitize(text), "{\"a\":[1,2],\n\"b\":3\n}");
    }

    #[test]
    fn test_sanitize_trailing_comma_followed_by_comment() {
        let text = "{\"a\":1, # last\n}";
        let cleaned = sanitize(text);
        assert!(serde_json::from_str::<serde_json::Value>(&cleaned).is_ok());
    }
}
