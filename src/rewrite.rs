//! Narrow text patching for rendered files.
//!
//! A name containing double quotes breaks a double-quoted string literal in a
//! generated config file. The rewriter turns every `"<name>"` into `'<name>'`.

use crate::error::Result;
use log::debug;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// What a rewrite did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub lines_changed: usize,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        self.lines_changed > 0
    }
}

/// Replaces every double-quoted occurrence of `name` in `text` with a single-quoted one.
///
/// Works line by line; lines without the quoted name are kept byte for byte,
/// line endings included.
pub fn requote(text: &str, name: &str) -> (String, usize) {
    let needle = format!("\"{name}\"");
    let replacement = format!("'{name}'");

    let mut lines_changed = 0;
    let mut output = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line.contains(&needle) {
            output.push_str(&line.replace(&needle, &replacement));
            lines_changed += 1;
        } else {
            output.push_str(line);
        }
    }
    (output, lines_changed)
}

/// Rewrites the file at `path` in place, see [`requote`].
///
/// A file without any occurrence is left untouched and is not an error.
pub fn rewrite_quoted<P: AsRef<Path>>(path: P, name: &str) -> Result<RewriteOutcome> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let (rewritten, lines_changed) = requote(&content, name);

    if lines_changed > 0 {
        debug!("Requoting {lines_changed} line(s) in '{}'", path.display());
        fs::write(path, rewritten)?;
    }
    Ok(RewriteOutcome { lines_changed })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));").expect("Invalid entity regex")
    })
}

/// Decodes HTML character references in a single pass.
///
/// Numeric references (`&#34;`, `&#x22;`) decode to their code point, named
/// ones are limited to `quot`, `apos`, `amp`, `lt` and `gt`. Anything else,
/// including numbers that are not valid chars, is kept as written.
pub fn unescape_entities(value: &str) -> String {
    entity_regex()
        .replace_all(value, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requote_replaces_every_occurrence() {
        let name = r#"name "quote" name"#;
        let text = "author = \"name \"quote\" name\"\nproject = \"x\"\ncopyright = (\"2024\", \"name \"quote\" name\")\n";

        let (output, changed) = requote(text, name);

        assert_eq!(changed, 2);
        assert_eq!(
            output,
            "author = 'name \"quote\" name'\nproject = \"x\"\ncopyright = (\"2024\", 'name \"quote\" name')\n"
        );
    }

    #[test]
    fn test_requote_keeps_other_lines_and_endings() {
        let text = "a = \"Jane\"\r\nb = 1\r\nno newline at end";
        let (output, changed) = requote(text, "Ann");
        assert_eq!(changed, 0);
        assert_eq!(output, text);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("name &quot;quote&quot; name"), r#"name "quote" name"#);
        assert_eq!(unescape_entities("O&#39;Connor &amp;lt;"), "O'Connor &lt;");
        assert_eq!(unescape_entities("&#x22;x&#X27;&#34;"), "\"x'\"");
        assert_eq!(unescape_entities("&nbsp; &#xD800; &#; a&b"), "&nbsp; &#xD800; &#; a&b");
    }
}
