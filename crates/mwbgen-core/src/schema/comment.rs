//! Directives embedded in free-text comments.
//!
//! Two forms are recognized anywhere in a comment:
//!
//! ```text
//! {d:cascade}persist, remove{/d:cascade}
//! owningSide: true
//! ```
//!
//! The block form accepts any short namespace before the colon and may span
//! lines. The line form is only recognized for known directive names, so
//! ordinary prose containing a colon is left alone.

use crate::schema::raw::loose;

/// Directive names recognized in the line form.
const KNOWN: &[&str] = &[
    "owningSide",
    "unidirectional",
    "foreignAlias",
    "cascade",
    "fetch",
    "order",
    "bundleNamespace",
    "package",
    "modelName",
    "m2m",
    "actAs",
    "lifecycleCallbacks",
    "externalRelations",
];

/// Directives parsed out of one comment.
#[derive(Debug, Default)]
pub(crate) struct Directives {
    entries: Vec<(String, String)>,

    /// Problems found while scanning, e.g. an unclosed block.
    pub(crate) malformed: Vec<String>,
}

impl Directives {
    pub(crate) fn parse(comment: &str) -> Directives {
        let mut directives = Directives::default();
        let mut rest = String::new();
        let mut pos = 0;

        while let Some(offset) = comment[pos..].find('{') {
            let start = pos + offset;

            let Some((ns, key, open_end)) = open_tag(comment, start) else {
                rest.push_str(&comment[pos..start + 1]);
                pos = start + 1;
                continue;
            };

            rest.push_str(&comment[pos..start]);

            let close = format!("{{/{ns}:{key}}}");
            match comment[open_end..].find(&close) {
                Some(len) => {
                    let value = comment[open_end..open_end + len].trim();
                    directives.entries.push((key.to_string(), value.to_string()));
                    pos = open_end + len + close.len();
                }
                None => {
                    directives
                        .malformed
                        .push(format!("unclosed directive `{{{ns}:{key}}}`"));
                    pos = open_end;
                }
            }
        }
        rest.push_str(&comment[pos..]);

        for line in rest.lines() {
            if let Some((key, value)) = line_directive(line) {
                directives.entries.push((key.to_string(), value.to_string()));
            }
        }

        directives
    }

    /// Returns the value of `key`. When a directive is repeated, the first
    /// occurrence wins.
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the boolean value of `key`, `Err` holding the raw text when it
    /// is not a recognizable boolean.
    pub(crate) fn flag(&self, key: &str) -> Option<Result<bool, &str>> {
        let value = self.get(key)?;
        Some(loose::parse_flag(value).ok_or(value))
    }

    /// Returns a non-empty string value of `key`.
    pub(crate) fn text(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

/// Matches `{ns:key}` at `start`, returning the namespace, key, and the byte
/// offset just past the closing brace.
fn open_tag(src: &str, start: usize) -> Option<(&str, &str, usize)> {
    let body = &src[start + 1..];
    let end = body.find('}')?;
    let (ns, key) = body[..end].split_once(':')?;

    let ns_ok = !ns.is_empty() && ns.len() <= 16 && ns.chars().all(|c| c.is_ascii_alphabetic());
    let key_ok = key.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if ns_ok && key_ok {
        Some((ns, key, start + 1 + end + 1))
    } else {
        None
    }
}

fn line_directive(line: &str) -> Option<(&'static str, &str)> {
    let line = line.trim();
    let split = line.find(|c: char| c == ':' || c == '=')?;
    let key = line[..split].trim();
    let value = line[split + 1..].trim();

    KNOWN
        .iter()
        .find(|known| known.eq_ignore_ascii_case(key))
        .map(|known| (*known, value))
}
