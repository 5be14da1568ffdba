//! `%name%` placeholder substitution for file and variable name templates.

use crate::{Error, Result};

/// Replaces every `%key%` token in `template` with the matching value from
/// `vars`.
///
/// A token with no matching variable is an error: templates are user
/// configuration, and an unknown token is almost always a typo. A `%` that
/// does not open a well-formed token (`%` followed by one or more of
/// `[A-Za-z0-9_-]` and a closing `%`) is copied through unchanged.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match token_len(after) {
            Some(len) => {
                let token = &after[..len];
                let Some((_, value)) = vars.iter().find(|(key, _)| *key == token) else {
                    return Err(Error::unresolved_placeholder(template, token));
                };
                out.push_str(value);
                rest = &after[len + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Length of the token name if `src` starts with `name%`.
fn token_len(src: &str) -> Option<usize> {
    let len = src
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();

    (len > 0 && src.as_bytes().get(len) == Some(&b'%')).then_some(len)
}
