//! HTML attribute escaping.
//!
//! A fixed five-character set (`& < > " '`) is escaped, which is enough for
//! double- and single-quoted attribute values as well as text content.

use std::borrow::Cow;

const ENTITIES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
];

fn entity_for(c: char) -> Option<&'static str> {
    ENTITIES
        .iter()
        .find(|(ch, _)| *ch == c)
        .map(|(_, entity)| *entity)
}

/// Escape `input` for embedding inside an HTML attribute value.
///
/// Borrows the input when nothing needs escaping.
pub fn escape_attr(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(|c: char| entity_for(c).is_some()) else {
        return Cow::Borrowed(input);
    };

    let mut escaped = String::with_capacity(input.len() + 16);
    escaped.push_str(&input[..first]);
    for c in input[first..].chars() {
        match entity_for(c) {
            Some(entity) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Reverse [`escape_attr`].
///
/// Only the five entities `escape_attr` produces are decoded; any other `&...;`
/// sequence is left untouched.
pub fn unescape_attr(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(_, entity)| rest.starts_with(*entity))
        {
            Some((c, entity)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
