//! Rust side of the language selection protocol.
//!
//! Mirrors what the generated script does in the browser, so pages can be
//! pre-rendered for a given language and the protocol can be checked without
//! a DOM.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::compiler::{Fragments, effective_langs};
use crate::escape::{escape_attr, unescape_attr};
use crate::{DEFAULT_LANG, I18N_CLASS, KEY_ATTR, SCRIPT_KEY};

static SPAN_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Pick the language to display.
///
/// The preference is lowercased and matched by prefix against `supported`
/// in order, so `"en-US"` selects `"en"`. Without a preference, or without a
/// match, the default language is used.
pub fn select_language<'a, S: AsRef<str>>(supported: &'a [S], preference: Option<&str>) -> &'a str {
    let preference = preference
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_LANG)
        .to_lowercase();

    supported
        .iter()
        .map(|lang| lang.as_ref())
        .find(|lang| preference.starts_with(*lang))
        .unwrap_or(DEFAULT_LANG)
}

/// A compiled i18n element, read back from its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nNode {
    pub key: String,
    /// Attributes in document order, values unescaped.
    pub attrs: Vec<(String, String)>,
    /// Visible text content.
    pub text: String,
}

impl I18nNode {
    /// Parse a fragment produced by the compiler.
    ///
    /// Returns `None` for anything that is not a `<span>` marked as an i18n
    /// node with a key.
    pub fn parse(fragment: &str) -> Option<Self> {
        let span = SPAN_REGEX
            .get_or_init(|| Regex::new(r"(?s)^\s*<span\s+([^>]*)>(.*)</span>\s*$").unwrap());
        let attr = ATTR_REGEX
            .get_or_init(|| Regex::new(r#"([A-Za-z0-9_.:-]+)="([^"]*)""#).unwrap());

        let caps = span.captures(fragment)?;
        let attrs: Vec<(String, String)> = attr
            .captures_iter(&caps[1])
            .map(|a| (a[1].to_string(), unescape_attr(&a[2]).into_owned()))
            .collect();

        let is_i18n = attrs
            .iter()
            .any(|(name, value)| name == "class" && value.split_whitespace().any(|c| c == I18N_CLASS));
        let key = attrs
            .iter()
            .find(|(name, _)| name == KEY_ATTR)
            .map(|(_, value)| value.clone())?;
        if !is_i18n {
            return None;
        }

        Some(I18nNode {
            key,
            attrs,
            text: unescape_attr(&caps[2]).into_owned(),
        })
    }

    /// Value of the `data-<lang>` attribute. Names match case-insensitively,
    /// as `getAttribute` does in an HTML document.
    pub fn data(&self, lang: &str) -> Option<&str> {
        let name = format!("data-{lang}");
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
            .map(|(_, v)| v.as_str())
    }

    /// Text to show for `lang`: its own attribute, the default language's,
    /// or nothing.
    pub fn resolve(&self, lang: &str) -> &str {
        self.data(lang)
            .or_else(|| self.data(DEFAULT_LANG))
            .unwrap_or("")
    }

    /// Replace the visible text with the resolved value for `lang`.
    ///
    /// Reads only the attributes, so repeating it changes nothing.
    pub fn rewrite(&mut self, lang: &str) {
        self.text = self.resolve(lang).to_string();
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<span");
        for (name, value) in &self.attrs {
            html.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
        }
        html.push('>');
        html.push_str(&escape_attr(&self.text));
        html.push_str("</span>");
        html
    }
}

/// Rewrite every node for `lang`.
pub fn rewrite(nodes: &mut [I18nNode], lang: &str) {
    for node in nodes.iter_mut() {
        node.rewrite(lang);
    }
}

/// Pre-render compiled fragments for a visitor preference.
///
/// Each i18n span gets the selected text as content, so the page reads
/// correctly before the runtime script runs. The script entry and anything
/// that does not parse as an i18n node are passed through unchanged.
pub fn render_for(
    supported_langs: &[String],
    fragments: &Fragments,
    preference: Option<&str>,
) -> Fragments {
    let langs = effective_langs(supported_langs);
    let lang = select_language(&langs, preference);
    debug!(?preference, lang, "Pre-rendering fragments");

    fragments
        .iter()
        .map(|(key, html)| {
            let rendered = match I18nNode::parse(html) {
                Some(mut node) if key != SCRIPT_KEY => {
                    node.rewrite(lang);
                    node.to_html()
                }
                _ => html.clone(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
