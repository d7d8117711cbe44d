//! Translation table to markup fragments.

use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::{LanguageMap, TranslationTable};
use crate::escape::escape_attr;
use crate::script::runtime_script;
use crate::{DEFAULT_LANG, DEFAULT_SUPPORTED_LANGS, I18N_CLASS, KEY_ATTR, SCRIPT_KEY};

/// Compiled output: one markup fragment per translation key plus the shared
/// runtime script under [`SCRIPT_KEY`].
pub type Fragments = BTreeMap<String, String>;

/// Compile `translations` into markup fragments for `supported_langs`.
///
/// Never fails. Missing translations fall back to the default language and
/// then to the key itself, so every fragment carries a value for every
/// supported language.
///
/// A translation key named `"script"` is replaced by the runtime script.
pub fn compile(supported_langs: &[String], translations: &TranslationTable) -> Fragments {
    let langs = emitted_langs(supported_langs);
    let mut out = Fragments::new();

    for (key, languages) in translations {
        out.insert(key.clone(), render_fragment(key, languages, &langs));
    }

    if out.contains_key(SCRIPT_KEY) {
        warn!(
            "Translation key '{}' collides with the runtime script and will be overwritten",
            SCRIPT_KEY
        );
    }
    let attrs: Vec<String> = langs.iter().map(|l| l.attr.clone()).collect();
    out.insert(SCRIPT_KEY.to_string(), runtime_script(&attrs));

    debug!(
        keys = translations.len(),
        langs = ?attrs,
        "Compiled i18n fragments"
    );
    out
}

/// A configured language code and the `data-` suffix it is emitted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLang {
    /// Code as configured; translations are looked up with it.
    pub code: String,
    /// Attribute-safe form of the code.
    pub attr: String,
}

/// The languages the compiler actually emits.
///
/// Codes are made safe for use in attribute names. Empty codes are dropped,
/// and so are codes whose attribute name repeats an earlier one, compared
/// case-insensitively like HTML attribute names. An empty result becomes
/// the default list.
pub fn emitted_langs(supported_langs: &[String]) -> Vec<EmittedLang> {
    let mut langs: Vec<EmittedLang> = Vec::with_capacity(supported_langs.len());
    for code in supported_langs {
        let attr = attribute_name(code);
        if attr.is_empty() || langs.iter().any(|l| l.attr.eq_ignore_ascii_case(&attr)) {
            continue;
        }
        langs.push(EmittedLang {
            code: code.clone(),
            attr: attr.into_owned(),
        });
    }

    if langs.is_empty() {
        langs = DEFAULT_SUPPORTED_LANGS
            .iter()
            .map(|l| EmittedLang {
                code: l.to_string(),
                attr: l.to_string(),
            })
            .collect();
    }
    langs
}

/// Attribute names of [`emitted_langs`]. The runtime script embeds this list.
pub fn effective_langs(supported_langs: &[String]) -> Vec<String> {
    emitted_langs(supported_langs)
        .into_iter()
        .map(|l| l.attr)
        .collect()
}

/// Render the `<span>` for a single key.
///
/// `langs` must already be an [`emitted_langs`] list. A `data-en`
/// attribute is appended when the default language is not in it, so the
/// runtime always has something to fall back to.
pub fn render_fragment(key: &str, languages: &LanguageMap, langs: &[EmittedLang]) -> String {
    let mut html = format!(
        r#"<span class="{}" {}="{}""#,
        I18N_CLASS,
        KEY_ATTR,
        escape_attr(key)
    );

    for lang in langs {
        let value = lookup(key, languages, &lang.code);
        html.push_str(&format!(r#" data-{}="{}""#, lang.attr, escape_attr(value)));
    }

    if !langs.iter().any(|l| l.attr.eq_ignore_ascii_case(DEFAULT_LANG)) {
        let value = lookup(key, languages, DEFAULT_LANG);
        html.push_str(&format!(r#" data-{}="{}""#, DEFAULT_LANG, escape_attr(value)));
    }

    html.push_str("></span>");
    html
}

fn lookup<'a>(key: &'a str, languages: &'a LanguageMap, lang: &str) -> &'a str {
    if let Some(text) = languages.get(lang) {
        return text;
    }
    let text = languages.resolve(lang, key);
    if languages.get(DEFAULT_LANG).is_some() {
        debug!(key, lang, "Fallback: using '{}' text", DEFAULT_LANG);
    } else {
        debug!(key, lang, "No translation found, using the key");
    }
    text
}

/// Make a language code usable as the suffix of a `data-` attribute name.
fn attribute_name(lang: &str) -> Cow<'_, str> {
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if lang.chars().all(valid) {
        Cow::Borrowed(lang)
    } else {
        Cow::Owned(
            lang.chars()
                .map(|c| if valid(c) { c } else { '-' })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::I18nNode;
    use proptest::prelude::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn table(entries: &[(&str, &[(&str, &str)])]) -> TranslationTable {
        entries
            .iter()
            .map(|(key, texts)| (key.to_string(), texts.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_render_fragment_exact_markup() {
        let languages: LanguageMap = [("en", "Receive Alerts"), ("zh", "接收提醒")]
            .into_iter()
            .collect();
        let html = render_fragment("Telegram", &languages, &emitted_langs(&langs(&["en", "zh"])));

        assert_eq!(
            html,
            r#"<span class="i18n" data-i18n-key="Telegram" data-en="Receive Alerts" data-zh="接收提醒"></span>"#
        );
    }

    #[test]
    fn test_fallback_to_default_then_key() {
        let translations = table(&[
            ("Newsletter", &[("en", "Join the Newsletter")]),
            ("Untranslated", &[("fr", "Bonjour")]),
        ]);
        let out = compile(&langs(&["en", "es"]), &translations);

        let newsletter = I18nNode::parse(&out["Newsletter"]).unwrap();
        assert_eq!(newsletter.data("es"), Some("Join the Newsletter"));

        let untranslated = I18nNode::parse(&out["Untranslated"]).unwrap();
        assert_eq!(untranslated.data("en"), Some("Untranslated"));
        assert_eq!(untranslated.data("es"), Some("Untranslated"));
        assert_eq!(untranslated.data("fr"), None);
    }

    #[test]
    fn test_default_attribute_added_when_en_not_supported() {
        let translations = table(&[("Hello", &[("en", "Hello"), ("es", "Hola")])]);
        let out = compile(&langs(&["es", "zh"]), &translations);

        let node = I18nNode::parse(&out["Hello"]).unwrap();
        let names: Vec<&str> = node.attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["class", "data-i18n-key", "data-es", "data-zh", "data-en"]
        );
        assert_eq!(node.data("zh"), Some("Hello"));
        assert_eq!(node.data("en"), Some("Hello"));
    }

    #[test]
    fn test_sanitized_code_still_finds_its_translation() {
        let translations = table(&[("Hi", &[("en", "Hello"), ("pt BR", "Olá")])]);
        let out = compile(&langs(&["en", "pt BR"]), &translations);

        let node = I18nNode::parse(&out["Hi"]).unwrap();
        assert_eq!(node.data("pt-BR"), Some("Olá"));
        assert_eq!(node.data("en"), Some("Hello"));
        assert!(out[SCRIPT_KEY].contains(r#"["en","pt-BR"]"#));
    }

    #[test]
    fn test_attribute_names_compare_case_insensitively() {
        let translations = table(&[("Hi", &[("EN", "Upper"), ("en", "lower")])]);
        let out = compile(&langs(&["EN"]), &translations);

        assert_eq!(
            out["Hi"],
            r#"<span class="i18n" data-i18n-key="Hi" data-EN="Upper"></span>"#
        );
        let node = I18nNode::parse(&out["Hi"]).unwrap();
        assert_eq!(node.resolve("en"), "Upper");

        assert_eq!(effective_langs(&langs(&["zh", "ZH", "es"])), vec!["zh", "es"]);
    }

    #[test]
    fn test_emitted_langs_keep_configured_code() {
        assert_eq!(
            emitted_langs(&langs(&["pt BR", "en"])),
            vec![
                EmittedLang {
                    code: "pt BR".to_string(),
                    attr: "pt-BR".to_string(),
                },
                EmittedLang {
                    code: "en".to_string(),
                    attr: "en".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_supported_langs_uses_defaults() {
        let translations = table(&[("Hi", &[("es", "Hola")])]);
        let out = compile(&[], &translations);

        assert_eq!(
            out["Hi"],
            r#"<span class="i18n" data-i18n-key="Hi" data-en="Hi" data-es="Hola"></span>"#
        );
        assert!(out[SCRIPT_KEY].contains(r#"["en","es"]"#));
    }

    #[test]
    fn test_key_and_values_are_escaped() {
        let translations = table(&[(r#"<b>"Bold" & 'more'</b>"#, &[("en", "Tom & Jerry <3")])]);
        let out = compile(&langs(&["en"]), &translations);

        let html = &out[r#"<b>"Bold" & 'more'</b>"#];
        assert!(html.contains(
            r#"data-i18n-key="&lt;b&gt;&quot;Bold&quot; &amp; &#39;more&#39;&lt;/b&gt;""#
        ));
        assert!(html.contains(r#"data-en="Tom &amp; Jerry &lt;3""#));
    }

    #[test]
    fn test_script_key_collision_is_overwritten() {
        let translations = table(&[("script", &[("en", "Script")]), ("Other", &[])]);
        let out = compile(&langs(&["en"]), &translations);

        assert_eq!(out.len(), 2);
        assert!(out[SCRIPT_KEY].starts_with("<script>"));
    }

    #[test]
    fn test_effective_langs() {
        assert_eq!(
            effective_langs(&langs(&["en", "zh-Hant", "en", ""])),
            vec!["en", "zh-Hant"]
        );
        assert_eq!(
            effective_langs(&langs(&[r#"x" onload="alert(1)"#])),
            vec!["x--onload--alert-1-"]
        );
        assert_eq!(effective_langs(&[]), vec!["en", "es"]);
        assert_eq!(effective_langs(&langs(&[""])), vec!["en", "es"]);
    }

    proptest! {
        #[test]
        fn output_has_one_entry_per_key_plus_script(
            keys in prop::collection::btree_set("[A-Za-z][A-Za-z0-9 ]{0,12}", 0..8),
            supported in prop::collection::vec("[a-z]{2}", 0..4),
        ) {
            let translations: TranslationTable = keys
                .iter()
                .filter(|k| k.as_str() != SCRIPT_KEY)
                .map(|k| (k.clone(), LanguageMap::new()))
                .collect();
            let out = compile(&supported, &translations);
            prop_assert_eq!(out.len(), translations.len() + 1);
            prop_assert!(out.contains_key(SCRIPT_KEY));
        }

        #[test]
        fn every_fragment_has_one_attribute_per_language(
            supported in prop::collection::vec("[a-z]{2}(-[A-Z]{2})?", 1..5),
            en in proptest::option::of(".{0,10}"),
            es in proptest::option::of(".{0,10}"),
        ) {
            let mut languages = LanguageMap::new();
            if let Some(en) = &en {
                languages.with_translation("en", en);
            }
            if let Some(es) = &es {
                languages.with_translation("es", es);
            }
            let out = compile(&supported, &[("Key".to_string(), languages.clone())].into());
            let node = I18nNode::parse(&out["Key"]).unwrap();

            let langs = effective_langs(&supported);
            for lang in langs.iter().map(String::as_str).chain(["en"]) {
                let name = format!("data-{lang}");
                let count = node.attrs.iter().filter(|(n, _)| n.eq_ignore_ascii_case(&name)).count();
                prop_assert_eq!(count, 1);
                prop_assert_eq!(node.data(lang), Some(languages.resolve(lang, "Key")));
            }
        }
    }
}
