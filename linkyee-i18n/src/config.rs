use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::{DEFAULT_LANG, DEFAULT_SUPPORTED_LANGS};

/// Translations of a single key, by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMap(pub BTreeMap<String, String>);

impl LanguageMap {
    pub fn new() -> Self {
        LanguageMap(BTreeMap::new())
    }

    pub fn with_translation(&mut self, lang: &str, text: &str) -> &mut Self {
        self.0.insert(lang.to_owned(), text.to_owned());
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    /// Resolve the display text for `lang`: the language itself, then the
    /// default language, then the key.
    pub fn resolve<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.get(lang)
            .or_else(|| self.get(DEFAULT_LANG))
            .unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_value(key: &str, value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!(key, "Translation entry is not an object, falling back to the key");
            return LanguageMap::new();
        };

        let mut map = LanguageMap::new();
        for (lang, text) in obj {
            if let Some(text) = value_text(text) {
                map.0.insert(lang.clone(), text);
            }
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LanguageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        LanguageMap(
            iter.into_iter()
                .map(|(lang, text)| (lang.into(), text.into()))
                .collect(),
        )
    }
}

/// Translation key to per-language strings.
pub type TranslationTable = BTreeMap<String, LanguageMap>;

/// Configuration of the i18n plugin.
///
/// Built from any JSON value without failing: missing or malformed fields
/// fall back to their defaults, so the compiler always has something to work
/// with.
///
/// ```json
/// {
///     "supported_langs": ["en", "es", "zh"],
///     "translations": {
///         "Telegram": {"en": "Receive Alerts on Telegram", "zh": "在 Telegram 接收提醒"}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct I18nConfig {
    pub supported_langs: Vec<String>,
    pub translations: TranslationTable,
}

impl Default for I18nConfig {
    fn default() -> Self {
        I18nConfig {
            supported_langs: default_supported_langs(),
            translations: TranslationTable::new(),
        }
    }
}

impl I18nConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supported_langs<I, S>(&mut self, langs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_langs = langs.into_iter().map(Into::into).collect();
        if self.supported_langs.is_empty() {
            self.supported_langs = default_supported_langs();
        }
        self
    }

    pub fn with_entry(&mut self, key: &str, languages: LanguageMap) -> &mut Self {
        self.translations.insert(key.to_owned(), languages);
        self
    }

    /// Build a configuration from a plugin argument value.
    ///
    /// Plugins may receive their arguments positionally, so an array is
    /// unwrapped to its first element.
    pub fn from_value(value: &Value) -> Self {
        let value = match value {
            Value::Array(args) => match args.first() {
                Some(first) => first,
                None => return Self::default(),
            },
            other => other,
        };

        let supported_langs = match value.get("supported_langs") {
            Some(Value::Array(langs)) => langs.iter().filter_map(value_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                warn!(%other, "supported_langs is not a list, using defaults");
                Vec::new()
            }
        };

        let translations = match value.get("translations") {
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(key, langs)| (key.clone(), LanguageMap::from_value(key, langs)))
                .collect(),
            Some(Value::Null) | None => TranslationTable::new(),
            Some(other) => {
                warn!(%other, "translations is not an object, ignoring it");
                TranslationTable::new()
            }
        };

        let mut config = I18nConfig {
            supported_langs,
            translations,
        };
        if config.supported_langs.is_empty() {
            config.supported_langs = default_supported_langs();
        }
        config
    }

    /// Parse a configuration from JSON text. Only syntax errors fail.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }
}

impl From<Value> for I18nConfig {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON from '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load the plugin configuration from a JSON file.
///
/// # Errors
/// - The file cannot be read
/// - The file is not valid JSON
pub fn load_config(path: &Path) -> Result<I18nConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    I18nConfig::from_json_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn default_supported_langs() -> Vec<String> {
    DEFAULT_SUPPORTED_LANGS.iter().map(|l| l.to_string()).collect()
}

/// Text of a JSON value. `null` counts as absent; anything that is not a
/// string is rendered as JSON.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
