//! Static i18n markup for linkyee sites.
//!
//! Every translation key compiles to a `<span class="i18n">` that carries the
//! text of every supported language as `data-<lang>` attributes. One shared
//! `<script>` picks the visitor's language at page load and reveals the
//! matching text.
//!
//! ```
//! use linkyee_i18n::{I18nConfig, LanguageMap, compile_config};
//!
//! let mut telegram = LanguageMap::new();
//! telegram
//!     .with_translation("en", "Receive Alerts")
//!     .with_translation("zh", "接收提醒");
//!
//! let mut config = I18nConfig::new();
//! config
//!     .with_supported_langs(["en", "zh"])
//!     .with_entry("Telegram", telegram);
//!
//! let fragments = compile_config(&config);
//! assert!(fragments["Telegram"].contains(r#"data-zh="接收提醒""#));
//! assert!(fragments["script"].contains(r#"["en","zh"]"#));
//! ```

pub mod compiler;
pub mod config;
pub mod escape;
pub mod plugin;
pub mod runtime;
pub mod script;

pub use compiler::{EmittedLang, Fragments, compile, effective_langs, emitted_langs, render_fragment};
pub use config::{ConfigError, I18nConfig, LanguageMap, TranslationTable, load_config};
pub use escape::{escape_attr, unescape_attr};
pub use plugin::{I18nPlugin, Plugin, PluginRegistry};
pub use runtime::{I18nNode, render_for, rewrite, select_language};
pub use script::runtime_script;

/// Language used whenever a code has no explicit value.
pub const DEFAULT_LANG: &str = "en";

/// Supported languages when the configuration names none.
pub const DEFAULT_SUPPORTED_LANGS: [&str; 2] = ["en", "es"];

/// Output key under which the shared runtime script is stored.
pub const SCRIPT_KEY: &str = "script";

/// CSS class marking an element as an i18n node.
pub const I18N_CLASS: &str = "i18n";

/// Attribute holding the translation key of an i18n node.
pub const KEY_ATTR: &str = "data-i18n-key";

/// Compile a whole configuration. Shorthand for
/// `compile(&config.supported_langs, &config.translations)`.
pub fn compile_config(config: &I18nConfig) -> Fragments {
    compile(&config.supported_langs, &config.translations)
}
