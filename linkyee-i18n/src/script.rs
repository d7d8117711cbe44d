//! Browser-side language selector.
//!
//! The generated `<script>` runs once per page view. It negotiates a
//! language against the baked-in supported list and fills every i18n node
//! with the matching `data-<lang>` text. [`crate::runtime`] implements the
//! same protocol in Rust.

use serde_json::Value;

const SUPPORTED_PLACEHOLDER: &str = "__SUPPORTED_LANGS__";

const TEMPLATE: &str = r#"<script>
(function () {
  var supported = __SUPPORTED_LANGS__;

  function preference() {
    var nav = window.navigator || {};
    var pref = (nav.languages && nav.languages[0]) || nav.language || nav.userLanguage || 'en';
    return String(pref).toLowerCase();
  }

  function select(pref) {
    for (var i = 0; i < supported.length; i++) {
      if (pref.indexOf(supported[i]) === 0) {
        return supported[i];
      }
    }
    return 'en';
  }

  function apply() {
    var lang = select(preference());
    try {
      document.documentElement.setAttribute('lang', lang);
    } catch (e) {}
    if (!document.querySelectorAll) {
      return;
    }
    var nodes = document.querySelectorAll('.i18n[data-i18n-key]');
    for (var i = 0; i < nodes.length; i++) {
      try {
        var el = nodes[i];
        var text = el.getAttribute('data-' + lang);
        if (text === null) {
          text = el.getAttribute('data-en');
        }
        el.textContent = text === null ? '' : text;
      } catch (e) {}
    }
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', apply);
  } else {
    apply();
  }
})();
</script>
"#;

/// Generate the runtime script with `langs` embedded as a literal list.
///
/// `langs` is expected to be the compiler's effective language list; see
/// [`crate::compiler::effective_langs`].
pub fn runtime_script(langs: &[String]) -> String {
    TEMPLATE.replace(SUPPORTED_PLACEHOLDER, &js_array(langs))
}

/// A JSON array literal that is also safe inside a `<script>` element.
fn js_array(langs: &[String]) -> String {
    Value::from(langs.to_vec()).to_string().replace("</", r"<\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_embeds_supported_list() {
        let script = runtime_script(&langs(&["en", "es", "zh"]));
        assert!(script.starts_with("<script>"));
        assert!(script.trim_end().ends_with("</script>"));
        assert!(script.contains(r#"var supported = ["en","es","zh"];"#));
        assert!(!script.contains(SUPPORTED_PLACEHOLDER));
    }

    #[test]
    fn test_script_targets_compiled_markup() {
        let script = runtime_script(&langs(&["en"]));
        assert!(script.contains(&format!(".{}[{}]", crate::I18N_CLASS, crate::KEY_ATTR)));
        assert!(script.contains(&format!("'{}'", crate::DEFAULT_LANG)));
    }

    #[test]
    fn test_list_cannot_close_the_script_element() {
        let script = runtime_script(&langs(&["</script><script>alert(1)"]));
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.contains(r#"["<\/script><script>alert(1)"]"#));
    }

    #[test]
    fn test_deterministic() {
        let a = runtime_script(&langs(&["en", "zh"]));
        let b = runtime_script(&langs(&["en", "zh"]));
        assert_eq!(a, b);
    }
}
