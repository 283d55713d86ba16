//! Translation collaborator.
//!
//! The carousel's dynamic content path labels elements with translation keys
//! and resolves display text through whatever translator the host provides.
//! Lookup order: host translator, then the built-in dictionary, then the raw
//! key itself.

/// Host-provided translation lookup.
pub trait Translator {
    /// Resolve a key to display text. `None` falls through to the built-in
    /// dictionary.
    fn translate(&self, key: &str) -> Option<String>;
}

/// Built-in fallback strings for the stock slide keys.
const FALLBACK: &[(&str, &str)] = &[
    ("slide1-title", "专业法律服务"),
    ("slide1-subtitle", "为您提供最专业的法律咨询和支持"),
    ("slide1-cta", "立即咨询"),
    ("slide1-demo", "预约演示"),
    ("slide2-title", "智能CRM系统"),
    ("slide2-subtitle", "高效管理客户关系，提升业务效率"),
    ("slide2-cta", "免费试用"),
    ("slide2-team", "联系我们"),
    ("slide3-title", "一站式服务"),
    ("slide3-subtitle", "全面解决方案，助力企业成功"),
    ("slide3-cta", "了解更多"),
    ("slide3-features", "查看功能"),
];

/// Resolve a key: host translator first, built-in dictionary second, the raw
/// key last.
pub fn translate_with_fallback(translator: Option<&dyn Translator>, key: &str) -> String {
    if let Some(translator) = translator {
        if let Some(text) = translator.translate(key) {
            return text;
        }
    }
    FALLBACK
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| (*text).to_string())
        .unwrap_or_else(|| key.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct MapTranslator;

    impl Translator for MapTranslator {
        fn translate(&self, key: &str) -> Option<String> {
            (key == "slide1-title").then(|| "Professional Legal Services".to_string())
        }
    }

    #[test]
    fn test_host_translator_wins() {
        let translator = MapTranslator;
        assert_eq!(
            translate_with_fallback(Some(&translator), "slide1-title"),
            "Professional Legal Services"
        );
    }

    #[test]
    fn test_builtin_dictionary_fallback() {
        let translator = MapTranslator;
        // Host returns None for this key; the dictionary answers.
        assert_eq!(
            translate_with_fallback(Some(&translator), "slide2-title"),
            "智能CRM系统"
        );
        assert_eq!(translate_with_fallback(None, "slide3-cta"), "了解更多");
    }

    #[test]
    fn test_unknown_key_echoes() {
        assert_eq!(translate_with_fallback(None, "missing-key"), "missing-key");
    }
}
