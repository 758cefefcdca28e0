//! Runtime translation. Catalogs are compiled from the sources under
//! locales/ at build time and embedded into the binary, then looked up
//! through a resolver owned by the app rather than any global state.

use std::collections::HashMap;

use rust_embed::RustEmbed;

pub mod mo;
#[cfg(test)]
pub mod po;

/// Languages offered in the settings dialog, as (code, native name).
pub const LANGUAGES: [(&str, &str); 5] = [
    ("en", "English"),
    ("zh", "简体中文"),
    ("zh_TW", "繁體中文"),
    ("ja", "日本語"),
    ("ko", "한국어"),
];

#[derive(RustEmbed)]
#[folder = "$OUT_DIR/locales"]
struct Catalogs;

/// Resolves display strings for one language. English (or any language
/// without a catalog) translates every message to itself.
pub struct Translator {
    catalog: Option<HashMap<String, String>>,
}

impl Translator {
    pub fn new(language: &str) -> Self {
        // Bare "zh" has shipped in older config files; it means the
        // simplified Chinese catalog.
        let target = if language == "zh" { "zh_CN" } else { language };
        let catalog = Catalogs::get(&format!("{target}.mo"))
            .and_then(|file| mo::parse_mo(&file.data));
        Self { catalog }
    }

    /// Looks up a message, falling back to the original text when the
    /// catalog is missing or has no (or an empty) translation for it.
    pub fn tr<'a>(&'a self, message: &'a str) -> &'a str {
        if let Some(catalog) = &self.catalog {
            if let Some(translation) = catalog.get(message) {
                if !translation.is_empty() {
                    return translation;
                }
            }
        }
        message
    }
}
