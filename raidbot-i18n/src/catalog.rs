//! Per-locale translation trees.

use crate::{I18nError, Locale, Result};
use raidbot_log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a locale document inside `<dir>/<code>/`.
pub const TRANSLATIONS_FILE: &str = "translations.json";

const EMBEDDED: [(Locale, &str); 5] = [
    (Locale::En, include_str!("../locales/en/translations.json")),
    (Locale::PtBr, include_str!("../locales/pt-BR/translations.json")),
    (Locale::Tw, include_str!("../locales/tw/translations.json")),
    (Locale::Ru, include_str!("../locales/ru/translations.json")),
    (Locale::Ko, include_str!("../locales/ko/translations.json")),
];

/// Immutable set of translation trees, one per locale.
///
/// The default locale's tree is always present. Other locales may be
/// absent, in which case lookups for them fall back to the default.
#[derive(Debug, Clone)]
pub struct Catalog {
    trees: HashMap<Locale, Value>,
}

impl Catalog {
    /// The documents compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_sources(EMBEDDED)
    }

    /// Build from in-memory JSON documents.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Locale, &'a str)>,
    {
        let trees = sources
            .into_iter()
            .map(|(locale, source)| Ok((locale, parse_document(locale, source)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Self::from_trees(trees)
    }

    /// Build from already parsed trees.
    pub fn from_trees(trees: HashMap<Locale, Value>) -> Result<Self> {
        if let Some((locale, _)) = trees.iter().find(|(_, tree)| !tree.is_object()) {
            return Err(I18nError::ParseError(format!(
                "{}: document root must be an object",
                locale
            )));
        }
        if !trees.contains_key(&Locale::DEFAULT) {
            return Err(I18nError::MissingDefaultLocale(Locale::DEFAULT.to_string()));
        }
        Ok(Self { trees })
    }

    /// Load `<dir>/<code>/translations.json` for every supported locale.
    ///
    /// Unreadable non-default locales are logged and skipped.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut trees = HashMap::new();

        for locale in Locale::ALL {
            let path = locale_path(dir, locale);
            let loaded = fs::read_to_string(&path)
                .map_err(I18nError::from)
                .and_then(|source| parse_document(locale, &source));

            match loaded {
                Ok(tree) => {
                    debug!("Loaded translations for {} from {}", locale, path.display());
                    trees.insert(locale, tree);
                }
                Err(err) if locale.is_default() => return Err(err),
                Err(err) => {
                    warn!(
                        "Skipping translations for {} ({}): {}",
                        locale,
                        path.display(),
                        err
                    );
                }
            }
        }

        Self::from_trees(trees)
    }

    /// Raw tree for a locale, if it was loaded.
    pub fn tree(&self, locale: Locale) -> Option<&Value> {
        self.trees.get(&locale)
    }

    pub fn has_locale(&self, locale: Locale) -> bool {
        self.trees.contains_key(&locale)
    }

    /// Loaded locales in `Locale::ALL` order.
    pub fn locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.has_locale(*locale))
            .collect()
    }

    /// The default locale's tree.
    pub fn default_tree(&self) -> &Value {
        static EMPTY: Value = Value::Null;
        // from_trees guarantees the default entry
        self.trees.get(&Locale::DEFAULT).unwrap_or(&EMPTY)
    }
}

/// Path of a locale document under a catalog directory.
pub fn locale_path(dir: &Path, locale: Locale) -> PathBuf {
    dir.join(locale.code()).join(TRANSLATIONS_FILE)
}

fn parse_document(locale: Locale, source: &str) -> Result<Value> {
    let tree: Value = serde_json::from_str(source)
        .map_err(|e| I18nError::ParseError(format!("{}: {}", locale, e)))?;

    if !tree.is_object() {
        return Err(I18nError::ParseError(format!(
            "{}: document root must be an object",
            locale
        )));
    }
    Ok(tree)
}
