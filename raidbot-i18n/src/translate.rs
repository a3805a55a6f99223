//! Translation lookup with default-locale and raw-key fallback.

use crate::{Catalog, Locale};
use raidbot_log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Walk a dotted path through objects (by name) and arrays (by index).
fn walk<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Replace each `{{name}}` with its value. Unknown placeholders stay as written.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
}

impl Catalog {
    /// Localized string for `key`.
    ///
    /// Missing keys retry in the default locale and finally yield `key`
    /// itself. A key that names a container rather than a string also
    /// yields `key`.
    pub fn translate(&self, locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
        match self.find(locale, key) {
            Some(Value::String(text)) if params.is_empty() => text.clone(),
            Some(Value::String(text)) => interpolate(text, params),
            _ => key.to_string(),
        }
    }

    /// Raw value at `key` (string or container), with default-locale fallback.
    pub fn lookup_value(&self, locale: Locale, key: &str) -> Option<&Value> {
        self.find(locale, key)
    }

    /// Deserialize the value at `key`. A shape mismatch is logged and yields `None`.
    pub fn lookup_as<T: DeserializeOwned>(&self, locale: Locale, key: &str) -> Option<T> {
        let value = self.find(locale, key)?;
        match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("Translation '{}' ({}) has an unexpected shape: {}", key, locale, err);
                None
            }
        }
    }

    /// Whether `key` resolves in `locale` itself, without fallback.
    pub fn contains(&self, locale: Locale, key: &str) -> bool {
        self.tree(locale).and_then(|tree| walk(tree, key)).is_some()
    }

    fn find(&self, locale: Locale, key: &str) -> Option<&Value> {
        let own = self.tree(locale).and_then(|tree| walk(tree, key));
        match own {
            Some(value) => Some(value),
            None if locale.is_default() => None,
            None => walk(self.default_tree(), key),
        }
    }
}

/// A catalog bound to one locale.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
    locale: Locale,
}

impl Translator {
    pub fn new(catalog: Arc<Catalog>, locale: Locale) -> Self {
        Self { catalog, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.translate(self.locale, key, &[])
    }

    pub fn t_args(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.catalog.translate(self.locale, key, params)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.catalog.lookup_value(self.locale, key)
    }

    pub fn lookup_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.catalog.lookup_as(self.locale, key)
    }
}

/// Key/action pair listed in the controls FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlItem {
    pub key: String,
    pub action: String,
}

/// One entry under `faq.items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub setup_steps: Vec<String>,
    #[serde(default)]
    pub limitations_list: Vec<String>,
    #[serde(default)]
    pub controls_list: Vec<ControlItem>,
    #[serde(default)]
    pub pickit_steps: Vec<String>,
    #[serde(default)]
    pub log_disable_steps: Vec<String>,
    #[serde(default)]
    pub log_disable_note: Option<String>,
}

/// Title and description used for page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}
