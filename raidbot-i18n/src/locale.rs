//! Supported locales and Accept-Language parsing.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the site's supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "tw")]
    Tw,
    #[serde(rename = "ru")]
    Ru,
    #[serde(rename = "ko")]
    Ko,
}

/// Regional tags that map onto a supported code.
const ALIASES: &[(&str, Locale)] = &[
    ("zh-TW", Locale::Tw),
    ("zh-HK", Locale::Tw),
    ("zh-Hant", Locale::Tw),
    ("zh-Hant-TW", Locale::Tw),
    ("pt", Locale::PtBr),
    ("pt-BR", Locale::PtBr),
];

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Locale; 5] = [Locale::En, Locale::PtBr, Locale::Tw, Locale::Ru, Locale::Ko];

    pub const DEFAULT: Locale = Locale::En;

    /// Canonical code, as stored in cookies and catalog paths.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::PtBr => "pt-BR",
            Locale::Tw => "tw",
            Locale::Ru => "ru",
            Locale::Ko => "ko",
        }
    }

    /// Value for the document `lang` attribute.
    ///
    /// `tw` is a site-local code; documents advertise the full `zh-TW` tag.
    pub fn html_lang(&self) -> &'static str {
        match self {
            Locale::Tw => "zh-TW",
            other => other.code(),
        }
    }

    /// Name of the language in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::PtBr => "Português",
            Locale::Tw => "繁體中文",
            Locale::Ru => "Русский",
            Locale::Ko => "한국어",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Exact, ASCII case-insensitive match against the supported codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    /// Match against the regional alias table.
    pub fn from_alias(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(tag))
            .map(|(_, locale)| *locale)
    }

    /// Resolve one language tag: exact code, then alias, then its first two characters.
    pub fn match_tag(tag: &str) -> Option<Self> {
        Self::from_code(tag)
            .or_else(|| Self::from_alias(tag))
            .or_else(|| tag.get(..2).and_then(Self::from_code))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| I18nError::UnsupportedLocale(s.to_string()))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A BCP 47 language tag split into its common subtags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag {
    /// Primary language, lowercased (`zh`)
    pub language: String,
    /// Script, title-cased (`Hant`)
    pub script: Option<String>,
    /// Region, uppercased (`TW`) or a UN M.49 number
    pub region: Option<String>,
}

impl LanguageTag {
    /// Parse `zh-Hant-TW`, `pt_BR`, `en`, ...
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();

        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(I18nError::UnsupportedLocale(tag.to_string()));
        }

        let mut script = None;
        let mut region = None;

        for part in parts {
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                let (head, tail) = part.split_at(1);
                script = Some(format!(
                    "{}{}",
                    head.to_ascii_uppercase(),
                    tail.to_ascii_lowercase()
                ));
            } else if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                region = Some(part.to_ascii_uppercase());
            } else if part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()) {
                region = Some(part.to_string());
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    /// Canonical tag text.
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        for subtag in [&self.script, &self.region].into_iter().flatten() {
            tag.push('-');
            tag.push_str(subtag);
        }
        tag
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Split an Accept-Language header into tags, in the order sent.
///
/// Quality values are dropped, never used for ordering. Empty entries and
/// the `*` wildcard are skipped.
///
/// ```
/// use raidbot_i18n::parse_accept_language;
///
/// let tags = parse_accept_language("fr;q=0.9, zh-TW, *;q=0.1");
/// assert_eq!(tags, vec!["fr", "zh-TW"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<String> {
    header
        .split(',')
        .filter_map(|part| {
            let tag = part.split(';').next()?.trim();
            if tag.is_empty() || tag == "*" {
                None
            } else {
                Some(tag.to_string())
            }
        })
        .collect()
}

/// First supported locale for an Accept-Language header, if any.
pub fn negotiate_locale(header: &str) -> Option<Locale> {
    parse_accept_language(header)
        .iter()
        .find_map(|tag| Locale::match_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_through_from_code() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(locale.code()), Some(locale));
        }
        assert_eq!(Locale::from_code("PT-br"), Some(Locale::PtBr));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_exactly_one_default() {
        let defaults: Vec<_> = Locale::ALL.iter().filter(|l| l.is_default()).collect();
        assert_eq!(defaults, vec![&Locale::En]);
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_html_lang_special_case() {
        assert_eq!(Locale::Tw.html_lang(), "zh-TW");
        assert_eq!(Locale::PtBr.html_lang(), "pt-BR");
        assert_eq!(Locale::Ko.html_lang(), "ko");
    }

    #[test]
    fn test_match_tag_steps() {
        assert_eq!(Locale::match_tag("ru"), Some(Locale::Ru));
        assert_eq!(Locale::match_tag("zh-TW"), Some(Locale::Tw));
        assert_eq!(Locale::match_tag("zh-hant"), Some(Locale::Tw));
        assert_eq!(Locale::match_tag("pt"), Some(Locale::PtBr));
        assert_eq!(Locale::match_tag("ko-KR"), Some(Locale::Ko));
        assert_eq!(Locale::match_tag("en-GB"), Some(Locale::En));
        assert_eq!(Locale::match_tag("pt-PT"), None);
        assert_eq!(Locale::match_tag("zh-CN"), None);
        assert_eq!(Locale::match_tag("fr-FR"), None);
        assert_eq!(Locale::match_tag("é"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ko".parse::<Locale>().unwrap(), Locale::Ko);
        assert!(matches!(
            "de".parse::<Locale>(),
            Err(I18nError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::PtBr).unwrap(), "\"pt-BR\"");
        let parsed: Locale = serde_json::from_str("\"tw\"").unwrap();
        assert_eq!(parsed, Locale::Tw);
    }

    #[test]
    fn test_language_tag_parse() {
        let tag = LanguageTag::parse("zh-hant-tw").unwrap();
        assert_eq!(tag.language, "zh");
        assert_eq!(tag.script.as_deref(), Some("Hant"));
        assert_eq!(tag.region.as_deref(), Some("TW"));
        assert_eq!(tag.to_string(), "zh-Hant-TW");

        assert_eq!(LanguageTag::parse("pt_BR").unwrap().tag(), "pt-BR");
        assert_eq!(LanguageTag::parse("es-419").unwrap().region.as_deref(), Some("419"));
        assert!(LanguageTag::parse("").is_err());
        assert!(LanguageTag::parse("x1").is_err());
    }

    #[test]
    fn test_parse_accept_language_keeps_order() {
        let tags = parse_accept_language("en;q=0.1, ko;q=0.9,  ,ru");
        assert_eq!(tags, vec!["en", "ko", "ru"]);
    }

    #[test]
    fn test_parse_accept_language_garbage() {
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(",;;,*").is_empty());
        assert_eq!(parse_accept_language(";q=1,ko"), vec!["ko"]);
    }

    #[test]
    fn test_negotiate_locale() {
        assert_eq!(negotiate_locale("zh-TW,en;q=0.5"), Some(Locale::Tw));
        assert_eq!(negotiate_locale("de-DE,pt;q=0.4"), Some(Locale::PtBr));
        assert_eq!(negotiate_locale("fr-FR"), None);
    }
}
