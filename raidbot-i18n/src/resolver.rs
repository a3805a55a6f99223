//! Per-request locale resolution.

use crate::{Locale, LocaleCookie, locale::parse_accept_language};
use raidbot_core::HttpRequest;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Query parameter carrying an explicit locale override.
pub const QUERY_PARAM: &str = "lang";

/// Which input decided the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Query,
    Cookie,
    Header,
    Default,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionSource::Query => "query",
            ResolutionSource::Cookie => "cookie",
            ResolutionSource::Header => "header",
            ResolutionSource::Default => "default",
        };
        f.write_str(name)
    }
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub locale: Locale,
    /// The caller should write `locale` back to the preference cookie.
    pub should_persist: bool,
    pub source: ResolutionSource,
}

impl Resolution {
    fn new(locale: Locale, source: ResolutionSource) -> Self {
        Self {
            locale,
            should_persist: source == ResolutionSource::Query,
            source,
        }
    }
}

/// Decides the active locale from query, cookie and Accept-Language.
///
/// Pure: it never fails and never writes anything. Invalid input at one
/// step falls through to the next.
pub struct LocaleResolver;

impl LocaleResolver {
    /// Precedence: `?lang=`, then the cookie, then Accept-Language, then the default.
    pub fn resolve(
        query: &HashMap<String, String>,
        cookie_value: Option<&str>,
        accept_language: Option<&str>,
    ) -> Resolution {
        if let Some(locale) = query.get(QUERY_PARAM).and_then(|v| Locale::from_code(v)) {
            return Resolution::new(locale, ResolutionSource::Query);
        }

        if let Some(locale) = cookie_value.and_then(Locale::from_code) {
            return Resolution::new(locale, ResolutionSource::Cookie);
        }

        let from_header = accept_language.and_then(|header| {
            parse_accept_language(header)
                .iter()
                .find_map(|tag| Locale::match_tag(tag))
        });
        if let Some(locale) = from_header {
            return Resolution::new(locale, ResolutionSource::Header);
        }

        Resolution::new(Locale::DEFAULT, ResolutionSource::Default)
    }

    /// Resolve from a request's query, `i18n` cookie and Accept-Language header.
    pub fn resolve_request(request: &HttpRequest) -> Resolution {
        let query = request.query_map();
        let cookie = LocaleCookie::read(request);

        let resolution = Self::resolve(
            &query,
            cookie.as_deref(),
            request.header("Accept-Language"),
        );
        raidbot_log::debug!(
            "Resolved locale {} from {} for {}",
            resolution.locale,
            resolution.source,
            request.path
        );
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_wins_and_persists() {
        let r = LocaleResolver::resolve(&query(&[("lang", "ru")]), Some("en"), Some("fr"));
        assert_eq!(r.locale, Locale::Ru);
        assert!(r.should_persist);
        assert_eq!(r.source, ResolutionSource::Query);
    }

    #[test]
    fn test_cookie_beats_header() {
        let r = LocaleResolver::resolve(&query(&[]), Some("ko"), Some("ru,en"));
        assert_eq!(r.locale, Locale::Ko);
        assert!(!r.should_persist);
        assert_eq!(r.source, ResolutionSource::Cookie);
    }

    #[test]
    fn test_header_alias() {
        let r = LocaleResolver::resolve(&query(&[]), None, Some("zh-TW,en;q=0.5"));
        assert_eq!(r.locale, Locale::Tw);
        assert!(!r.should_persist);
        assert_eq!(r.source, ResolutionSource::Header);
    }

    #[test]
    fn test_header_order_beats_quality() {
        let r = LocaleResolver::resolve(&query(&[]), None, Some("ko;q=0.1,ru;q=1.0"));
        assert_eq!(r.locale, Locale::Ko);
    }

    #[test]
    fn test_unsupported_everything_is_default() {
        let r = LocaleResolver::resolve(&query(&[("lang", "xx")]), Some("de"), Some("fr-FR"));
        assert_eq!(r.locale, Locale::En);
        assert!(!r.should_persist);
        assert_eq!(r.source, ResolutionSource::Default);
    }

    #[test]
    fn test_malformed_inputs_degrade() {
        let r = LocaleResolver::resolve(&query(&[("lang", "")]), Some(""), Some(";;,,q=,"));
        assert_eq!(r.source, ResolutionSource::Default);

        let r = LocaleResolver::resolve(&query(&[("lang", "%zz")]), Some("ImVu"), Some("pt"));
        assert_eq!(r.locale, Locale::PtBr);
        assert_eq!(r.source, ResolutionSource::Header);
    }

    #[test]
    fn test_resolve_request_reads_all_inputs() {
        let req = HttpRequest::new("GET", "/purchase")
            .with_header("cookie", "i18n=ImtvIg%3D%3D")
            .with_header("accept-language", "ru");
        let r = LocaleResolver::resolve_request(&req);
        assert_eq!(r.locale, Locale::Ko);
        assert_eq!(r.source, ResolutionSource::Cookie);

        let mut req = HttpRequest::new("GET", "/");
        req.raw_query = Some("utm=x&lang=pt-BR".to_string());
        let r = LocaleResolver::resolve_request(&req);
        assert_eq!(r.locale, Locale::PtBr);
        assert!(r.should_persist);
    }

    #[test]
    fn test_repeated_lang_uses_first() {
        let mut req = HttpRequest::new("GET", "/");
        req.raw_query = Some("lang=ko&lang=ru".to_string());
        assert_eq!(LocaleResolver::resolve_request(&req).locale, Locale::Ko);

        let req = HttpRequest::new("GET", "/").with_header("Cookie", "i18n=tw; i18n=ru");
        assert_eq!(LocaleResolver::resolve_request(&req).locale, Locale::Tw);
    }
}
