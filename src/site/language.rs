//! The language-change action.

use super::Site;
use raidbot_core::{Error, HttpRequest, HttpResponse};
use raidbot_i18n::{Locale, QUERY_PARAM};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
struct LanguageForm {
    lang: Option<String>,
}

/// Body returned to programmatic callers.
#[derive(Debug, Serialize)]
struct LanguageChanged {
    success: bool,
    language: Locale,
}

/// `POST /set-language`
///
/// A missing or unsupported `lang` stores the default locale. The cookie
/// is set either way; programmatic callers get JSON, browsers go back to
/// the page they came from.
pub async fn set_language(site: Arc<Site>, request: HttpRequest) -> Result<HttpResponse, Error> {
    let form: LanguageForm = request.form().unwrap_or_else(|err| {
        raidbot_log::warn!("Unreadable language form, using {}: {}", Locale::DEFAULT, err);
        LanguageForm::default()
    });

    let locale = form
        .lang
        .as_deref()
        .and_then(Locale::from_code)
        .unwrap_or(Locale::DEFAULT);
    let cookie = site.cookie().serialize(locale);

    raidbot_log::info!("Language set to {}", locale);

    if request.wants_json() {
        let body = LanguageChanged {
            success: true,
            language: locale,
        };
        return Ok(HttpResponse::json(&body)?.with_cookie(cookie).no_cache());
    }

    let target = return_target(&site, &request);
    Ok(HttpResponse::redirect(target).with_cookie(cookie))
}

/// Where a browser submission returns to.
///
/// The `Referer` is followed when it is a local path or points at this
/// site; anything else goes to `/`. A stale `lang` parameter would
/// override the new cookie, so it is dropped.
fn return_target(site: &Site, request: &HttpRequest) -> String {
    let Some(referer) = request.header("Referer") else {
        return "/".to_string();
    };

    let local = if referer.starts_with('/') && !referer.starts_with("//") {
        Some(referer)
    } else {
        same_site_path(referer, request.header("Host"), &site.config().base_url)
    };

    match local {
        Some(path) => strip_lang(path),
        None => {
            raidbot_log::debug!("Ignoring foreign referer {}", referer);
            "/".to_string()
        }
    }
}

/// Path and query of `url` when its authority is `host` or the base URL's.
fn same_site_path<'a>(url: &'a str, host: Option<&str>, base_url: &str) -> Option<&'a str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (authority, path) = match rest.find(['/', '?']) {
        Some(idx) => rest.split_at(idx),
        None => (rest, "/"),
    };

    let base_authority = base_url
        .split_once("://")
        .map(|(_, authority)| authority)
        .unwrap_or(base_url);
    let trusted = host.is_some_and(|h| h.eq_ignore_ascii_case(authority))
        || base_authority.eq_ignore_ascii_case(authority);

    if !trusted {
        return None;
    }
    Some(if path.starts_with('?') { "/" } else { path })
}

fn strip_lang(target: &str) -> String {
    let Some((path, query)) = target.split_once('?') else {
        return target.to_string();
    };
    let probe = HttpRequest {
        raw_query: Some(query.to_string()),
        ..HttpRequest::new("GET", path)
    };
    match probe.query_without(QUERY_PARAM) {
        Ok(Some(query)) => format!("{}?{}", path, query),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SiteConfig;
    use raidbot_i18n::Catalog;

    fn site() -> Arc<Site> {
        Arc::new(Site::new(SiteConfig::default(), Catalog::embedded().unwrap()))
    }

    fn form(body: &str) -> HttpRequest {
        HttpRequest::new("POST", "/set-language")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body)
    }

    #[tokio::test]
    async fn test_xhr_gets_json_and_cookie() {
        let request = form("lang=pt-BR").with_header("X-Requested-With", "XMLHttpRequest");
        let response = set_language(site(), request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body_text(), r#"{"success":true,"language":"pt-BR"}"#);
        assert!(response.header("Set-Cookie").unwrap().starts_with("i18n=pt-BR;"));
    }

    #[tokio::test]
    async fn test_browser_redirects_to_referer() {
        let request = form("lang=ko").with_header("Referer", "https://rslbot.com/purchase?lang=en&x=1");
        let response = set_language(site(), request).await.unwrap();

        assert_eq!(response.status, 302);
        assert_eq!(response.header("Location"), Some("/purchase?x=1"));
        assert!(response.header("Set-Cookie").unwrap().starts_with("i18n=ko;"));
    }

    #[tokio::test]
    async fn test_invalid_lang_stores_default() {
        let request = form("lang=klingon").with_header("Accept", "application/json");
        let response = set_language(site(), request).await.unwrap();
        assert_eq!(response.body_text(), r#"{"success":true,"language":"en"}"#);

        let response = set_language(site(), form("")).await.unwrap();
        assert_eq!(response.header("Location"), Some("/"));
        assert!(response.header("Set-Cookie").unwrap().starts_with("i18n=en;"));
    }

    #[test]
    fn test_return_target_rejects_foreign_referer() {
        let site = site();
        let foreign = form("").with_header("Referer", "https://evil.example/phish");
        assert_eq!(return_target(&site, &foreign), "/");

        let protocol_relative = form("").with_header("Referer", "//evil.example/");
        assert_eq!(return_target(&site, &protocol_relative), "/");
    }

    #[test]
    fn test_return_target_accepts_request_host() {
        let request = form("")
            .with_header("Host", "localhost:3000")
            .with_header("Referer", "http://localhost:3000/licenses");
        assert_eq!(return_target(&site(), &request), "/licenses");

        let request = form("").with_header("Referer", "/?lang=ru");
        assert_eq!(return_target(&site(), &request), "/");
    }
}
