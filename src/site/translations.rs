//! `GET /api/translations/:locale`, the document the client runtime loads.

use super::Site;
use raidbot_core::{Error, HttpRequest, HttpResponse};
use raidbot_i18n::Locale;
use std::sync::Arc;

/// The catalog tree for one locale.
///
/// A supported locale without its own document is served the default
/// tree, matching what lookups fall back to.
pub async fn translations(site: Arc<Site>, request: HttpRequest) -> Result<HttpResponse, Error> {
    let code = request.param("locale").map(String::as_str).unwrap_or_default();
    let locale = Locale::from_code(code)
        .ok_or_else(|| Error::NotFound(format!("unsupported locale '{}'", code)))?;

    let catalog = site.catalog();
    let tree = catalog.tree(locale).unwrap_or_else(|| catalog.default_tree());

    Ok(HttpResponse::json(tree)?
        .with_header("Content-Language", locale.html_lang())
        .cache_control("public, max-age=3600"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SiteConfig;
    use raidbot_i18n::Catalog;

    fn router() -> raidbot_core::Router {
        Arc::new(Site::new(SiteConfig::default(), Catalog::embedded().unwrap())).router()
    }

    #[tokio::test]
    async fn test_serves_locale_tree() {
        let response = router()
            .route(HttpRequest::new("GET", "/api/translations/pt-BR"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let tree: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert!(tree["global"]["home"].is_string());
    }

    #[tokio::test]
    async fn test_unsupported_locale_is_404() {
        let err = router()
            .route(HttpRequest::new("GET", "/api/translations/de"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
