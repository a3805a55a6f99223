//! Site composition: the routes the RaidBot site serves.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /`, `/purchase`, `/licenses` | localized pages ([`pages`]) |
//! | `POST /set-language` | persist a language choice ([`language`]) |
//! | `GET /set-language` | redirect home |
//! | `GET /sitemap.xml` | XML sitemap ([`sitemap`]) |
//! | `GET /api/translations/:locale` | catalog tree for the client runtime ([`translations`]) |

pub mod language;
pub mod pages;
pub mod sitemap;
pub mod translations;

pub use pages::Page;

use crate::config::SiteConfig;
use raidbot_core::{Error, HttpRequest, HttpResponse, Router};
use raidbot_i18n::{Catalog, LocaleCookie};
use std::future::Future;
use std::sync::Arc;

/// Shared state behind every route.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    catalog: Arc<Catalog>,
    cookie: LocaleCookie,
}

impl Site {
    pub fn new(config: SiteConfig, catalog: Catalog) -> Self {
        let cookie = config.cookie();
        Self {
            config,
            catalog: Arc::new(catalog),
            cookie,
        }
    }

    /// Build the site, reading the catalog from `locales_dir` when configured.
    pub fn from_config(config: SiteConfig) -> raidbot_i18n::Result<Self> {
        let catalog = match config.locales_dir {
            Some(ref dir) => Catalog::load_from_dir(dir)?,
            None => Catalog::embedded()?,
        };
        raidbot_log::info!(
            "Loaded translations for {} locale(s)",
            catalog.locales().len()
        );
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn cookie(&self) -> LocaleCookie {
        self.cookie
    }

    /// Every route of the site.
    pub fn router(self: &Arc<Self>) -> Router {
        let mut router = Router::new();
        for page in Page::ALL {
            router = router.get(
                page.path(),
                bind(self, move |site, req| pages::load(site, page, req)),
            );
        }

        router
            .post("/set-language", bind(self, language::set_language))
            .get("/set-language", |_req| async { Ok::<_, Error>(HttpResponse::redirect("/")) })
            .get("/sitemap.xml", bind(self, sitemap::sitemap))
            .get(
                "/api/translations/:locale",
                bind(self, translations::translations),
            )
    }
}

/// Adapt a handler taking the shared site into a plain request handler.
fn bind<F, Fut>(site: &Arc<Site>, handler: F) -> impl Fn(HttpRequest) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<Site>, HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    let site = Arc::clone(site);
    move |req| handler(Arc::clone(&site), req)
}

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
