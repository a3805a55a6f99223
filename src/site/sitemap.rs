//! `GET /sitemap.xml`

use super::{Page, Site, escape_html};
use raidbot_core::{Error, HttpRequest, HttpResponse};
use std::sync::Arc;

fn changefreq(page: Page) -> &'static str {
    match page {
        Page::Home | Page::Purchase => "weekly",
        Page::Licenses => "monthly",
    }
}

/// Sitemap of the public pages, addressed from the request's origin.
pub async fn sitemap(site: Arc<Site>, request: HttpRequest) -> Result<HttpResponse, Error> {
    let origin = origin(&site, &request);
    Ok(HttpResponse::xml(render(&origin)))
}

/// `scheme://host` the request was made to, or the configured base URL
/// when the `Host` header is absent or not a plain host name.
fn origin(site: &Site, request: &HttpRequest) -> String {
    let config = site.config();
    match request.header("Host") {
        Some(host) if is_host(host) => {
            let scheme = if config.production { "https" } else { "http" };
            format!("{}://{}", scheme, host)
        }
        _ => config.base_url.clone(),
    }
}

fn is_host(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}

pub fn render(origin: &str) -> String {
    let urls: String = Page::ALL
        .iter()
        .map(|page| {
            format!(
                "  <url>\n    <loc>{}{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>1</priority>\n  </url>\n",
                escape_html(origin),
                page.path(),
                changefreq(*page)
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        urls
    )
}
