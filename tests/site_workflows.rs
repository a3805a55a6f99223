//! Integration tests for the site's request workflows.
//!
//! These drive the full router the way a browser or the client runtime
//! would: first visit, explicit `?lang=`, the language selector, and the
//! translation feed.

use raidbot::prelude::*;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn app() -> Application {
    let site = Arc::new(Site::new(SiteConfig::default(), Catalog::embedded().unwrap()));
    Application::new(site.router())
}

fn get(path_and_query: &str) -> HttpRequest {
    HttpRequest::new("GET", path_and_query)
}

/// `name=value` part of a `Set-Cookie` header, ready for a `Cookie` header.
fn cookie_pair(response: &HttpResponse) -> String {
    response
        .header("Set-Cookie")
        .and_then(|c| c.split(';').next())
        .unwrap()
        .to_string()
}

// =============================================================================
// Page loaders
// =============================================================================

#[tokio::test]
async fn test_first_visit_negotiates_from_header() {
    let response = app()
        .dispatch(get("/").with_header("Accept-Language", "zh-TW,zh;q=0.9,en;q=0.8"))
        .await;

    assert_eq!(response.status, 200);
    assert!(response.header("Set-Cookie").is_none());
    assert!(response.body_text().contains("<html lang=\"zh-TW\">"));
}

#[tokio::test]
async fn test_query_lang_redirect_then_cookie_sticks() {
    let app = app();

    let response = app.dispatch(get("/licenses?lang=ko")).await;
    assert_eq!(response.status, 302);
    assert_eq!(response.header("Location"), Some("/licenses"));
    let cookie = cookie_pair(&response);
    assert_eq!(cookie, "i18n=ko");

    // Following the redirect with the cookie, even with a conflicting header.
    let response = app
        .dispatch(
            get("/licenses")
                .with_header("Cookie", cookie.as_str())
                .with_header("Accept-Language", "ru"),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Language"), Some("ko"));
}

#[tokio::test]
async fn test_repeated_lang_persists_the_first() {
    let response = app().dispatch(get("/purchase?lang=ko&utm=mail&lang=ru")).await;
    assert_eq!(response.status, 302);
    assert_eq!(response.header("Location"), Some("/purchase?utm=mail"));
    assert_eq!(cookie_pair(&response), "i18n=ko");
}

#[tokio::test]
async fn test_legacy_encoded_cookie_is_honored() {
    // base64 of the JSON string "ru"
    let response = app()
        .dispatch(get("/purchase").with_header("Cookie", "i18n=InJ1Ig%3D%3D"))
        .await;
    assert_eq!(response.header("Content-Language"), Some("ru"));
}

#[tokio::test]
async fn test_garbage_inputs_degrade_to_default() {
    let response = app()
        .dispatch(
            get("/?lang=zz")
                .with_header("Cookie", "i18n=%%%")
                .with_header("Accept-Language", ";;;q=abc,*"),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Language"), Some("en"));
}

#[tokio::test]
async fn test_head_served_by_page_loader() {
    let response = app().dispatch(HttpRequest::new("HEAD", "/")).await;
    assert_eq!(response.status, 200);
}

// =============================================================================
// Language selector
// =============================================================================

#[tokio::test]
async fn test_selector_round_trip() {
    let app = app();

    let response = app
        .dispatch(
            HttpRequest::new("POST", "/set-language")
                .with_header("Content-Type", "application/x-www-form-urlencoded")
                .with_header("Referer", "/purchase")
                .with_body("lang=tw"),
        )
        .await;
    assert_eq!(response.status, 302);
    assert_eq!(response.header("Location"), Some("/purchase"));

    let cookie = cookie_pair(&response);
    let request = get("/purchase").with_header("Cookie", cookie.as_str());
    let resolution = LocaleResolver::resolve_request(&request);
    assert_eq!(resolution.locale, Locale::Tw);
    assert!(!resolution.should_persist);

    let page = app.dispatch(request).await;
    assert!(page.body_text().contains("<option value=\"tw\" lang=\"zh-TW\" selected>"));
}

#[tokio::test]
async fn test_get_set_language_redirects_home() {
    let response = app().dispatch(get("/set-language")).await;
    assert_eq!(response.status, 302);
    assert_eq!(response.header("Location"), Some("/"));
}

// =============================================================================
// Feeds and errors
// =============================================================================

#[tokio::test]
async fn test_translation_feed_falls_back_for_missing_document() {
    let catalog = Catalog::from_sources([(Locale::En, r#"{"global":{"home":"Home"}}"#)]).unwrap();
    let site = Arc::new(Site::new(SiteConfig::default(), catalog));
    let app = Application::new(site.router());

    let response = app.dispatch(get("/api/translations/ru")).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), r#"{"global":{"home":"Home"}}"#);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = app().dispatch(get("/ebclassic")).await;
    assert_eq!(response.status, 404);
    assert_eq!(response.header("Content-Type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_served_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(app().serve(listener));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /sitemap.xml HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    server.abort();

    assert!(raw.starts_with("HTTP/1.1 200"));
    assert!(raw.contains("<loc>http://localhost/purchase</loc>"));
}
