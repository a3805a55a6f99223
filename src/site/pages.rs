//! Localized page loaders.
//!
//! A page request resolves its locale first. An explicit `?lang=` is
//! persisted to the cookie and answered with a redirect to the same page
//! without the parameter, so the language never sticks in shared URLs.
//! Everything else renders the page in the resolved locale.

use super::{Site, escape_html};
use chrono::Datelike;
use raidbot_core::{Error, HttpRequest, HttpResponse};
use raidbot_i18n::{FaqItem, Locale, LocaleResolver, PageMeta, QUERY_PARAM, Translator};
use std::sync::Arc;

/// Public pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Purchase,
    Licenses,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Purchase, Page::Licenses];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Purchase => "/purchase",
            Page::Licenses => "/licenses",
        }
    }

    /// Segment under `pages.` holding the page metadata.
    pub fn key(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Purchase => "purchase",
            Page::Licenses => "licenses",
        }
    }

    /// Navigation label.
    fn label(&self, t: &Translator) -> String {
        t.t(&format!("global.{}", self.key()))
    }
}

const FEATURES: [&str; 3] = ["farmWhileAfk", "community", "safeAndEasy"];
const PLANS: [&str; 3] = ["free", "regular", "premium"];
const FAQ_ITEMS: [&str; 3] = ["setup", "limitations", "controls"];

/// Serve `page`, falling back to the default locale if loading fails.
pub async fn load(site: Arc<Site>, page: Page, request: HttpRequest) -> Result<HttpResponse, Error> {
    match respond(&site, page, &request) {
        Ok(response) => Ok(response),
        Err(err) => {
            raidbot_log::error!(
                "Loading {} failed, rendering {}: {}",
                page.path(),
                Locale::DEFAULT,
                err
            );
            render(&site, page, Locale::DEFAULT).map(|html| page_response(html, Locale::DEFAULT))
        }
    }
}

fn respond(site: &Site, page: Page, request: &HttpRequest) -> Result<HttpResponse, Error> {
    let resolution = LocaleResolver::resolve_request(request);

    if resolution.should_persist {
        let location = match request.query_without(QUERY_PARAM)? {
            Some(query) => format!("{}?{}", page.path(), query),
            None => page.path().to_string(),
        };
        return Ok(HttpResponse::redirect(location)
            .with_cookie(site.cookie().serialize(resolution.locale))
            .no_cache());
    }

    let html = render(site, page, resolution.locale)?;
    Ok(page_response(html, resolution.locale).with_header("Vary", "Cookie, Accept-Language"))
}

fn page_response(html: String, locale: Locale) -> HttpResponse {
    HttpResponse::html(html).with_header("Content-Language", locale.html_lang())
}

/// Full HTML document for `page` in `locale`.
pub fn render(site: &Site, page: Page, locale: Locale) -> Result<String, Error> {
    let t = Translator::new(Arc::clone(site.catalog()), locale);
    let meta_key = format!("pages.{}.meta", page.key());
    let meta: PageMeta = t
        .lookup_as(&meta_key)
        .ok_or_else(|| Error::Internal(format!("missing page metadata '{}'", meta_key)))?;

    let base_url = &site.config().base_url;
    let canonical = format!("{}{}", base_url, page.path());
    let year = chrono::Utc::now().year().to_string();

    let bootstrap = client_bootstrap(site, locale)?;

    let main = match page {
        Page::Home => home(&t),
        Page::Purchase => purchase(&t),
        Page::Licenses => licenses(&t),
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="keywords" content="{keywords}">
<link rel="canonical" href="{canonical}">
{alternates}<script type="application/json" id="i18n-bootstrap">{bootstrap}</script>
</head>
<body>
<header>
<nav>
<a class="brand" href="/">{brand}</a>
{nav}
</nav>
{selector}
</header>
<main>
{main}
</main>
<footer>
<p>{rights}</p>
<a href="/#faq">{faq}</a>
</footer>
</body>
</html>
"#,
        lang = locale.html_lang(),
        title = escape_html(&meta.title),
        description = escape_html(&meta.description),
        keywords = escape_html(&t.t("meta.keywords")),
        canonical = escape_html(&canonical),
        alternates = alternates(base_url, page),
        bootstrap = bootstrap,
        brand = escape_html(&t.t("header.title")),
        nav = navigation(&t, page),
        selector = language_selector(&t),
        main = main,
        rights = escape_html(&t.t_args("footer.rights", &[("year", year.as_str())])),
        faq = escape_html(&t.t("footer.faq")),
    ))
}

/// What the client runtime needs to mount: the server locale, where to
/// load its catalog from, and how long to wait for initialization.
fn client_bootstrap(site: &Site, locale: Locale) -> Result<String, Error> {
    let bootstrap = serde_json::json!({
        "locale": locale,
        "defaultLocale": Locale::DEFAULT,
        "supportedLocales": Locale::ALL,
        "translationsUrl": format!("/api/translations/{}", locale.code()),
        "initCeilingMs": site.config().init_ceiling().as_millis() as u64,
    });
    let json = serde_json::to_string(&bootstrap).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

fn alternates(base_url: &str, page: Page) -> String {
    let mut links: String = Locale::ALL
        .iter()
        .map(|locale| {
            format!(
                "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}{}?{}={}\">\n",
                locale.html_lang(),
                escape_html(base_url),
                page.path(),
                QUERY_PARAM,
                locale.code()
            )
        })
        .collect();
    links.push_str(&format!(
        "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{}{}\">\n",
        escape_html(base_url),
        page.path()
    ));
    links
}

fn navigation(t: &Translator, current: Page) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            let aria = if *page == current {
                " aria-current=\"page\""
            } else {
                ""
            };
            format!(
                "<a href=\"{}\"{}>{}</a>",
                page.path(),
                aria,
                escape_html(&page.label(t))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn language_selector(t: &Translator) -> String {
    let options: String = Locale::ALL
        .iter()
        .map(|locale| {
            let selected = if *locale == t.locale() { " selected" } else { "" };
            format!(
                "<option value=\"{}\" lang=\"{}\"{}>{}</option>",
                locale.code(),
                locale.html_lang(),
                selected,
                locale.native_name()
            )
        })
        .collect();

    let label = escape_html(&t.t("language.label"));
    format!(
        "<form method=\"post\" action=\"/set-language\">\
<label for=\"lang\">{label}</label>\
<select id=\"lang\" name=\"lang\">{options}</select>\
<button type=\"submit\">{label}</button>\
</form>"
    )
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{}</ul>", items)
}

fn home(t: &Translator) -> String {
    let features: String = FEATURES
        .iter()
        .map(|id| {
            let bullets: Vec<String> = t
                .lookup_as(&format!("features.{}.bullets", id))
                .unwrap_or_default();
            format!(
                "<article><h3>{}</h3><p>{}</p>{}</article>\n",
                escape_html(&t.t(&format!("features.{}.title", id))),
                escape_html(&t.t(&format!("features.{}.description", id))),
                list(&bullets)
            )
        })
        .collect();

    let faq: String = FAQ_ITEMS
        .iter()
        .filter_map(|id| t.lookup_as::<FaqItem>(&format!("faq.items.{}", id)))
        .map(|item| faq_entry(&item))
        .collect();

    format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n<p>{}</p>\n<a href=\"/purchase\">{}</a>\n</section>\n\
<section class=\"features\">\n<h2>{}</h2>\n{}</section>\n\
<section id=\"faq\">\n<h2>{}</h2>\n{}</section>",
        escape_html(&t.t("header.title")),
        escape_html(&t.t("header.tagline")),
        escape_html(&t.t("header.description")),
        escape_html(&t.t("header.cta")),
        escape_html(&t.t("features.title")),
        features,
        escape_html(&t.t("faq.title")),
        faq
    )
}

fn faq_entry(item: &FaqItem) -> String {
    let mut body = String::new();
    if let Some(ref answer) = item.answer {
        body.push_str(&format!("<p>{}</p>", escape_html(answer)));
    }
    for steps in [&item.setup_steps, &item.limitations_list, &item.pickit_steps] {
        body.push_str(&list(steps));
    }
    if !item.controls_list.is_empty() {
        let rows: String = item
            .controls_list
            .iter()
            .map(|control| {
                format!(
                    "<dt><kbd>{}</kbd></dt><dd>{}</dd>",
                    escape_html(&control.key),
                    escape_html(&control.action)
                )
            })
            .collect();
        body.push_str(&format!("<dl>{}</dl>", rows));
    }
    body.push_str(&list(&item.log_disable_steps));
    if let Some(ref note) = item.log_disable_note {
        body.push_str(&format!("<p>{}</p>", escape_html(note)));
    }

    format!(
        "<details><summary>{}</summary>{}</details>\n",
        escape_html(&item.question),
        body
    )
}

fn purchase(t: &Translator) -> String {
    let plans: String = PLANS
        .iter()
        .map(|plan| {
            let features: Vec<String> = t
                .lookup_as(&format!("pricing.{}.features", plan))
                .unwrap_or_default();
            format!(
                "<article class=\"plan\"><h3>{}</h3><p class=\"price\">{}</p><p>{}</p>{}<button type=\"button\">{}</button></article>\n",
                escape_html(&t.t(&format!("pricing.{}.title", plan))),
                escape_html(&t.t(&format!("pricing.{}.price", plan))),
                escape_html(&t.t(&format!("pricing.{}.description", plan))),
                list(&features),
                escape_html(&t.t(&format!("pricing.{}.buttonText", plan)))
            )
        })
        .collect();

    format!(
        "<section class=\"pricing\">\n<h1>{}</h1>\n<p>{}</p>\n{}<p>{}</p>\n</section>",
        escape_html(&t.t("pricing.title")),
        escape_html(&t.t("pricing.subtitle")),
        plans,
        escape_html(&t.t("pricing.securedPayment"))
    )
}

fn licenses(t: &Translator) -> String {
    format!(
        "<section class=\"licenses\">\n<h1>{}</h1>\n<p>{}</p>\n<h2>{}</h2>\n<a href=\"/\">{}</a>\n</section>",
        escape_html(&t.t("license.title")),
        escape_html(&t.t("license.empty")),
        escape_html(&t.t("license.activateTitle")),
        escape_html(&t.t("global.manageLicenses"))
    )
}
