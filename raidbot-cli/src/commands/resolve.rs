//! Show how a request would be localized.

use crate::error::{CliError, CliResult};
use colored::Colorize;
use raidbot_core::HttpRequest;
use raidbot_i18n::{LocaleCookie, LocaleResolver, QUERY_PARAM, Resolution};

#[derive(Debug, Default)]
pub struct ResolveInput {
    pub lang: Option<String>,
    /// Stored `i18n` cookie value (plain or legacy encoded)
    pub cookie: Option<String>,
    pub accept_language: Option<String>,
}

impl ResolveInput {
    fn request(&self) -> HttpRequest {
        let mut request = HttpRequest::new("GET", "/");
        if let Some(ref lang) = self.lang {
            request
                .query_params
                .insert(QUERY_PARAM.to_string(), lang.clone());
        }
        if let Some(ref cookie) = self.cookie {
            request = request.with_header("Cookie", format!("{}={}", LocaleCookie::NAME, cookie));
        }
        if let Some(ref header) = self.accept_language {
            request = request.with_header("Accept-Language", header.clone());
        }
        request
    }
}

pub fn resolve(input: &ResolveInput) -> Resolution {
    LocaleResolver::resolve_request(&input.request())
}

pub fn execute(input: ResolveInput, json: bool, production: bool) -> CliResult<()> {
    let resolution = resolve(&input);
    let set_cookie = resolution
        .should_persist
        .then(|| LocaleCookie::new(production).serialize(resolution.locale));

    if json {
        let body = serde_json::json!({
            "locale": resolution.locale,
            "documentLanguage": resolution.locale.html_lang(),
            "source": resolution.source,
            "shouldPersist": resolution.should_persist,
            "setCookie": set_cookie,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "  {} {} ({})",
        "Locale:".bright_cyan().bold(),
        resolution.locale.code().green(),
        resolution.locale.native_name()
    );
    println!("  {} {}", "Document lang:".bright_cyan().bold(), resolution.locale.html_lang());
    println!("  {} {}", "Decided by:".bright_cyan().bold(), resolution.source);
    match set_cookie {
        Some(cookie) => println!("  {} {}", "Set-Cookie:".bright_cyan().bold(), cookie),
        None => println!("  {} {}", "Set-Cookie:".bright_cyan().bold(), "none".dimmed()),
    }
    Ok(())
}
