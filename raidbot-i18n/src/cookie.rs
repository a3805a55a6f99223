//! The persisted locale preference cookie.

use crate::Locale;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use raidbot_core::{HttpRequest, SameSite, SetCookie};
use std::time::{Duration, SystemTime};

/// Writes and reads the `i18n` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocaleCookie {
    /// Adds the `Secure` attribute
    pub secure: bool,
}

impl LocaleCookie {
    pub const NAME: &'static str = "i18n";

    /// One year.
    pub const MAX_AGE: Duration = Duration::from_secs(31_536_000);

    /// `Secure` only in production.
    pub fn new(production: bool) -> Self {
        Self { secure: production }
    }

    pub fn set_cookie(&self, locale: Locale) -> SetCookie {
        SetCookie::new(Self::NAME, locale.code())
            .path("/")
            .max_age(Self::MAX_AGE)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
    }

    /// `Set-Cookie` header value storing `locale`.
    pub fn serialize(&self, locale: Locale) -> String {
        self.set_cookie(locale).to_header_value()
    }

    pub fn serialize_at(&self, locale: Locale, now: SystemTime) -> String {
        self.set_cookie(locale).to_header_value_at(now)
    }

    /// Stored value from the request's `Cookie` header.
    ///
    /// Accepts the plain code and the base64-encoded JSON string written by
    /// the previous site (`ImVuIg==` is `"en"`). Other values are returned
    /// untouched for the resolver to reject.
    pub fn read(request: &HttpRequest) -> Option<String> {
        let raw = request.cookie(Self::NAME)?;
        Some(decode_value(&raw))
    }
}

fn decode_value(raw: &str) -> String {
    if Locale::from_code(raw).is_some() {
        return raw.to_string();
    }

    STANDARD
        .decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<String>(&bytes).ok())
        .unwrap_or_else(|| raw.to_string())
}
