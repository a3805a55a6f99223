// HTTP request and response types

use crate::cookie;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// HTTP request wrapper
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    /// Raw query string without the leading `?`, as received.
    pub raw_query: Option<String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
            raw_query: None,
        }
    }

    /// Add a header (builder style).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the body (builder style).
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header lookup, ignoring ASCII case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of a cookie from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.header("Cookie")
            .and_then(|header| cookie::cookie_value(header, name))
    }

    /// Parse the request body as `application/x-www-form-urlencoded`
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, crate::Error> {
        crate::form::parse_form(&self.body)
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Query parameters by name. A repeated name keeps its first value.
    pub fn query_map(&self) -> HashMap<String, String> {
        if self.raw_query.is_none() {
            return self.query_params.clone();
        }
        let mut params = HashMap::new();
        for (name, value) in self.query_pairs() {
            params.entry(name).or_insert(value);
        }
        params
    }

    /// Query pairs in their original order, percent-decoded.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.raw_query
            .as_deref()
            .map(crate::routing::parse_query_pairs)
            .unwrap_or_default()
    }

    /// Query string with every `name` parameter removed; `None` when nothing remains.
    pub fn query_without(&self, name: &str) -> Result<Option<String>, crate::Error> {
        let kept: Vec<(String, String)> = self
            .query_pairs()
            .into_iter()
            .filter(|(key, _)| key != name)
            .collect();

        if kept.is_empty() {
            return Ok(None);
        }
        serde_urlencoded::to_string(&kept)
            .map(Some)
            .map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Whether the client asked for a programmatic (JSON) answer.
    pub fn wants_json(&self) -> bool {
        self.header("X-Requested-With")
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
            || self
                .header("Accept")
                .is_some_and(|v| v.contains("application/json"))
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn internal_server_error() -> Self {
        Self::new(500)
    }

    /// `200` with a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self, crate::Error> {
        Self::ok().with_json(value)
    }

    /// `200` with an HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("text/html; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    /// `200` with a plain text body
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("text/plain; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    /// `200` with an XML body
    pub fn xml(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("application/xml")
            .with_body(body.into().into_bytes())
    }

    /// `302 Found` to `location`
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(302).with_header("Location", location)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Attach a `Set-Cookie` header.
    pub fn with_cookie(self, set_cookie: impl Into<String>) -> Self {
        self.with_header("Set-Cookie", set_cookie)
    }

    pub fn content_type(self, value: &str) -> Self {
        self.with_header("Content-Type", value)
    }

    pub fn cache_control(self, value: &str) -> Self {
        self.with_header("Cache-Control", value)
    }

    pub fn no_cache(self) -> Self {
        self.cache_control("no-store, no-cache, must-revalidate")
    }

    /// Header lookup, ignoring ASCII case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as UTF-8 text (lossy).
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
