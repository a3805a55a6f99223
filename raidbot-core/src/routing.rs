// Routing system for HTTP requests

use crate::{Error, HttpMethod, HttpRequest, HttpResponse};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed response future returned by handlers
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// A route handler function type
pub type HandlerFn = Arc<dyn Fn(HttpRequest) -> HandlerFuture + Send + Sync>;

/// Route definition with handler
#[derive(Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerFn,
}

/// Router for managing routes and dispatching requests
#[derive(Clone, Default)]
pub struct Router {
    pub routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Add a route to the router
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Register `handler` for `method` and `path` (builder style).
    pub fn on<F, Fut>(mut self, method: HttpMethod, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        let handler: HandlerFn = Arc::new(move |req| -> HandlerFuture { Box::pin(handler(req)) });
        self.add_route(Route {
            method,
            path: path.to_string(),
            handler,
        });
        self
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        self.on(HttpMethod::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        self.on(HttpMethod::POST, path, handler)
    }

    /// Dispatch a request to the first matching route.
    ///
    /// A query string left in `request.path` is split off into
    /// `raw_query` and `query_params` first.
    pub async fn route(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        if let Some((path, query)) = request.path.split_once('?') {
            let (path, query) = (path.to_string(), query.to_string());
            request.path = path;
            request.raw_query = Some(query);
        }

        if request.raw_query.is_some() {
            request.query_params = request.query_map();
        }

        let mut path_matched = false;

        for route in &self.routes {
            let Some(params) = match_path(&route.path, &request.path) else {
                continue;
            };
            path_matched = true;

            if !route.method.accepts(&request.method) {
                continue;
            }

            raidbot_log::trace!(target: "raidbot::router", "{} {} -> {}", request.method, request.path, route.path);
            request.path_params = params;
            return (route.handler)(request).await;
        }

        let description = format!("{} {}", request.method, request.path);
        if path_matched {
            Err(Error::MethodNotAllowed(description))
        } else {
            Err(Error::RouteNotFound(description))
        }
    }
}

/// Match a route path pattern against a request path
/// Returns Some(params) if matched, None otherwise
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pattern_part.strip_prefix(':') {
            let value = urlencoding::decode(path_part)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| path_part.to_string());
            params.insert(param_name.to_string(), value);
        } else if pattern_part != path_part {
            return None;
        }
    }

    Some(params)
}

/// Parse a query string into ordered, decoded pairs
pub(crate) fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_router() -> Router {
        Router::new()
            .get("/", |_req| async { Ok::<_, Error>(HttpResponse::text("home")) })
            .get("/users/:id", |req| async move {
                Ok::<_, Error>(HttpResponse::text(req.param("id").cloned().unwrap_or_default()))
            })
            .post("/set-language", |req| async move {
                Ok::<_, Error>(HttpResponse::text(req.query("from").cloned().unwrap_or_default()))
            })
    }

    #[test]
    fn test_match_path_static() {
        assert_eq!(match_path("/users", "/users").map(|p| p.len()), Some(0));
        assert!(match_path("/", "/").is_some());
    }

    #[test]
    fn test_match_path_with_param() {
        let params = match_path("/api/translations/:locale", "/api/translations/pt-BR").unwrap();
        assert_eq!(params.get("locale"), Some(&"pt-BR".to_string()));
    }

    #[test]
    fn test_match_path_no_match() {
        assert!(match_path("/users/:id", "/posts/123").is_none());
        assert!(match_path("/users/:id", "/users").is_none());
    }

    #[test]
    fn test_parse_query_pairs_keeps_order() {
        let pairs = parse_query_pairs("b=2&lang=ko&a=hello%20world");
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "2".to_string()),
                ("lang".to_string(), "ko".to_string()),
                ("a".to_string(), "hello world".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_route_dispatch_with_params() {
        let response = ok_router()
            .route(HttpRequest::new("GET", "/users/42"))
            .await
            .unwrap();
        assert_eq!(response.body_text(), "42");
    }

    #[tokio::test]
    async fn test_route_splits_query() {
        let response = ok_router()
            .route(HttpRequest::new("POST", "/set-language?from=nav&from=footer"))
            .await
            .unwrap();
        assert_eq!(response.body_text(), "nav");
    }

    #[tokio::test]
    async fn test_head_served_by_get() {
        let response = ok_router().route(HttpRequest::new("HEAD", "/")).await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_not_found_and_method_not_allowed() {
        let router = ok_router();

        let err = router.route(HttpRequest::new("GET", "/missing")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = router.route(HttpRequest::new("DELETE", "/")).await.unwrap_err();
        assert_eq!(err.status_code(), 405);
    }
}
