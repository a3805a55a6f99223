// Application bootstrapper and HTTP server

use crate::{Error, HttpRequest, HttpResponse, Router};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use raidbot_log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The site application: a router served over HTTP/1.1.
pub struct Application {
    pub router: Arc<Router>,
}

impl Application {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Bind `addr` and serve until the process stops.
    pub async fn listen(self, addr: SocketAddr) -> Result<(), Error> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on http://{}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Error> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = self.router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<IncomingBody>| {
                    let router = router.clone();
                    async move { handle_request(req, router).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Connection from {} closed with error: {}", peer, err);
                }
            });
        }
    }

    /// Route a request without going through the network.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        respond(&self.router, request).await
    }
}

/// Route a request, turning routing and handler errors into JSON responses.
pub async fn respond(router: &Router, request: HttpRequest) -> HttpResponse {
    let method = request.method.clone();
    let path = request.path.clone();

    match router.route(request).await {
        Ok(response) => response,
        Err(err) => {
            let status = err.status_code();
            if err.is_server_error() {
                error!("{} {} failed: {}", method, path, err);
            } else {
                debug!("{} {} -> {}: {}", method, path, status, err);
            }
            let body = serde_json::json!({
                "error": err.to_string(),
                "status": status,
            });
            HttpResponse::new(status)
                .with_json(&body)
                .unwrap_or_else(|_| HttpResponse::internal_server_error())
        }
    }
}

/// Handle an incoming HTTP request
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let mut site_req = HttpRequest::new(method, path);
    site_req.raw_query = req.uri().query().map(str::to_string);

    for (name, value) in req.headers() {
        if let Ok(value_str) = value.to_str() {
            site_req
                .headers
                .insert(name.to_string(), value_str.to_string());
        }
    }

    let head_only = req.method() == hyper::Method::HEAD;
    site_req.body = req.collect().await?.to_bytes().to_vec();

    let response = respond(&router, site_req).await;

    let mut builder = Response::builder().status(response.status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let body = if head_only {
        Bytes::new()
    } else {
        Bytes::from(response.body)
    };

    Ok(builder.body(Full::new(body)).unwrap_or_else(|err| {
        error!("Invalid response head: {}", err);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_maps_errors_to_json() {
        let app = Application::new(Router::new());
        let response = app.dispatch(HttpRequest::new("GET", "/nowhere")).await;

        assert_eq!(response.status, 404);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_dispatch_passes_through_success() {
        let router = Router::new().get("/health", |_req| async { Ok::<_, Error>(HttpResponse::text("ok")) });
        let app = Application::new(router);
        let response = app.dispatch(HttpRequest::new("GET", "/health")).await;
        assert_eq!(response.body_text(), "ok");
    }
}
