use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{self, uri::Uri};
use axum::middleware::Next;
use axum::response::Response;
use tower::{Layer, Service};
use tracing::info;

/// Middleware added with `Router::layer` runs after route matching, so a
/// URI rewrite has to wrap the whole router. `server::build_app` applies
/// this layer around the router's output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizePathLayer;

impl<S> Layer<S> for NormalizePathLayer {
    type Service = NormalizePath<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NormalizePath { inner }
    }
}

/// Collapses duplicate slashes so `//votes` routes like `/votes`.
#[derive(Clone, Debug)]
pub struct NormalizePath<S> {
    inner: S,
}

impl<S, B> Service<http::Request<B>> for NormalizePath<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        collapse_duplicate_slashes(&mut req);
        self.inner.call(req)
    }
}

fn collapse_duplicate_slashes<B>(req: &mut http::Request<B>) {
    let uri = req.uri();
    let path = uri.path();

    let mut normalized = path.to_string();

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    if normalized == path {
        return;
    }

    let mut parts = uri.clone().into_parts();
    let new_path_and_query = if let Some(query) = uri.query() {
        format!("{}?{}", normalized, query)
    } else {
        normalized
    };

    if let Ok(new_uri) = new_path_and_query.parse::<Uri>() {
        parts.path_and_query = new_uri.into_parts().path_and_query;
        if let Ok(new_uri) = Uri::from_parts(parts) {
            *req.uri_mut() = new_uri;
        }
    }
}

pub async fn log_request(req: http::Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}
