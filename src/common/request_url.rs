use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{HeaderMap, request::Parts},
};

/// Absolute URL of the current request, as the client addressed it.
///
/// Scheme and host honour `X-Forwarded-Proto` / `X-Forwarded-Host` so links
/// built behind a reverse proxy point at the public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    proto: String,
    host: String,
    path: String,
    query: Option<String>,
}

impl RequestUrl {
    #[must_use]
    pub fn new(headers: &HeaderMap, path: &str, query: Option<&str>) -> Self {
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http")
            .to_string();

        let host = headers
            .get("x-forwarded-host")
            .and_then(|v| v.to_str().ok())
            .or_else(|| headers.get("host").and_then(|v| v.to_str().ok()))
            .unwrap_or("localhost")
            .to_string();

        Self {
            proto,
            host,
            path: path.to_string(),
            query: query.map(str::to_string),
        }
    }

    /// Scheme, host and path without the query string.
    #[must_use]
    pub fn base(&self) -> String {
        format!("{}://{}{}", self.proto, self.host, self.path)
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl<S> FromRequestParts<S> for RequestUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped path; the original keeps the `/api` prefix.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.clone(), |original| original.0.clone());

        Ok(Self::new(&parts.headers, uri.path(), uri.query()))
    }
}
