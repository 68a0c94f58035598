use axum::http::{HeaderMap, Request};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_governor::{GovernorError, key_extractor::KeyExtractor};

/// Per-client key for the rate limiter.
///
/// Proxy headers win over the socket address, since behind a load balancer
/// every connection comes from the proxy. Requests with no usable address
/// share one loopback bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor;

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    // X-Forwarded-For lists the originating client first
    value.split(',').next()?.trim().parse().ok()
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let peer = || {
            req.extensions()
                .get::<axum::extract::ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip())
        };

        Ok(header_ip(headers, "x-forwarded-for")
            .or_else(|| header_ip(headers, "x-real-ip"))
            .or_else(peer)
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}
