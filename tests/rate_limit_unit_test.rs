//! Unit tests for the rate limiter's per-client key.
//!
//! Run with: cargo test --test rate_limit_unit_test

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{body::Body, extract::ConnectInfo, http::Request};
use tower_governor::key_extractor::KeyExtractor;

use bikeshare_api::services::rate_limit::ClientIpKeyExtractor;

fn request(headers: &[(&str, &str)], peer: Option<[u8; 4]>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/trips/summary");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let mut request = builder.body(Body::empty()).unwrap();
    if let Some(octets) = peer {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((octets, 51234))));
    }
    request
}

fn key(request: &Request<Body>) -> IpAddr {
    ClientIpKeyExtractor.extract(request).unwrap()
}

#[test]
fn socket_peer_is_the_key_without_proxy_headers() {
    let alice = request(&[], Some([203, 0, 113, 7]));
    let bob = request(&[], Some([198, 51, 100, 20]));

    assert_eq!(key(&alice), IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)));
    assert_ne!(key(&alice), key(&bob));
}

#[test]
fn forwarded_for_wins_over_socket_peer() {
    let request = request(
        &[("x-forwarded-for", "192.0.2.44, 10.0.0.2")],
        Some([10, 0, 0, 2]),
    );

    assert_eq!(key(&request), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 44)));
}

#[test]
fn real_ip_is_used_when_forwarded_for_is_unusable() {
    let request = request(
        &[("x-forwarded-for", "unknown"), ("x-real-ip", "192.0.2.9")],
        Some([10, 0, 0, 2]),
    );

    assert_eq!(key(&request), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 9)));
}

#[test]
fn no_address_at_all_shares_the_loopback_key() {
    assert_eq!(key(&request(&[], None)), IpAddr::V4(Ipv4Addr::LOCALHOST));
}
