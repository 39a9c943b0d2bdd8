//! Client identification utilities
//!
//! Resolves the identity a request is counted against.

use axum::extract::ConnectInfo;
use http::{HeaderMap, Request};
use std::net::{IpAddr, SocketAddr};

/// Identity used when no source yields an address
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

/// Client address resolved by an upstream layer
///
/// A trusted-proxy layer may insert this into the request extensions; it
/// takes precedence over the transport address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Extract the client identity from a request
///
/// First non-empty source wins:
/// 1. [`ClientIp`] extension
/// 2. transport peer address (`ConnectInfo<SocketAddr>`)
/// 3. first entry of `X-Forwarded-For`, trimmed
/// 4. [`FALLBACK_CLIENT_IP`]
pub fn extract_client_identity<B>(req: &Request<B>) -> String {
    let extensions = req.extensions();

    if let Some(ClientIp(ip)) = extensions.get::<ClientIp>() {
        return ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    first_forwarded_for(req.headers())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_CLIENT_IP.to_string())
}

/// First entry of the `X-Forwarded-For` chain, if non-empty
pub fn first_forwarded_for(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
}
