//! Fixed-window rate limiting for the login and registration routes

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::ServerState;
use crate::security_log;

const WINDOW: Duration = Duration::from_secs(60);
const STALE_AFTER: Duration = Duration::from_secs(300);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed. `max_requests == 0` disables the limit.
    pub async fn check(&self, route: &'static str, ip: &str, max_requests: u32) -> bool {
        if max_requests == 0 {
            return true;
        }

        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= WINDOW {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Drop entries whose window started more than 5 minutes ago
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < STALE_AFTER);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Client IP: the peer address, or the first X-Forwarded-For entry when
/// the deployment sits behind a trusted proxy
fn extract_ip(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    state: &ServerState,
    route: &'static str,
    max_requests: u32,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.config.trust_forwarded_for);
    if !state.rate_limiter.check(route, &ip, max_requests).await {
        security_log!("WARN", "rate_limited", route = route, ip = ip.as_str());
        return Err(AppError::rate_limited());
    }
    Ok(next.run(request).await)
}

/// `POST /token`
pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let max = state.config.login_rate_limit;
    limit(&state, "login", max, request, next).await
}

/// `POST /register`
pub async fn register_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let max = state.config.register_rate_limit;
    limit(&state, "register", max, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(forwarded_for: Option<&str>, peer: Option<SocketAddr>) -> Request {
        let mut builder = Request::builder().uri("/token");
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            request.extensions_mut().insert(ConnectInfo(peer));
        }
        request
    }

    #[test]
    fn test_forwarded_for_ignored_by_default() {
        let peer: SocketAddr = "192.0.2.7:5555".parse().unwrap();
        let spoofed = request(Some("203.0.113.1"), Some(peer));
        assert_eq!(extract_ip(&spoofed, false), "192.0.2.7");

        let no_peer = request(Some("203.0.113.1"), None);
        assert_eq!(extract_ip(&no_peer, false), "unknown");
    }

    #[test]
    fn test_forwarded_for_when_trusted() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let proxied = request(Some(" 203.0.113.1 , 10.0.0.9"), Some(peer));
        assert_eq!(extract_ip(&proxied, true), "203.0.113.1");

        // falls back to the peer when the header is absent
        assert_eq!(extract_ip(&request(None, Some(peer)), true), "10.0.0.9");
    }

    #[tokio::test]
    async fn test_limit_per_ip_and_route() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("login", "10.0.0.1", 3).await);
        }
        assert!(!limiter.check("login", "10.0.0.1", 3).await);
        // other IP and other route have their own windows
        assert!(limiter.check("login", "10.0.0.2", 3).await);
        assert!(limiter.check("register", "10.0.0.1", 3).await);
    }

    #[tokio::test]
    async fn test_zero_disables() {
        let limiter = RateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.check("login", "10.0.0.1", 0).await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("login", "10.0.0.1", 1).await);
        assert!(!limiter.check("login", "10.0.0.1", 1).await);
        tokio::time::advance(WINDOW).await;
        assert!(limiter.check("login", "10.0.0.1", 1).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new();
        limiter.check("login", "10.0.0.1", 5).await;
        tokio::time::advance(STALE_AFTER).await;
        limiter.cleanup().await;
        assert!(limiter.inner.lock().await.is_empty());
    }
}
