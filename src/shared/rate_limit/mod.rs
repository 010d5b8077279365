pub mod middleware;
pub mod redis_rate_limiter;

use std::net::IpAddr;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use tracing::{error, warn};

use crate::shared::api::ApiResponse;

pub use middleware::throttle_requests;
pub use redis_rate_limiter::RedisRateLimiter;

/// Every API request without a valid access token, keyed by address.
pub const ANON_SCOPE: &str = "anon";
/// Every API request with a valid access token, keyed by user id.
pub const USER_SCOPE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limit backend error: {0}")]
    Backend(String),
}

/// Counts hits per `(scope, client)` inside a fixed window.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn hit(&self, scope: &str, client: &str) -> Result<RateLimitDecision, RateLimitError>;
}

/// Address to throttle on. The socket peer, unless the peer is a trusted
/// proxy, in which case the address it forwarded.
pub fn client_ip(req: &HttpRequest, trusted_proxies: &[IpAddr]) -> String {
    let peer = req.peer_addr().map(|addr| addr.ip());

    match peer {
        Some(ip) if trusted_proxies.contains(&ip) => forwarded_ip(req, trusted_proxies)
            .unwrap_or(ip)
            .to_string(),
        Some(ip) => ip.to_string(),
        None => "unknown".to_string(),
    }
}

/// `X-Real-IP`, else the right-most `X-Forwarded-For` hop that is not one of
/// our proxies. Entries further left are whatever the client sent.
fn forwarded_ip(req: &HttpRequest, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    let header = |name: &str| req.headers().get(name).and_then(|h| h.to_str().ok());

    if let Some(ip) = header("x-real-ip").and_then(|v| v.trim().parse().ok()) {
        return Some(ip);
    }

    header("x-forwarded-for")?
        .rsplit(',')
        .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
        .find(|ip| !trusted_proxies.contains(ip))
}

/// A limiter plus what is needed to key anonymous callers.
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<dyn RateLimiter + Send + Sync>,
    trusted_proxies: Arc<[IpAddr]>,
}

impl Throttle {
    pub fn new(limiter: Arc<dyn RateLimiter + Send + Sync>, trusted_proxies: Vec<IpAddr>) -> Self {
        Self {
            limiter,
            trusted_proxies: trusted_proxies.into(),
        }
    }

    pub fn client_ip(&self, req: &HttpRequest) -> String {
        client_ip(req, &self.trusted_proxies)
    }

    /// Per-address limit for `scope`.
    pub async fn enforce(&self, scope: &str, req: &HttpRequest) -> Result<(), HttpResponse> {
        let client = self.client_ip(req);
        self.check(scope, &client).await
    }

    /// Returns the 429 response to send when `client` is over the limit.
    ///
    /// A failing backend lets the request through: throttling is not worth an
    /// outage of the API.
    pub async fn check(&self, scope: &str, client: &str) -> Result<(), HttpResponse> {
        match self.limiter.hit(scope, client).await {
            Ok(RateLimitDecision::Allowed) => Ok(()),
            Ok(RateLimitDecision::Limited { retry_after_secs }) => {
                warn!(scope, client = %client, "Request throttled");
                Err(ApiResponse::too_many_requests(&format!(
                    "Too many requests, retry in {} seconds",
                    retry_after_secs
                )))
            }
            Err(e) => {
                error!(scope, error = %e, "Rate limiter unavailable");
                Ok(())
            }
        }
    }
}
