use std::sync::Arc;

use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};

use super::{RateLimitDecision, RateLimitError, RateLimiter, ANON_SCOPE, USER_SCOPE};
use crate::shared::config::{RateLimitConfig, RateLimits};

/// Fixed-window counter stored in Redis.
///
/// ```text
/// throttle:{scope}:{client} -> INCR, EXPIRE <window> on first hit
/// ```
///
/// The global scopes use their own limits; every other scope is an auth
/// endpoint.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Arc<Pool>,
    limits: RateLimits,
}

impl RedisRateLimiter {
    pub fn new(pool: Arc<Pool>, limits: RateLimits) -> Self {
        Self { pool, limits }
    }

    fn limit_for(&self, scope: &str) -> RateLimitConfig {
        match scope {
            ANON_SCOPE => self.limits.anon,
            USER_SCOPE => self.limits.user,
            _ => self.limits.auth,
        }
    }

    fn key(scope: &str, client: &str) -> String {
        format!("throttle:{scope}:{client}")
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn hit(&self, scope: &str, client: &str) -> Result<RateLimitDecision, RateLimitError> {
        let key = Self::key(scope, client);
        let config = self.limit_for(scope);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RateLimitError::Backend(format!("Pool error: {}", e)))?;

        let count: u64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        if count == 1 {
            let _: () = conn
                .expire(&key, config.window_secs as i64)
                .await
                .map_err(|e| RateLimitError::Backend(e.to_string()))?;
        }

        if count > u64::from(config.max_requests) {
            let ttl: i64 = conn
                .ttl(&key)
                .await
                .map_err(|e| RateLimitError::Backend(e.to_string()))?;

            // -1 means the EXPIRE never landed; re-arm so the key can't stick forever
            if ttl < 0 {
                let _: () = conn
                    .expire(&key, config.window_secs as i64)
                    .await
                    .map_err(|e| RateLimitError::Backend(e.to_string()))?;
            }

            return Ok(RateLimitDecision::Limited {
                retry_after_secs: if ttl > 0 {
                    ttl as u64
                } else {
                    config.window_secs
                },
            });
        }

        Ok(RateLimitDecision::Allowed)
    }
}
