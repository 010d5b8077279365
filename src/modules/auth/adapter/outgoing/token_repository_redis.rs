use crate::auth::application::ports::outgoing::token_repository::{
    TokenRepository, TokenRepositoryError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{redis::AsyncCommands, Pool};

use std::sync::Arc;

use uuid::Uuid;

/// Keeps blacklisted entries alive past `exp` while verification leeway could
/// still accept the token.
const LEEWAY_SECS: i64 = 60;

/// Redis-backed refresh-token blacklist.
///
/// ```text
/// auth:blacklist:token:{token_hash} -> "{user_id}"   (TTL = remaining lifetime)
/// auth:blacklist:user:{user_id}     -> SET(token_hash)
/// ```
///
/// The per-token key is authoritative; the per-user set only exists so an
/// operator can see what a user has revoked. Redis TTL does the cleanup.
#[derive(Clone)]
pub struct RedisTokenRepository {
    pool: Arc<Pool>,
}

impl RedisTokenRepository {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn token_key(token_hash: &str) -> String {
        format!("auth:blacklist:token:{token_hash}")
    }

    fn user_key(user_id: Uuid) -> String {
        format!("auth:blacklist:user:{user_id}")
    }

    fn ttl_for(expires_at: DateTime<Utc>) -> i64 {
        (expires_at - Utc::now()).num_seconds().max(0) + LEEWAY_SECS
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, TokenRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|e| TokenRepositoryError::DatabaseError(format!("Pool error: {}", e)))
    }
}

#[async_trait]
impl TokenRepository for RedisTokenRepository {
    /// SET + EXPIRE on the token key and SADD + EXPIRE on the user index,
    /// in one MULTI/EXEC.
    async fn blacklist_token(
        &self,
        token_hash: String,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenRepositoryError> {
        let ttl = Self::ttl_for(expires_at);
        let token_key = Self::token_key(&token_hash);
        let user_key = Self::user_key(user_id);

        let mut conn = self.get_conn().await?;

        deadpool_redis::redis::pipe()
            .atomic()
            .set_ex(&token_key, user_id.to_string(), ttl as u64)
            .ignore()
            .sadd(&user_key, &token_hash)
            .ignore()
            .expire(&user_key, ttl)
            .ignore()
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenRepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(%user_id, ttl, "Refresh token blacklisted");
        Ok(())
    }

    /// `SET NX EX` on the token key decides the winner; only the winner
    /// touches the user index.
    async fn blacklist_if_absent(
        &self,
        token_hash: String,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, TokenRepositoryError> {
        let ttl = Self::ttl_for(expires_at);
        let token_key = Self::token_key(&token_hash);
        let user_key = Self::user_key(user_id);

        let mut conn = self.get_conn().await?;

        let claimed: Option<String> = deadpool_redis::redis::cmd("SET")
            .arg(&token_key)
            .arg(user_id.to_string())
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut *conn)
            .await
            .map_err(|e| TokenRepositoryError::DatabaseError(e.to_string()))?;

        if claimed.is_none() {
            return Ok(false);
        }

        deadpool_redis::redis::pipe()
            .atomic()
            .sadd(&user_key, &token_hash)
            .ignore()
            .expire(&user_key, ttl)
            .ignore()
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenRepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(%user_id, ttl, "Refresh token claimed");
        Ok(true)
    }

    async fn is_token_blacklisted(&self, token_hash: &str) -> Result<bool, TokenRepositoryError> {
        let key = Self::token_key(token_hash);
        let mut conn = self.get_conn().await?;

        conn.exists(key)
            .await
            .map_err(|e| TokenRepositoryError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::RedisTokenRepository;
    use crate::auth::application::ports::outgoing::token_repository::TokenRepository;
    use chrono::{Duration, Utc};
    use std::sync::Once;
    use uuid::Uuid;

    static TLS_INIT: Once = Once::new();

    fn init_tls() {
        TLS_INIT.call_once(|| {
            let _ = rustls::crypto::ring::default_provider().install_default();
        });
    }

    fn setup_repo() -> Option<RedisTokenRepository> {
        init_tls();
        let redis_url = match std::env::var("REDIS_URL") {
            Ok(v) => v,
            Err(_) => {
                eprintln!("REDIS_URL not set; skipping Redis integration test");
                return None;
            }
        };

        let redis_pool = deadpool_redis::Config::from_url(&redis_url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("Failed to create Redis pool");

        Some(RedisTokenRepository::new(std::sync::Arc::new(redis_pool)))
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            RedisTokenRepository::token_key("abc"),
            "auth:blacklist:token:abc"
        );
        let user_id = Uuid::nil();
        assert_eq!(
            RedisTokenRepository::user_key(user_id),
            format!("auth:blacklist:user:{user_id}")
        );
    }

    #[test]
    fn ttl_covers_remaining_lifetime_plus_leeway() {
        let ttl = RedisTokenRepository::ttl_for(Utc::now() + Duration::seconds(600));
        assert!((659..=660).contains(&ttl), "ttl was {ttl}");

        let already_expired = RedisTokenRepository::ttl_for(Utc::now() - Duration::seconds(5));
        assert_eq!(already_expired, 60);
    }

    #[tokio::test]
    async fn blacklisted_token_is_reported() {
        let Some(repo) = setup_repo() else { return };
        let token = format!("hash-{}", Uuid::new_v4());

        assert!(!repo.is_token_blacklisted(&token).await.unwrap());

        repo.blacklist_token(token.clone(), Uuid::new_v4(), Utc::now() + Duration::seconds(30))
            .await
            .unwrap();

        assert!(repo.is_token_blacklisted(&token).await.unwrap());
    }

    #[tokio::test]
    async fn blacklisting_twice_is_idempotent() {
        let Some(repo) = setup_repo() else { return };
        let token = format!("hash-{}", Uuid::new_v4());
        let user_id = Uuid::new_v4();

        for _ in 0..2 {
            repo.blacklist_token(token.clone(), user_id, Utc::now() + Duration::seconds(30))
                .await
                .unwrap();
        }

        assert!(repo.is_token_blacklisted(&token).await.unwrap());
    }

    #[tokio::test]
    async fn only_the_first_claim_wins() {
        let Some(repo) = setup_repo() else { return };
        let token = format!("hash-{}", Uuid::new_v4());
        let user_id = Uuid::new_v4();
        let exp = Utc::now() + Duration::seconds(30);

        let (a, b) = tokio::join!(
            repo.blacklist_if_absent(token.clone(), user_id, exp),
            repo.blacklist_if_absent(token.clone(), user_id, exp)
        );

        assert_ne!(a.unwrap(), b.unwrap());
        assert!(repo.is_token_blacklisted(&token).await.unwrap());
    }
}
