use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Fixed-window throttle settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Limits per throttle scope. `auth` covers login, register and Google
/// sign-in; `anon` and `user` apply to every API route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub auth: RateLimitConfig,
    pub anon: RateLimitConfig,
    pub user: RateLimitConfig,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub google_client_id: String,
    pub media_root: PathBuf,
    pub media_url: String,
    pub avatar_max_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limits: RateLimits,
    /// Peers allowed to set `X-Real-IP` / `X-Forwarded-For`.
    pub trusted_proxies: Vec<IpAddr>,
}

/// Loads `.env.{RUST_ENV}` and falls back to `.env`.
pub fn load_env_files() {
    let environment = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", environment);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let environment = lookup("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let port = parse_or(&lookup, "PORT", 8000u16)?;
        let avatar_max_bytes = parse_or(&lookup, "AVATAR_MAX_BYTES", 5 * 1024 * 1024usize)?;
        let rate_limits = RateLimits {
            auth: rate_limit_or(
                &lookup,
                ("AUTH_RATE_LIMIT_REQUESTS", "AUTH_RATE_LIMIT_WINDOW_SECS"),
                (5, 60),
            )?,
            anon: rate_limit_or(
                &lookup,
                ("ANON_RATE_LIMIT_REQUESTS", "ANON_RATE_LIMIT_WINDOW_SECS"),
                (100, 3600),
            )?,
            user: rate_limit_or(
                &lookup,
                ("USER_RATE_LIMIT_REQUESTS", "USER_RATE_LIMIT_WINDOW_SECS"),
                (1000, 3600),
            )?,
        };

        let trusted_proxies = match lookup("TRUSTED_PROXIES") {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| {
                    p.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                        key: "TRUSTED_PROXIES",
                        value: p.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            media_root: PathBuf::from(lookup("MEDIA_ROOT").unwrap_or_else(|| "media".to_string())),
            media_url: lookup("MEDIA_URL")
                .unwrap_or_else(|| "/media".to_string())
                .trim_end_matches('/')
                .to_string(),
            avatar_max_bytes,
            cors_allowed_origins,
            rate_limits,
            trusted_proxies,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn rate_limit_or<F>(
    lookup: &F,
    (requests_key, window_key): (&'static str, &'static str),
    (max_requests, window_secs): (u32, u64),
) -> Result<RateLimitConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = RateLimitConfig {
        max_requests: parse_or(lookup, requests_key, max_requests)?,
        window_secs: parse_or(lookup, window_key, window_secs)?,
    };
    if config.max_requests == 0 {
        return Err(ConfigError::Invalid {
            key: requests_key,
            value: "0".to_string(),
        });
    }
    if config.window_secs == 0 {
        return Err(ConfigError::Invalid {
            key: window_key,
            value: "0".to_string(),
        });
    }
    Ok(config)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
