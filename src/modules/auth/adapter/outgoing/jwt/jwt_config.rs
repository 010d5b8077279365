use std::env;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum JwtConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,

    #[error("JWT_SECRET must be at least 32 characters long for HS256")]
    SecretTooShort,

    #[error("Invalid {0} value")]
    InvalidExpiry(&'static str),

    #[error("JWT_REFRESH_EXPIRY must be greater than JWT_ACCESS_EXPIRY")]
    RefreshNotLongerThanAccess,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    pub access_token_expiry: i64,  // Expiration in seconds
    pub refresh_token_expiry: i64, // Expiration in seconds
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, JwtConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, JwtConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("JWT_SECRET").ok_or(JwtConfigError::MissingSecret)?;
        if secret_key.len() < 32 {
            return Err(JwtConfigError::SecretTooShort);
        }

        // 60 minutes access, 30 days refresh
        let access_token_expiry = parse_expiry(&lookup, "JWT_ACCESS_EXPIRY", 3600)?;
        let refresh_token_expiry = parse_expiry(&lookup, "JWT_REFRESH_EXPIRY", 30 * 24 * 3600)?;

        if access_token_expiry <= 0 || access_token_expiry > 86400 {
            return Err(JwtConfigError::InvalidExpiry("JWT_ACCESS_EXPIRY"));
        }
        if refresh_token_expiry <= access_token_expiry {
            return Err(JwtConfigError::RefreshNotLongerThanAccess);
        }

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| "cv-builder".to_string());

        Ok(Self {
            secret_key,
            issuer,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

fn parse_expiry<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, JwtConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| JwtConfigError::InvalidExpiry(key)),
    }
}
