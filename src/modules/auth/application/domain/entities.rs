use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the account was first created. Google accounts never get a usable
/// password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMethod {
    Email,
    Google,
}

impl RegistrationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationMethod::Email => "email",
            RegistrationMethod::Google => "google",
        }
    }
}

impl fmt::Display for RegistrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(RegistrationMethod::Email),
            "google" => Ok(RegistrationMethod::Google),
            other => Err(format!("unknown registration method: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub registration_method: RegistrationMethod,
    pub is_premium: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub avatar_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(password_hash: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "".into(),
            password_hash: password_hash.map(String::from),
            registration_method: RegistrationMethod::Email,
            is_premium: false,
            is_active: true,
            is_staff: false,
            avatar_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn registration_method_round_trips_through_str() {
        for method in [RegistrationMethod::Email, RegistrationMethod::Google] {
            assert_eq!(method.as_str().parse::<RegistrationMethod>(), Ok(method));
        }
        assert!("facebook".parse::<RegistrationMethod>().is_err());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user(Some("$argon2id$..."))).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["registration_method"], "email");
    }

    #[test]
    fn google_user_has_no_usable_password() {
        assert!(!user(None).has_usable_password());
        assert_eq!(user(None).full_name(), "Ada");
    }
}
