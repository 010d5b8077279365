use std::fmt;

/// Attributes of the account the password is compared against.
#[derive(Debug, Clone, Default)]
pub struct PasswordContext<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

pub trait PasswordPolicy: Send + Sync {
    /// Returns every rule the password breaks, not just the first one.
    fn validate(
        &self,
        password: &str,
        context: &PasswordContext<'_>,
    ) -> Result<(), Vec<PasswordPolicyError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    TooShort { min: usize },
    EntirelyNumeric,
    TooCommon,
    TooSimilar { attribute: &'static str },
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordPolicyError::TooShort { min } => write!(
                f,
                "This password is too short. It must contain at least {} characters.",
                min
            ),
            PasswordPolicyError::EntirelyNumeric => {
                write!(f, "This password is entirely numeric.")
            }
            PasswordPolicyError::TooCommon => write!(f, "This password is too common."),
            PasswordPolicyError::TooSimilar { attribute } => {
                write!(f, "The password is too similar to the {}.", attribute)
            }
        }
    }
}
