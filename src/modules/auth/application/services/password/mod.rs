mod common_passwords;
pub mod default_password_policy;

pub use default_password_policy::DefaultPasswordPolicy;
