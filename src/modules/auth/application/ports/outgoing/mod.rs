pub mod avatar_storage;
pub mod google_token_verifier;
pub mod password_hasher;
pub mod token_provider;
pub mod token_repository;
pub mod user_query;
pub mod user_repository;

pub use avatar_storage::{AvatarStorage, AvatarStorageError};
pub use google_token_verifier::{GoogleIdentity, GoogleTokenError, GoogleTokenVerifier};
pub use password_hasher::{HashError, PasswordHasher};
pub use token_provider::{TokenClaims, TokenError, TokenPair, TokenProvider};
pub use token_repository::{TokenRepository, TokenRepositoryError};
pub use user_query::{UserQuery, UserQueryError};
pub use user_repository::{CreateUserData, UpdateProfileData, UserRepository, UserRepositoryError};
