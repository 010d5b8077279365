pub mod avatar_storage_local;
pub mod google_id_token_verifier;
pub mod jwt;
pub mod sea_orm_entity;
pub mod security;
pub mod token_repository_redis;
pub mod user_query_postgres;
pub mod user_repository_postgres;
