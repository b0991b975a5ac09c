pub mod blacklist;
pub mod refresh_token;
pub mod user;

pub use blacklist::PostgresAccessTokenBlacklist;
pub use refresh_token::PostgresRefreshTokenRepository;
pub use user::PostgresUserRepository;
