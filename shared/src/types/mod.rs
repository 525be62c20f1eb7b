pub mod auth;
pub mod claims;
pub mod json_error;
pub mod server_config;

pub use self::auth::{AuthError, AuthSuccess, LoginData, PublicUser, RegisterData, StatsResponse};
pub use self::claims::TokenClaims;
pub use self::json_error::ErrorResponse;
pub use self::server_config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
