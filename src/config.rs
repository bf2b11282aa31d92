// src/config.rs

use std::env;

use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Lifetime of access tokens, in seconds.
    pub jwt_expiration: u64,
    /// Lifetime of e-mail verification tokens, in seconds.
    pub verification_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Externally reachable base URL, used to build verification links.
    pub public_url: Url,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse()
            .expect("PUBLIC_URL must be a valid URL");

        Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 24 * 60 * 60),
            verification_expiration: parse_or("VERIFICATION_EXPIRATION", 15 * 60),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            port: parse_or("PORT", 3000),
            public_url,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    parse_value(key, env::var(key).ok(), default)
}

/// Unset falls back to `default`; a value that is set but unparsable is fatal.
fn parse_value<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a valid value, got {:?}", key, raw)),
        None => default,
    }
}
