//! Process configuration read from the environment.
//!
//! Every setting has a default. Unparseable values fall back to the default
//! with a warning; insecure development defaults for secrets also warn.

use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 480;
const DEV_JWT_SECRET: &str = "dev-secret";
const DEV_ADMIN_USERNAME: &str = "admin";
const DEV_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Whether dispatch moves the driver to IN_TRANSIT along with the vehicle.
    pub lease_driver: bool,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parsed_or(&lookup, "BIND_ADDR", default_bind_addr());
        let token_ttl_minutes =
            match parsed_or(&lookup, "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES) {
                ttl if ttl > 0 => ttl,
                ttl => {
                    tracing::warn!(ttl, "TOKEN_TTL_MINUTES must be positive; using default");
                    DEFAULT_TOKEN_TTL_MINUTES
                }
            };
        let lease_driver = lookup("MARKETERP_LEASE_DRIVER")
            .map(|raw| match parse_flag(&raw) {
                Some(flag) => flag,
                None => {
                    tracing::warn!(value = %raw, "MARKETERP_LEASE_DRIVER is not a boolean; using default");
                    true
                }
            })
            .unwrap_or(true);

        Self {
            bind_addr,
            jwt_secret: secret_or(&lookup, "JWT_SECRET", DEV_JWT_SECRET),
            token_ttl_minutes,
            lease_driver,
            admin_username: secret_or(&lookup, "ADMIN_USERNAME", DEV_ADMIN_USERNAME),
            admin_password: secret_or(&lookup, "ADMIN_PASSWORD", DEV_ADMIN_PASSWORD),
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable setting; using default");
            default
        }),
    }
}

fn secret_or<F>(lookup: &F, key: &str, dev_default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value,
        None => {
            tracing::warn!(key, "not set; using insecure dev default");
            dev_default.to_string()
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
