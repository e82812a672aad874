//! Process configuration read from the environment.

use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// JSON fixture of matches and rosters loaded into the in-memory registry.
    pub registry_path: Option<PathBuf>,
    pub allow_consecutive_overs: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CREASE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("CREASE_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("CREASE_PORT must be a port number, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };
        let jwt_secret = lookup("CREASE_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::config("CREASE_JWT_SECRET must be set"))?;
        let registry_path = lookup("CREASE_REGISTRY_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let allow_consecutive_overs = match lookup("CREASE_ALLOW_CONSECUTIVE_OVERS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::config(format!(
                    "CREASE_ALLOW_CONSECUTIVE_OVERS must be true or false, got {raw:?}"
                ))
            })?,
            None => false,
        };
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            jwt_secret,
            registry_path,
            allow_consecutive_overs,
            cors_allowed_origins,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
