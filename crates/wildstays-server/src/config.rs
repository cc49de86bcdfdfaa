use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub max_image_bytes: usize,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("WILDSTAYS_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("WILDSTAYS_JWT_SECRET is unset or still a placeholder");
        }

        let port = var("WILDSTAYS_PORT", "3000")
            .parse()
            .context("WILDSTAYS_PORT must be a port number")?;
        let max_image_bytes = var("WILDSTAYS_MAX_IMAGE_MB", "10")
            .parse::<usize>()
            .ok()
            .and_then(|mb| mb.checked_mul(1024 * 1024))
            .context("WILDSTAYS_MAX_IMAGE_MB must be a whole number of megabytes")?;

        Ok(Self {
            host: var("WILDSTAYS_HOST", "0.0.0.0"),
            port,
            db_path: var("WILDSTAYS_DB_PATH", "wildstays.db").into(),
            upload_dir: var("WILDSTAYS_UPLOAD_DIR", "./uploads").into(),
            max_image_bytes,
            jwt_secret,
        })
    }
}
