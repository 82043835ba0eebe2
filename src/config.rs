//! Environment-driven configuration

use std::path::PathBuf;

/// The pre-seeded, non-deletable administrator account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub access_expires: String,
}

impl Default for BootstrapAdmin {
    fn default() -> Self {
        Self {
            username: "Kvv".into(),
            password: "Kvv08072001".into(),
            access_expires: "2099-12-31".into(),
        }
    }
}

/// Server configuration, read from the environment with defaults
/// matching the original deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub bootstrap: BootstrapAdmin,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".into())
            .into();

        let defaults = BootstrapAdmin::default();
        let bootstrap = BootstrapAdmin {
            username: std::env::var("BOOTSTRAP_ADMIN_USER").unwrap_or(defaults.username),
            password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or(defaults.password),
            access_expires: defaults.access_expires,
        };

        Self {
            host,
            port,
            data_dir,
            bootstrap,
        }
    }
}
