use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for every environment variable read into [`Config`].
pub const ENV_PREFIX: &str = "WARDEN_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// SQLite file holding the `users` table.
    pub database_path: PathBuf,
    /// Append-only log file.
    pub log_path: PathBuf,
    pub loglevel: String,
    /// Optional account promoted to admin at start-up when no admin exists yet.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/app.sqlite3"),
            log_path: PathBuf::from("logs/app.log"),
            loglevel: "info".to_string(),
            admin_username: None,
            admin_password: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `WARDEN_*` environment variables.
    pub fn from_env() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    /// The bootstrap admin pair, only when both halves are set and non-empty.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => Some((u.trim(), p)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_env() {
        Jail::expect_with(|_jail| {
            let cfg = Config::from_env()?;
            assert_eq!(cfg, Config::default());
            assert!(cfg.bootstrap_admin().is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("WARDEN_DATABASE_PATH", "/tmp/other.sqlite3");
            jail.set_env("WARDEN_LOGLEVEL", "debug");
            jail.set_env("WARDEN_ADMIN_USERNAME", "root");
            jail.set_env("WARDEN_ADMIN_PASSWORD", "s3cret");

            let cfg = Config::from_env()?;
            assert_eq!(cfg.database_path, PathBuf::from("/tmp/other.sqlite3"));
            assert_eq!(cfg.loglevel, "debug");
            assert_eq!(cfg.log_path, PathBuf::from("logs/app.log"));
            assert_eq!(cfg.bootstrap_admin(), Some(("root", "s3cret")));
            Ok(())
        });
    }

    #[test]
    fn half_configured_admin_is_ignored() {
        let cfg = Config {
            admin_username: Some("root".to_string()),
            ..Config::default()
        };
        assert!(cfg.bootstrap_admin().is_none());
    }
}
