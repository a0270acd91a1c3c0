use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::auth::token::MAX_TOKEN_TTL_HOURS;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite://jotter.db?mode=rwc".into(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// Lifetime of an issued login token.
    pub token_ttl_hours: i64,
    /// Mark the `token` cookie `Secure` (serve over HTTPS only).
    pub secure_cookie: bool,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            token_ttl_hours: crate::auth::token::DEFAULT_TOKEN_TTL_HOURS,
            secure_cookie: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    pub database: Database,
    pub server: Server,
    pub auth: Auth,
    pub log: Log,
}

impl Settings {
    /// Load from defaults, an optional `config.toml`, `.env` and `JOTTER_*` variables.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::builder()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("JOTTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Load from defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let ttl = self.auth.token_ttl_hours;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&ttl) {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {ttl}"
            )));
        }
        Ok(self)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("auth.token_ttl_hours", defaults.auth.token_ttl_hours)?
            .set_default("auth.secure_cookie", defaults.auth.secure_cookie)?
            .set_default("log.filter", defaults.log.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.database.url, "sqlite://jotter.db?mode=rwc");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.address(), "127.0.0.1:8080");
        assert_eq!(settings.auth.token_ttl_hours, 24);
        assert!(!settings.auth.secure_cookie);
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_toml_overrides() {
        let settings = Settings::from_toml(
            r#"
            [database]
            url = "sqlite::memory:"

            [server]
            port = 9000

            [auth]
            token_ttl_hours = 1
            secure_cookie = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.address(), "127.0.0.1:9000");
        assert_eq!(settings.auth.token_ttl_hours, 1);
        assert!(settings.auth.secure_cookie);
    }

    #[test]
    fn test_token_ttl_must_be_in_range() {
        for ttl in ["0", "-5", "10000000000"] {
            let err = Settings::from_toml(&format!("[auth]\ntoken_ttl_hours = {ttl}"))
                .unwrap_err();
            assert!(err.to_string().contains("token_ttl_hours"), "{ttl}: {err}");
        }

        let max = format!("[auth]\ntoken_ttl_hours = {MAX_TOKEN_TTL_HOURS}");
        assert_eq!(
            Settings::from_toml(&max).unwrap().auth.token_ttl_hours,
            MAX_TOKEN_TTL_HOURS
        );
    }
}
