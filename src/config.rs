use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("PORT").ok(),
        )
    }

    fn from_vars(database_url: Option<String>, port: Option<String>) -> Result<Self> {
        let database_url =
            database_url.context("DATABASE_URL environment variable required")?;
        let port = match port {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid PORT value: {raw}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { database_url, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_fails() {
        let config = Config::from_vars(None, None);
        assert!(config.is_err());
    }

    #[test]
    fn port_defaults_when_unset() {
        let config = Config::from_vars(Some("postgres://localhost/todos".into()), None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn explicit_port_wins() {
        let config =
            Config::from_vars(Some("postgres://localhost/todos".into()), Some("3000".into()))
                .unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn non_numeric_port_fails() {
        let config =
            Config::from_vars(Some("postgres://localhost/todos".into()), Some("eight".into()));
        assert!(config.is_err());
    }
}
