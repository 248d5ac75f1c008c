use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    /// `None` leaves the choice of store to the compiled-in repo features.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        if server_port.parse::<u16>().is_err() {
            anyhow::bail!("SERVER_PORT must be a port number, got {server_port:?}");
        }
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        Ok(Self {
            server_port,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns these variables so parallel tests never see them change.
    #[test]
    fn database_url_is_optional() {
        env::set_var("SERVER_PORT", "3100");
        env::remove_var("DATABASE_URL");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, "3100");
        assert_eq!(config.database_url, None);

        env::set_var("DATABASE_URL", "sqlite://data/test.db");
        let config = Config::from_env().unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite://data/test.db"));

        env::set_var("SERVER_PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        env::remove_var("DATABASE_URL");
        env::remove_var("SERVER_PORT");
    }
}
