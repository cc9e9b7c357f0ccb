use secrecy::SecretString;
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub verify_token: SecretString,
    pub db_path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn load() -> eyre::Result<Self> {
        Ok(envy::prefixed("HOOKLINE_").from_env::<Self>()?)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| "127.0.0.1".to_owned()),
            self.port.unwrap_or(4000),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_token: SecretString::from("hookline-dev-token"),
            db_path: None,
            host: None,
            port: None,
        }
    }
}
