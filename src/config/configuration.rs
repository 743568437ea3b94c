use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: SecretString,
    pub pool_max_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub expiration_minutes: i64,
}

/// Argon2id cost parameters. Tests lower them to keep hashing fast.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub auto_activate_delivery_staff: bool,
    pub argon2: Argon2Settings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartSettings {
    pub idle_timeout_minutes: u64,
    pub max_carts: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub auth: AuthSettings,
    pub cart: CartSettings,
}

impl Settings {
    /// Reads `config.yaml`, then applies `APP__SECTION__KEY` environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = Config::default();
        s.merge(File::with_name("config"))?;
        s.merge(Environment::with_prefix("APP").separator("__"))?;
        let settings: Settings = s.try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.expose_secret().len() < 16 {
            return Err(ConfigError::Message(
                "jwt.secret must be at least 16 characters".to_string(),
            ));
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
