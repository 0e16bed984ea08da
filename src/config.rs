use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub application: ApplicationSettings,
    pub allow_cors: bool,
    pub game: GameSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct GameSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub inactivity_timeout_seconds: u64,
}

impl GameSettings {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_seconds)
    }
}

impl Config {
    /// Reads `config/base.yaml` and layers the ENVIRONMENT-specific
    /// file on top of it.
    pub fn get() -> Result<Config, ConfigError> {
        let config_directory = std::env::current_dir()
            .expect("Could not determine the current directory.")
            .join("config");

        let environment: Environment = std::env::var("ENVIRONMENT")
            .expect("The ENVIRONMENT variable is not set.")
            .try_into()
            .expect("Could not parse the ENVIRONMENT variable.");

        config::Config::builder()
            .add_source(config::File::from(config_directory.join("base.yaml")))
            .add_source(config::File::from(
                config_directory.join(format!("{environment}.yaml")),
            ))
            .build()?
            .try_deserialize::<Config>()
    }
}

enum Environment {
    Dev,
    Prod,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "'{other}' is not a supported environment. Use either 'dev' or 'prod'."
            )),
        }
    }
}
