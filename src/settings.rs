use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file, created when missing.
    pub database_path: String,
    pub address: String,
    /// Fixed seed for quiz picks. Random when unset.
    pub quiz_seed: Option<u64>,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("database_path", "trivia.db")?
        .set_default("address", "0.0.0.0:8080")
}

impl Settings {
    /// Defaults, then `trivia.toml` if present, then `TRIVIA_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
