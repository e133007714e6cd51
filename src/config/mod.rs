use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://projects.db";

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are picked up first if one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Replace the database URL, e.g. with one given on the command line
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init(database_url: Option<String>) -> Result<Config> {
    let config = Config::load()?.with_database_url(database_url);

    Ok(config)
}
