//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// MongoDB connection string.
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,

    /// Database holding the todo collection.
    #[serde(default = "default_mongo_db")]
    pub mongo_db: String,

    /// Collection of todo documents.
    #[serde(default = "default_mongo_collection")]
    pub mongo_collection: String,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_db() -> String {
    "todo-app".to_string()
}

fn default_mongo_collection() -> String {
    "todos".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: default_mongo_uri(),
            mongo_db: default_mongo_db(),
            mongo_collection: default_mongo_collection(),
            port: default_port(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.mongo_uri.starts_with("mongodb://") && !self.mongo_uri.starts_with("mongodb+srv://") {
            return Err("MONGO_URI must start with mongodb:// or mongodb+srv://".to_string());
        }

        if self.mongo_db.is_empty() {
            return Err("MONGO_DB must not be empty".to_string());
        }

        if self.mongo_collection.is_empty() {
            return Err("MONGO_COLLECTION must not be empty".to_string());
        }

        Ok(())
    }
}
