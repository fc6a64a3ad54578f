/// Application configuration
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Server and storage settings, loaded from a JSON file at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address to bind the API server to
    #[serde(default = "default_address")]
    pub address: String,

    /// Port to bind the API server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "mentorlab.db".to_string()
}

impl AppConfig {
    /// Loads configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the config file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Parsed configuration
    /// * `Err` - If the file is missing or not valid JSON
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The address:port string to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            db_path: default_db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = serde_json::from_str(r#"{ "port": 8080 }"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.db_path, "mentorlab.db");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
