use serde::{Deserialize, Serialize};

use crate::errors::DbError;

/// Settings for the MySQL pool backing a client.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl ConnectionConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        ConnectionConfig {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
        }
    }

    /// Reads `DATABASE_URL` from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self, DbError> {
        dotenv::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| DbError::Config("DATABASE_URL must be set".to_string()))?;
        Ok(Self::new(database_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_connections_defaults_when_absent() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"database_url": "mysql://localhost/app"}"#).unwrap();
        assert_eq!(config.max_connections, 5);
    }
}
