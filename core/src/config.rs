//! Environment-driven settings shared by the Lambda and the dev server.

pub const DEFAULT_REGION: &str = "ap-southeast-1";
pub const DEFAULT_DEV_SERVER_ADDR: &str = "127.0.0.1:3000";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} is empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `DB_NAME`, the table holding the releases.
    pub table_name: String,
    /// `DEFAULT_REGION`, used when a request names no region.
    pub default_region: String,
    /// `DYNAMODB_ENDPOINT`, e.g. a DynamoDB Local instance.
    pub endpoint_url: Option<String>,
    /// `DEV_SERVER_ADDR`, where the local server listens. Unused by the Lambda.
    pub dev_server_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let table_name = match lookup("DB_NAME") {
            None => return Err(ConfigError::Missing("DB_NAME")),
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Empty("DB_NAME")),
            Some(v) => v,
        };

        Ok(Self {
            table_name,
            default_region: optional("DEFAULT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: optional("DYNAMODB_ENDPOINT"),
            dev_server_addr: optional("DEV_SERVER_ADDR")
                .unwrap_or_else(|| DEFAULT_DEV_SERVER_ADDR.to_string()),
        })
    }
}
