use crate::error::{DashboardError, Result};
use serde::Deserialize;

pub const DEFAULT_TABLE: &str = "Transactions";
pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com";

/// Credentials and location of the Airtable table holding the transactions.
///
/// Passed explicitly to the store client so that tests can build one
/// without touching the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub api_key: String,
    pub base_id: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl StoreConfig {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            table: default_table(),
            endpoint: default_endpoint(),
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Reads `AIRTABLE_API_KEY` and `AIRTABLE_BASE_ID`, plus the optional
    /// `AIRTABLE_TABLE` and `AIRTABLE_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Configuration`] when a required variable is
    /// missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| DashboardError::Configuration(format!("Missing {} env", name)))
        };

        let mut config = Self::new(required("AIRTABLE_API_KEY")?, required("AIRTABLE_BASE_ID")?);
        if let Some(table) = lookup("AIRTABLE_TABLE") {
            config.table = table;
        }
        if let Some(endpoint) = lookup("AIRTABLE_ENDPOINT") {
            config.endpoint = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("api_key", &self.api_key),
            ("base_id", &self.base_id),
            ("table", &self.table),
            ("endpoint", &self.endpoint),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DashboardError::Configuration(format!(
                    "Record store {} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_with_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("AIRTABLE_API_KEY", "key123"),
            ("AIRTABLE_BASE_ID", "app456"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "key123");
        assert_eq!(config.base_id, "app456");
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let err = StoreConfig::from_lookup(lookup_from(&[("AIRTABLE_BASE_ID", "app456")]))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Configuration(_)));
        assert!(err.to_string().contains("AIRTABLE_API_KEY"));
    }

    #[test]
    fn test_blank_values_rejected() {
        let err = StoreConfig::new("  ", "app456").validate().unwrap_err();
        assert!(matches!(err, DashboardError::Configuration(_)));

        let err = StoreConfig::new("key", "app").with_table("").validate().unwrap_err();
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_deserialize_config() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"api_key":"k","base_id":"b","table":"Factures"}"#).unwrap();
        assert_eq!(config.table, "Factures");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }
}
