use crate::config::StoreConfig;
use crate::error::{DashboardError, Result};
use crate::store::{RecordPage, RecordStore, SelectOptions};
use futures::future::BoxFuture;
use log::debug;
use reqwest::{Client, Url};

const API_VERSION: &str = "v0";

/// Airtable REST client for the transactions table.
///
/// Holds the private API key, so it only exists in server-side builds.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    config: StoreConfig,
    table_url: Url,
}

impl AirtableClient {
    /// # Errors
    ///
    /// Returns [`DashboardError::Configuration`] if the configuration has blank
    /// credentials or an endpoint that is not a base URL.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let table_url = Self::build_table_url(&config)?;

        Ok(Self {
            client: Client::new(),
            config,
            table_url,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn build_table_url(config: &StoreConfig) -> Result<Url> {
        let mut url = Url::parse(&config.endpoint).map_err(|e| {
            DashboardError::Configuration(format!("Invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                DashboardError::Configuration(format!(
                    "Endpoint '{}' cannot be used as a base URL",
                    config.endpoint
                ))
            })?
            .pop_if_empty()
            .extend([API_VERSION, config.base_id.as_str(), config.table.as_str()]);

        Ok(url)
    }

    pub async fn fetch_page(
        &self,
        options: &SelectOptions,
        offset: Option<&str>,
    ) -> Result<RecordPage> {
        debug!(
            "Requesting {} page from {} (offset: {:?})",
            self.config.table, self.config.base_id, offset
        );

        let res = self
            .client
            .get(self.table_url.clone())
            .bearer_auth(&self.config.api_key)
            .query(&options.to_query_pairs(offset))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let error_text = res.text().await?;
            return Err(DashboardError::StoreError(format!(
                "Airtable API Error (status {}): {}",
                status, error_text
            )));
        }

        let page: RecordPage = res.json().await?;
        Ok(page)
    }
}

impl RecordStore for AirtableClient {
    fn list_page<'a>(
        &'a self,
        options: &'a SelectOptions,
        offset: Option<&'a str>,
    ) -> BoxFuture<'a, Result<RecordPage>> {
        Box::pin(self.fetch_page(options, offset))
    }
}
