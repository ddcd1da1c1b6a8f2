//! Storefront catalog backends.

use std::sync::Arc;
use std::time::Duration;

use chat_core::{async_trait, ChatError, ProductRef, ProductSearch, StaticCatalog};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::ServerConfig;

/// Catalog served by the storefront's product API.
///
/// Expects `GET {base}/products?search=..&limit=..` and
/// `GET {base}/products?category=..&limit=..`, both answering with a JSON
/// array of products.
#[derive(Clone)]
pub struct HttpCatalog {
    http: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, filter: (&str, &str), limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        let url = format!("{}/products", self.base_url);
        let limit = limit.to_string();
        debug!("Catalog request: {} {}={}", url, filter.0, filter.1);

        let response = self
            .http
            .get(&url)
            .query(&[filter, ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("Catalog request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::ProcessingFailed(format!(
                "Catalog returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ChatError::ProcessingFailed(format!("Invalid catalog response: {}", e)))
    }
}

#[async_trait]
impl ProductSearch for HttpCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        self.fetch(("search", query), limit).await
    }

    async fn by_category(&self, category: &str, limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        self.fetch(("category", category), limit).await
    }
}

/// Pick the catalog backend: remote API, then JSON file, then empty.
pub fn from_config(config: &ServerConfig) -> Result<Arc<dyn ProductSearch>, ChatError> {
    if let Some(url) = &config.catalog_api_url {
        info!(url = %url, "Using remote catalog");
        return Ok(Arc::new(HttpCatalog::new(url.clone())?));
    }

    if let Some(path) = &config.catalog_file {
        let catalog = StaticCatalog::from_json_file(path)?;
        info!(path = %path.display(), products = catalog.len(), "Loaded catalog file");
        return Ok(Arc::new(catalog));
    }

    info!("No catalog configured, product search disabled");
    Ok(Arc::new(StaticCatalog::default()))
}
