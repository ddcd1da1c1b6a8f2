//! Product search doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use chat_core::{async_trait, ChatError, ProductRef, ProductSearch, StaticCatalog};

/// A [`StaticCatalog`] that counts how often it is queried.
#[derive(Debug, Default)]
pub struct CountingCatalog {
    inner: StaticCatalog,
    searches: AtomicUsize,
    category_lookups: AtomicUsize,
    last_query: std::sync::Mutex<Option<String>>,
}

impl CountingCatalog {
    pub fn new(products: Vec<ProductRef>) -> Self {
        Self {
            inner: StaticCatalog::new(products),
            ..Default::default()
        }
    }

    /// A small bedding catalog used across the test suites.
    pub fn sample() -> Self {
        Self::new(vec![
            ProductRef::new("col-2p", "Colchón Espuma 2 plazas", 180000.0, "colchones"),
            ProductRef::new("col-1p", "Colchón Resortes 1 plaza", 150000.0, "colchones"),
            ProductRef::new("som-2p", "Sommier Resortes 2 plazas", 420000.0, "sommiers"),
            ProductRef::new("alm-visco", "Almohada Viscoelástica", 35000.0, "almohadas"),
        ])
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn category_count(&self) -> usize {
        self.category_lookups.load(Ordering::SeqCst)
    }

    /// Query text of the most recent `search` call.
    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProductSearch for CountingCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.to_string());
        }
        self.inner.search(query, limit).await
    }

    async fn by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<ProductRef>, ChatError> {
        self.category_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.by_category(category, limit).await
    }
}

/// A catalog that is always down.
#[derive(Debug, Default)]
pub struct FailingCatalog;

#[async_trait]
impl ProductSearch for FailingCatalog {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        Err(ChatError::Network("catalog unavailable".to_string()))
    }

    async fn by_category(
        &self,
        _category: &str,
        _limit: usize,
    ) -> Result<Vec<ProductRef>, ChatError> {
        Err(ChatError::Network("catalog unavailable".to_string()))
    }
}
