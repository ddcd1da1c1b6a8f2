//! In-memory catalog.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::traits::ProductSearch;
use crate::types::ProductRef;

/// A [`ProductSearch`] over a fixed product list.
///
/// Matching is word based: each query word of three or more letters that
/// appears in a product's name or category scores one point. Accents and
/// case are ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<ProductRef>,
}

impl StaticCatalog {
    pub fn new(products: Vec<ProductRef>) -> Self {
        Self { products }
    }

    /// Load a JSON array of products from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Configuration(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let products: Vec<ProductRef> = serde_json::from_str(&raw).map_err(|e| {
            ChatError::Configuration(format!("invalid catalog {}: {}", path.display(), e))
        })?;
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductSearch for StaticCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductRef>, ChatError> {
        let words: Vec<String> = fold(query)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= 3)
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, &ProductRef)> = self
            .products
            .iter()
            .filter_map(|product| {
                let haystack = fold(&format!("{} {}", product.name, product.category));
                let score = words.iter().filter(|w| haystack.contains(w.as_str())).count();
                (score > 0).then_some((score, product))
            })
            .collect();

        // Stable sort keeps catalog order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, product)| product.clone())
            .collect())
    }

    async fn by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<ProductRef>, ChatError> {
        let wanted = fold(category);
        Ok(self
            .products
            .iter()
            .filter(|p| fold(&p.category) == wanted)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Lowercase and strip Spanish diacritics.
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            ProductRef::new("1", "Colchón Espuma 2 plazas", 180000.0, "Colchones"),
            ProductRef::new("2", "Sommier Resortes 2 plazas", 420000.0, "Sommiers"),
            ProductRef::new("3", "Almohada Viscoelástica", 35000.0, "Almohadas"),
            ProductRef::new("4", "Colchón Resortes 1 plaza", 150000.0, "Colchones"),
        ])
    }

    #[tokio::test]
    async fn test_search_ranks_by_matches() {
        let results = catalog().search("busco un colchon para 2 plazas", 5).await.unwrap();
        let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
        // "colchon" + "plazas" beats "plazas" alone
        assert_eq!(ids[0], "1");
        assert!(ids.contains(&"2"));
        assert!(ids.contains(&"4"));
        assert!(!ids.contains(&"3"));
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let results = catalog().search("colchón", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_short_words_only() {
        let results = catalog().search("un y a", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_by_category_case_insensitive() {
        let results = catalog().by_category("colchones", 5).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = StaticCatalog::from_json_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }
}
