use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::source::ContentSource;
use super::types::{default_portfolio, CategoryFilter, PortfolioItem};

const LISTING_KEY: &str = "__listing__";

/// Fetches portfolio content and degrades instead of failing.
///
/// Every successful fetch is remembered. When the source errors, callers get
/// the last good copy, then the data they already hold, then the built-in
/// default portfolio. Errors are logged, never returned.
#[derive(Clone)]
pub struct PortfolioLoader {
    source: Arc<dyn ContentSource>,
    items: Cache<String, PortfolioItem>,
    listings: Cache<String, Arc<Vec<PortfolioItem>>>,
}

impl PortfolioLoader {
    pub fn new(source: Arc<dyn ContentSource>, capacity: u64) -> Self {
        Self {
            source,
            items: Cache::new(capacity),
            listings: Cache::new(1),
        }
    }

    /// Published items matching `filter`.
    pub async fn list_published(&self, filter: &CategoryFilter) -> Vec<PortfolioItem> {
        let all = match self.source.list_items().await {
            Ok(items) => {
                let items = Arc::new(items);
                self.listings
                    .insert(LISTING_KEY.to_string(), Arc::clone(&items))
                    .await;
                items
            }
            Err(e) => match self.listings.get(LISTING_KEY).await {
                Some(cached) => {
                    warn!(error = %e, "Portfolio listing failed, using last known listing");
                    cached
                }
                None => {
                    warn!(error = %e, "Portfolio listing failed, using default portfolio");
                    Arc::new(default_portfolio())
                }
            },
        };

        all.iter()
            .filter(|item| item.published && item.matches(filter))
            .cloned()
            .collect()
    }

    /// Full document for `summary`, falling back to what is already known.
    pub async fn load_full(&self, summary: &PortfolioItem) -> PortfolioItem {
        match self.source.fetch_item(&summary.slug).await {
            Ok(item) => {
                debug!(slug = %item.slug, images = item.gallery_sequence().len(), "Loaded full portfolio item");
                self.items.insert(item.slug.clone(), item.clone()).await;
                item
            }
            Err(e) => match self.items.get(&summary.slug).await {
                Some(cached) => {
                    warn!(slug = %summary.slug, error = %e, "Fetch failed, using cached portfolio item");
                    cached
                }
                None => {
                    warn!(slug = %summary.slug, error = %e, "Fetch failed, using summary data");
                    summary.clone()
                }
            },
        }
    }

    /// Resolves a slug from the listing, then loads the full item.
    pub async fn find(&self, slug: &str) -> Option<PortfolioItem> {
        let summary = self
            .list_published(&CategoryFilter::All)
            .await
            .into_iter()
            .find(|item| item.slug == slug)?;
        let full = self.load_full(&summary).await;
        info!(slug, title = %full.title, "Portfolio item resolved");
        Some(full)
    }
}
