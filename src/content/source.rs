use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use super::errors::ContentError;
use super::types::PortfolioItem;

static SLUG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").ok());

/// Slugs double as file names, so only lowercase words joined by dashes pass.
pub fn validate_slug(slug: &str) -> Result<(), ContentError> {
    if SLUG_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(slug)) {
        Ok(())
    } else {
        Err(ContentError::InvalidSlug {
            slug: slug.to_string(),
        })
    }
}

/// Where portfolio content comes from.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every portfolio item, summaries included
    async fn list_items(&self) -> Result<Vec<PortfolioItem>, ContentError>;

    /// Full document of one item
    async fn fetch_item(&self, slug: &str) -> Result<PortfolioItem, ContentError>;
}

/// Reads one `<slug>.json` document per item from a directory.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    root: PathBuf,
}

impl FileContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_document(&self, path: &Path) -> Result<PortfolioItem, ContentError> {
        let raw = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
            document: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn list_items(&self) -> Result<Vec<PortfolioItem>, ContentError> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            ContentError::Unavailable(format!("{}: {e}", self.root.display()))
        })?;

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match self.read_document(&path).await {
                Ok(item) => items.push(item),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable portfolio document"),
            }
        }

        // Newest projects first, like the portfolio grid
        items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        debug!(count = items.len(), root = %self.root.display(), "Listed portfolio items");
        Ok(items)
    }

    async fn fetch_item(&self, slug: &str) -> Result<PortfolioItem, ContentError> {
        validate_slug(slug)?;
        let path = self.root.join(format!("{slug}.json"));
        if !tokio::fs::try_exists(&path).await? {
            return Err(ContentError::NotFound {
                slug: slug.to_string(),
            });
        }
        self.read_document(&path).await
    }
}
