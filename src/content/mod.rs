// Portfolio Content Module - CMS documents, sources and fallback loading

pub mod errors;
pub mod types;
pub mod source;
pub mod loader;

pub use errors::ContentError;
pub use types::{
    category_label, default_portfolio, CategoryField, CategoryFilter, GalleryEntry, PortfolioItem,
    CATEGORIES,
};
pub use source::{validate_slug, ContentSource, FileContentSource};
pub use loader::PortfolioLoader;
