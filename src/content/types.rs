// Portfolio content model as authored in the CMS

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::carousel::{GallerySequence, ImageItem};

/// Category as stored by the CMS: either a bare value or a value with a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Plain(String),
    Labeled { value: String, label: String },
}

impl CategoryField {
    pub fn value(&self) -> &str {
        match self {
            CategoryField::Plain(value) => value.as_str(),
            CategoryField::Labeled { value, .. } => value.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryField::Plain(value) => category_label(value).unwrap_or(value.as_str()),
            CategoryField::Labeled { label, .. } => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

/// One completed project shown in the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub date: DateTime<Utc>,
    /// Current category field
    #[serde(default, alias = "categorie", skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryField>,
    /// Older documents still carry `type`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<CategoryField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<GalleryEntry>,
    #[serde(default, alias = "lieu", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl PortfolioItem {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            excerpt: None,
            date,
            category: None,
            legacy_type: None,
            featured_image: None,
            gallery: Vec::new(),
            location: None,
            client: None,
            duration: None,
            surface: None,
            published: true,
        }
    }

    /// Featured image first, then the gallery in authoring order.
    pub fn gallery_sequence(&self) -> GallerySequence {
        let featured = self.featured_image.as_ref().map(|source| {
            ImageItem::with_caption(source.clone(), format!("Main image - {}", self.title))
        });
        let gallery = self
            .gallery
            .iter()
            .map(|entry| ImageItem {
                source: entry.image.clone(),
                caption: Some(entry.caption.trim())
                    .filter(|caption| !caption.is_empty())
                    .map(str::to_string),
            })
            .collect();
        GallerySequence::from_parts(featured, gallery)
    }

    fn category_field(&self) -> Option<&CategoryField> {
        self.category.as_ref().or(self.legacy_type.as_ref())
    }

    pub fn category_value(&self) -> Option<&str> {
        self.category_field().map(CategoryField::value)
    }

    pub fn category_label(&self) -> Option<&str> {
        self.category_field().map(CategoryField::label)
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.description.as_deref().or(self.excerpt.as_deref())
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Ordered detail rows of the modal side panel.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(label) = self.category_label() {
            rows.push(("Type", label.to_string()));
        }
        rows.push(("Date", self.formatted_date()));
        let optional = [
            ("Location", &self.location),
            ("Surface", &self.surface),
            ("Duration", &self.duration),
            ("Client", &self.client),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                rows.push((label, value.clone()));
            }
        }
        rows
    }

    pub fn matches(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => self.category_value() == Some(wanted.as_str()),
        }
    }
}

/// Portfolio list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => CategoryFilter::All,
            other => CategoryFilter::Category(other.to_string()),
        }
    }
}

/// Built-in project categories: (value, label)
pub const CATEGORIES: [(&str, &str); 4] = [
    ("terrasse", "Terraces"),
    ("maconnerie", "Masonry"),
    ("amenagement", "Landscaping"),
    ("renovation", "Renovation"),
];

pub fn category_label(value: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(known, _)| *known == value)
        .map(|(_, label)| *label)
}

/// Projects shown when the content source cannot be reached at all.
pub fn default_portfolio() -> Vec<PortfolioItem> {
    let mut terrace = PortfolioItem::new(
        "terrasse-mirassou",
        "Exposed aggregate concrete terrace",
        "2024-01-15T10:00:00Z".parse().unwrap_or_default(),
    );
    terrace.legacy_type = Some(CategoryField::Plain("terrasse".to_string()));
    terrace.location = Some("Mirassou".to_string());
    terrace.excerpt =
        Some("A 40 m² exposed aggregate concrete terrace with a careful finish.".to_string());

    let mut wall = PortfolioItem::new(
        "muret-huste",
        "Retaining wall",
        "2024-02-10T14:00:00Z".parse().unwrap_or_default(),
    );
    wall.legacy_type = Some(CategoryField::Plain("maconnerie".to_string()));
    wall.location = Some("Husté".to_string());
    wall.excerpt = Some("A natural stone retaining wall.".to_string());

    vec![terrace, wall]
}
