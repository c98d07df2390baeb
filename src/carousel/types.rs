// Core carousel data types - images, sequences and read-side views

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One displayable photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Opaque reference to the image data (URL or path)
    pub source: String,
    /// Optional display text
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageItem {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: None,
        }
    }

    pub fn with_caption(source: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: Some(caption.into()),
        }
    }
}

/// Ordered, immutable list of images for one opened portfolio item.
///
/// Cloning is cheap and never copies the images; a new sequence replaces the
/// old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GallerySequence {
    items: Arc<[ImageItem]>,
}

impl GallerySequence {
    pub fn new(items: Vec<ImageItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Featured image first (if any), then the gallery in source order.
    pub fn from_parts(featured: Option<ImageItem>, gallery: Vec<ImageItem>) -> Self {
        let items: Vec<ImageItem> = featured.into_iter().chain(gallery).collect();
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageItem> {
        self.items.iter()
    }

    /// Index after `current`, wrapping from the last image to the first.
    pub fn next_index(&self, current: usize) -> Option<usize> {
        match self.len() {
            0 => None,
            len => Some((current + 1) % len),
        }
    }

    /// Index before `current`, wrapping from the first image to the last.
    pub fn prev_index(&self, current: usize) -> Option<usize> {
        match self.len() {
            0 => None,
            len if current == 0 || current >= len => Some(len - 1),
            _ => Some(current - 1),
        }
    }
}

impl FromIterator<ImageItem> for GallerySequence {
    fn from_iter<T: IntoIterator<Item = ImageItem>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Who asked for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOrigin {
    /// Keyboard, buttons or dot indicators
    Manual,
    /// The recurring auto-advance timer
    AutoAdvance,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    /// A crossfade from `from` to `to` is now in flight
    Started { from: usize, to: usize },
    /// Target is already the visible image
    AlreadyCurrent,
    /// Another crossfade is still running; the request was dropped
    TransitionInFlight,
    /// Target index does not exist in the sequence
    OutOfRange { target: usize, len: usize },
    /// Auto-advance is paused; the tick was skipped
    Skipped,
    /// Nothing to navigate
    NoImages,
}

impl NavigationOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, NavigationOutcome::Started { .. })
    }
}

/// Coarse state of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarouselPhase {
    Empty,
    Idle { current: usize },
    Transitioning { current: usize, pending: usize },
}

/// Point-in-time view of a carousel, published by the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub phase: CarouselPhase,
    pub len: usize,
    pub is_paused: bool,
    pub current: Option<ImageItem>,
    pub pending: Option<ImageItem>,
}

impl CarouselSnapshot {
    pub fn closed() -> Self {
        Self {
            phase: CarouselPhase::Empty,
            len: 0,
            is_paused: false,
            current: None,
            pending: None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            CarouselPhase::Empty => None,
            CarouselPhase::Idle { current } | CarouselPhase::Transitioning { current, .. } => {
                Some(current)
            }
        }
    }

    pub fn pending_index(&self) -> Option<usize> {
        match self.phase {
            CarouselPhase::Transitioning { pending, .. } => Some(pending),
            _ => None,
        }
    }

    pub fn shows_navigation(&self) -> bool {
        self.len > 1
    }

    pub fn counter_label(&self) -> Option<String> {
        self.current_index()
            .map(|index| format!("Image {} of {}", index + 1, self.len))
    }
}

/// What should be painted right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// No images: the "no image available" placeholder
    Placeholder,
    /// A single fully opaque image
    Still(ImageItem),
    /// Outgoing image fully visible, incoming image on top at `opacity`
    Crossfade {
        base: ImageItem,
        overlay: ImageItem,
        opacity: f32,
    },
}
