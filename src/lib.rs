// Portfolio Carousel Library - gallery modal of a contractor portfolio
// This exposes the core components for testing and integration

pub mod carousel;
pub mod content;
pub mod modal;
pub mod config;
pub mod telemetry;

// Re-export key types for easy access
pub use carousel::{
    spawn_carousel, CarouselCommand, CarouselHandle, CarouselPhase, CarouselSnapshot, Frame,
    GalleryCarousel, GallerySequence, ImageItem, NavigationOutcome, TimerKind,
};
pub use content::{
    CategoryFilter, ContentError, ContentSource, FileContentSource, PortfolioItem, PortfolioLoader,
};
pub use modal::{Key, ModalInput, ModalResponse, ModalShell, ModalView, Pointer};
pub use crate::config::{CarouselConfig, CarouselTimings, config};
pub use telemetry::{init_telemetry, generate_correlation_id, create_modal_span};
