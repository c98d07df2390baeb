//! Portfolio modal shell.
//!
//! Owns at most one open portfolio item together with its running carousel,
//! maps keyboard and pointer input onto carousel commands, and guarantees the
//! carousel is closed exactly once per open, whichever input closed it.

use std::fmt;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::carousel::{spawn_carousel, CarouselCommand, CarouselHandle, CarouselSnapshot, ImageItem};
use crate::config::CarouselTimings;
use crate::content::PortfolioItem;
use crate::telemetry::{create_modal_span, generate_correlation_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

impl Key {
    /// Parses terminal-friendly key names.
    pub fn parse(input: &str) -> Option<Key> {
        match input.trim().to_ascii_lowercase().as_str() {
            "left" | "arrowleft" | "h" => Some(Key::ArrowLeft),
            "right" | "arrowright" | "l" => Some(Key::ArrowRight),
            "esc" | "escape" | "q" => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Overlay,
    CloseButton,
    PrevButton,
    NextButton,
    Dot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalInput {
    Key(Key),
    Pointer(Pointer),
}

impl ModalInput {
    /// Parses a line of terminal input: key names, `prev`/`next`, `close`
    /// or a 1-based dot number.
    pub fn parse(input: &str) -> Option<ModalInput> {
        if let Some(key) = Key::parse(input) {
            return Some(ModalInput::Key(key));
        }
        let trimmed = input.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "prev" | "p" => Some(ModalInput::Pointer(Pointer::PrevButton)),
            "next" | "n" => Some(ModalInput::Pointer(Pointer::NextButton)),
            "close" | "x" => Some(ModalInput::Pointer(Pointer::CloseButton)),
            "overlay" => Some(ModalInput::Pointer(Pointer::Overlay)),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|dot| *dot > 0)
                .map(|dot| ModalInput::Pointer(Pointer::Dot(dot - 1))),
        }
    }
}

/// What an input means for the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Close,
    Carousel(CarouselCommand),
}

/// Maps an input onto its action. Buttons and dots only exist when the
/// gallery has more than one image.
pub fn binding_for(input: ModalInput, shows_navigation: bool) -> Option<Binding> {
    match input {
        ModalInput::Key(Key::Escape)
        | ModalInput::Pointer(Pointer::Overlay)
        | ModalInput::Pointer(Pointer::CloseButton) => Some(Binding::Close),
        ModalInput::Key(Key::ArrowLeft) => Some(Binding::Carousel(CarouselCommand::Prev)),
        ModalInput::Key(Key::ArrowRight) => Some(Binding::Carousel(CarouselCommand::Next)),
        ModalInput::Pointer(_) if !shows_navigation => None,
        ModalInput::Pointer(Pointer::PrevButton) => Some(Binding::Carousel(CarouselCommand::Prev)),
        ModalInput::Pointer(Pointer::NextButton) => Some(Binding::Carousel(CarouselCommand::Next)),
        ModalInput::Pointer(Pointer::Dot(index)) => {
            Some(Binding::Carousel(CarouselCommand::GoTo(index)))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResponse {
    Forwarded(CarouselCommand),
    Closed,
    Ignored,
}

#[derive(Debug)]
struct OpenModal {
    item: PortfolioItem,
    carousel: CarouselHandle,
    session_id: String,
}

#[derive(Debug)]
pub struct ModalShell {
    timings: CarouselTimings,
    open: Option<OpenModal>,
    closes: u64,
}

impl ModalShell {
    pub fn new(timings: CarouselTimings) -> Self {
        Self {
            timings,
            open: None,
            closes: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn item(&self) -> Option<&PortfolioItem> {
        self.open.as_ref().map(|open| &open.item)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.session_id.as_str())
    }

    /// How many carousels this shell has closed so far.
    pub fn close_count(&self) -> u64 {
        self.closes
    }

    /// Opens `item`, closing whatever was open before. Must run inside a
    /// tokio runtime.
    pub async fn open(&mut self, item: PortfolioItem) {
        self.close().await;

        let session_id = generate_correlation_id();
        let sequence = item.gallery_sequence();
        info!(
            slug = %item.slug,
            session_id = %session_id,
            images = sequence.len(),
            "Portfolio modal opened"
        );
        let span = create_modal_span("open", Some(&item.slug), Some(&session_id));
        let carousel = span.in_scope(|| spawn_carousel(self.timings, sequence));
        self.open = Some(OpenModal {
            item,
            carousel,
            session_id,
        });
    }

    /// Closes the modal; returns false when it was not open.
    pub async fn close(&mut self) -> bool {
        let Some(open) = self.open.take() else {
            return false;
        };
        open.carousel.close().await;
        self.closes += 1;
        info!(slug = %open.item.slug, session_id = %open.session_id, "Portfolio modal closed");
        true
    }

    pub async fn handle(&mut self, input: ModalInput) -> ModalResponse {
        let Some(open) = self.open.as_ref() else {
            return ModalResponse::Ignored;
        };
        let shows_navigation = open.carousel.snapshot().shows_navigation();

        match binding_for(input, shows_navigation) {
            Some(Binding::Close) => {
                self.close().await;
                ModalResponse::Closed
            }
            Some(Binding::Carousel(command)) => {
                if open.carousel.send(command.clone()) {
                    ModalResponse::Forwarded(command)
                } else {
                    ModalResponse::Ignored
                }
            }
            None => {
                debug!(?input, "Input has no binding");
                ModalResponse::Ignored
            }
        }
    }

    /// Full content for the open item arrived; shows its gallery instead.
    pub fn apply_full_content(&mut self, item: PortfolioItem) -> bool {
        let Some(open) = self.open.as_mut() else {
            return false;
        };
        if open.item.slug != item.slug {
            debug!(open = %open.item.slug, arrived = %item.slug, "Ignoring content for another item");
            return false;
        }
        let sent = open
            .carousel
            .send(CarouselCommand::Replace(item.gallery_sequence()));
        open.item = item;
        sent
    }

    pub fn snapshot(&self) -> Option<CarouselSnapshot> {
        self.open.as_ref().map(|open| open.carousel.snapshot())
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<CarouselSnapshot>> {
        self.open.as_ref().map(|open| open.carousel.subscribe())
    }

    pub fn view(&self) -> Option<ModalView> {
        let open = self.open.as_ref()?;
        Some(ModalView::new(&open.item, &open.carousel.snapshot()))
    }
}

/// Everything the modal shows at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub title: String,
    pub subtitle: String,
    pub summary: Option<String>,
    pub details: Vec<(&'static str, String)>,
    pub image: Option<ImageItem>,
    pub counter: Option<String>,
    pub show_navigation: bool,
    pub dots: Vec<bool>,
}

impl ModalView {
    pub fn new(item: &PortfolioItem, snapshot: &CarouselSnapshot) -> Self {
        let current = snapshot.current_index();
        let dots = if snapshot.shows_navigation() {
            (0..snapshot.len).map(|i| Some(i) == current).collect()
        } else {
            Vec::new()
        };
        let subtitle = match item.category_label() {
            Some(label) => format!("{label} • {}", item.formatted_date()),
            None => item.formatted_date(),
        };

        Self {
            title: item.title.clone(),
            subtitle,
            summary: item.summary_text().map(str::to_string),
            details: item.details(),
            image: snapshot.pending.clone().or_else(|| snapshot.current.clone()),
            counter: snapshot.counter_label(),
            show_navigation: snapshot.shows_navigation(),
            dots,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.image.is_none()
    }
}

impl fmt::Display for ModalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        match &self.image {
            Some(image) => {
                writeln!(f, "  [{}]", image.source)?;
                if let Some(caption) = &image.caption {
                    writeln!(f, "  {caption}")?;
                }
            }
            None => writeln!(f, "  [no image available]")?,
        }
        if self.show_navigation {
            let dots: String = self
                .dots
                .iter()
                .map(|active| if *active { '●' } else { '○' })
                .collect();
            writeln!(f, "  ← {dots} →")?;
        }
        if let Some(summary) = &self.summary {
            writeln!(f, "{summary}")?;
        }
        for (label, value) in &self.details {
            writeln!(f, "  {label}: {value}")?;
        }
        if let Some(counter) = &self.counter {
            write!(f, "{counter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inputs() {
        assert_eq!(ModalInput::parse("left"), Some(ModalInput::Key(Key::ArrowLeft)));
        assert_eq!(ModalInput::parse(" ESC "), Some(ModalInput::Key(Key::Escape)));
        assert_eq!(
            ModalInput::parse("3"),
            Some(ModalInput::Pointer(Pointer::Dot(2)))
        );
        assert_eq!(ModalInput::parse("0"), None);
        assert_eq!(ModalInput::parse("jump"), None);
    }

    #[test]
    fn test_bindings() {
        assert_eq!(
            binding_for(ModalInput::Key(Key::Escape), true),
            Some(Binding::Close)
        );
        assert_eq!(
            binding_for(ModalInput::Pointer(Pointer::Overlay), false),
            Some(Binding::Close)
        );
        assert_eq!(
            binding_for(ModalInput::Key(Key::ArrowRight), true),
            Some(Binding::Carousel(CarouselCommand::Next))
        );
        assert_eq!(
            binding_for(ModalInput::Pointer(Pointer::Dot(1)), true),
            Some(Binding::Carousel(CarouselCommand::GoTo(1)))
        );
    }

    #[test]
    fn test_buttons_absent_for_single_image() {
        assert_eq!(binding_for(ModalInput::Pointer(Pointer::NextButton), false), None);
        assert_eq!(binding_for(ModalInput::Pointer(Pointer::Dot(0)), false), None);
        // Keys still reach the carousel, where they are harmless
        assert_eq!(
            binding_for(ModalInput::Key(Key::ArrowLeft), false),
            Some(Binding::Carousel(CarouselCommand::Prev))
        );
    }
}
