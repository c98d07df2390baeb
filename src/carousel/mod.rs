// Gallery Carousel Module - crossfading image carousel of the portfolio modal
//
// The navigation rules live in a pure state machine; the controller adds the
// auto-advance, crossfade and pause-cooldown timers on top, and the driver
// runs a controller inside a tokio task against the real clock.

pub mod types;
pub mod state_machine;
pub mod timers;
pub mod controller;
pub mod driver;

#[cfg(test)]
pub mod tests;

pub use types::{
    CarouselPhase, CarouselSnapshot, Frame, GallerySequence, ImageItem, NavigationOrigin,
    NavigationOutcome,
};
pub use state_machine::{CarouselEvent, CarouselMachine};
pub use timers::{TimerKind, TimerSet};
pub use controller::GalleryCarousel;
pub use driver::{spawn_carousel, CarouselCommand, CarouselHandle};
