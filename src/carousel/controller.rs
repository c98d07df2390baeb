use statig::prelude::*;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

use super::state_machine::{CarouselEvent, CarouselMachine};
use super::timers::{TimerKind, TimerSet};
use super::types::{
    CarouselPhase, CarouselSnapshot, Frame, GallerySequence, ImageItem, NavigationOrigin,
    NavigationOutcome,
};
use crate::config::CarouselTimings;

/// Image carousel of one open portfolio modal.
///
/// Owns the navigation state machine and its three timers. Every operation
/// takes the instant it happens at; `advance` fires whatever timers are due.
/// The async driver feeds it the wall clock, tests feed it synthetic instants.
pub struct GalleryCarousel {
    machine: StateMachine<CarouselMachine>,
    timers: TimerSet,
    timings: CarouselTimings,
    fade_started_at: Option<Instant>,
}

impl GalleryCarousel {
    pub fn new(timings: CarouselTimings) -> Self {
        Self {
            machine: CarouselMachine::new().state_machine(),
            timers: TimerSet::new(),
            timings,
            fade_started_at: None,
        }
    }

    /// Builds a carousel and opens it on `sequence`.
    pub fn opened(timings: CarouselTimings, sequence: GallerySequence, now: Instant) -> Self {
        let mut carousel = Self::new(timings);
        carousel.open(sequence, now);
        carousel
    }

    /// Resets to the first image with auto-advance active.
    pub fn open(&mut self, sequence: GallerySequence, now: Instant) {
        self.timers.cancel_all();
        self.fade_started_at = None;
        self.machine.handle(&CarouselEvent::Open { sequence });
        self.arm_auto_advance(now);
    }

    /// Swaps in fresh data for the item already on screen.
    pub fn replace_sequence(&mut self, sequence: GallerySequence, now: Instant) {
        self.timers.cancel(TimerKind::Crossfade);
        self.fade_started_at = None;
        self.machine.handle(&CarouselEvent::Replace { sequence });

        if self.len() <= 1 {
            self.timers.cancel(TimerKind::AutoAdvance);
        } else if !self.timers.is_armed(TimerKind::AutoAdvance) {
            self.arm_auto_advance(now);
        }
    }

    /// Manual jump to `target`. Pauses auto-advance whenever there is
    /// something to navigate, even if the jump itself is not accepted.
    pub fn request_go_to(&mut self, target: usize, now: Instant) -> NavigationOutcome {
        if self.len() == 0 {
            return NavigationOutcome::NoImages;
        }
        self.pause_auto_advance(now);
        self.navigate(target, NavigationOrigin::Manual, now)
    }

    pub fn next(&mut self, now: Instant) -> NavigationOutcome {
        match self.sequence().next_index(self.machine.inner().current_index) {
            Some(target) => self.request_go_to(target, now),
            None => NavigationOutcome::NoImages,
        }
    }

    pub fn prev(&mut self, now: Instant) -> NavigationOutcome {
        match self.sequence().prev_index(self.machine.inner().current_index) {
            Some(target) => self.request_go_to(target, now),
            None => NavigationOutcome::NoImages,
        }
    }

    /// Suspends auto-advance and restarts the cooldown from zero.
    pub fn pause_auto_advance(&mut self, now: Instant) {
        if self.len() == 0 {
            return;
        }
        self.machine.handle(&CarouselEvent::Pause);
        self.timers.cancel(TimerKind::AutoAdvance);
        self.timers
            .schedule(TimerKind::PauseCooldown, now + self.timings.pause_cooldown());
    }

    /// One auto-advance step. Never pauses auto-advance itself.
    pub fn tick(&mut self, at: Instant) -> NavigationOutcome {
        let context = self.machine.inner();
        if context.is_paused {
            debug!("Auto-advance tick skipped, paused");
            return NavigationOutcome::Skipped;
        }
        if context.is_transitioning() {
            debug!("Auto-advance tick skipped, transition in flight");
            return NavigationOutcome::TransitionInFlight;
        }
        match self.sequence().next_index(context.current_index) {
            Some(target) => self.navigate(target, NavigationOrigin::AutoAdvance, at),
            None => NavigationOutcome::NoImages,
        }
    }

    /// Fires every timer due at or before `now`, each at its own deadline.
    pub fn advance(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        while let Some((kind, at)) = self.timers.take_due(now) {
            match kind {
                TimerKind::Crossfade => {
                    self.fade_started_at = None;
                    self.machine.handle(&CarouselEvent::FadeComplete);
                }
                TimerKind::PauseCooldown => {
                    self.machine.handle(&CarouselEvent::Resume);
                    info!("Auto-advance resumed after cooldown");
                    self.arm_auto_advance(at);
                }
                TimerKind::AutoAdvance => {
                    self.arm_auto_advance(at);
                    self.tick(at);
                }
            }
            fired.push(kind);
        }
        fired
    }

    /// Cancels every timer and drops the state.
    pub fn close(mut self) {
        self.timers.cancel_all();
        self.fade_started_at = None;
        info!(images = self.len(), "Carousel closed");
    }

    fn navigate(&mut self, target: usize, origin: NavigationOrigin, at: Instant) -> NavigationOutcome {
        self.machine.handle(&CarouselEvent::GoTo { target, origin });
        let outcome = self
            .machine
            .inner()
            .last_outcome
            .unwrap_or(NavigationOutcome::NoImages);

        if outcome.is_started() {
            self.fade_started_at = Some(at);
            self.timers
                .schedule(TimerKind::Crossfade, at + self.timings.crossfade());
        }
        outcome
    }

    fn arm_auto_advance(&mut self, from: Instant) {
        if self.len() > 1 && !self.is_paused() {
            self.timers
                .schedule(TimerKind::AutoAdvance, from + self.timings.auto_advance_interval());
        } else {
            self.timers.cancel(TimerKind::AutoAdvance);
        }
    }
}

impl GalleryCarousel {
    pub fn phase(&self) -> CarouselPhase {
        self.machine.inner().phase()
    }

    pub fn sequence(&self) -> &GallerySequence {
        &self.machine.inner().sequence
    }

    pub fn len(&self) -> usize {
        self.sequence().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence().is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.machine.inner().current_index)
    }

    pub fn pending_index(&self) -> Option<usize> {
        self.machine.inner().pending_index
    }

    pub fn is_paused(&self) -> bool {
        self.machine.inner().is_paused
    }

    pub fn current_image(&self) -> Option<&ImageItem> {
        self.current_index().and_then(|index| self.sequence().get(index))
    }

    /// Prev/next buttons and dots only make sense with two images or more.
    pub fn shows_navigation(&self) -> bool {
        self.len() > 1
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn timings(&self) -> &CarouselTimings {
        &self.timings
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due().map(|(_, at)| at)
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            phase: self.phase(),
            len: self.len(),
            is_paused: self.is_paused(),
            current: self.current_image().cloned(),
            pending: self
                .pending_index()
                .and_then(|index| self.sequence().get(index))
                .cloned(),
        }
    }

    pub fn counter_label(&self) -> Option<String> {
        self.snapshot().counter_label()
    }

    /// Crossfade opacity of the incoming image rises linearly from 0 to 1.
    pub fn frame(&self, now: Instant) -> Frame {
        let sequence = self.sequence();
        match self.phase() {
            CarouselPhase::Empty => Frame::Placeholder,
            CarouselPhase::Idle { current } => sequence
                .get(current)
                .cloned()
                .map(Frame::Still)
                .unwrap_or(Frame::Placeholder),
            CarouselPhase::Transitioning { current, pending } => {
                let (Some(base), Some(overlay)) = (sequence.get(current), sequence.get(pending))
                else {
                    return Frame::Placeholder;
                };
                let fade = self.timings.crossfade();
                let elapsed = self
                    .fade_started_at
                    .map(|start| now.saturating_duration_since(start))
                    .unwrap_or_default();
                let opacity = if fade.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / fade.as_secs_f32()).clamp(0.0, 1.0)
                };
                Frame::Crossfade {
                    base: base.clone(),
                    overlay: overlay.clone(),
                    opacity,
                }
            }
        }
    }
}

impl fmt::Debug for GalleryCarousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryCarousel")
            .field("phase", &self.phase())
            .field("len", &self.len())
            .field("is_paused", &self.is_paused())
            .field("timers", &self.timers)
            .finish()
    }
}
