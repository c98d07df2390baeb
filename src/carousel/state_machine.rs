use serde::Serialize;
use statig::prelude::*;

use super::types::{CarouselPhase, GallerySequence, NavigationOrigin, NavigationOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum CarouselEvent {
    /// Modal opened: reset everything to the first image
    Open {
        #[serde(skip)]
        sequence: GallerySequence,
    },
    /// Fresh data for the already open item
    Replace {
        #[serde(skip)]
        sequence: GallerySequence,
    },
    GoTo {
        target: usize,
        origin: NavigationOrigin,
    },
    FadeComplete,
    Pause,
    Resume,
}

/// Navigation state of one open modal.
///
/// `Empty` holds no images, `Idle` shows `current_index`, `Transitioning`
/// crossfades from `current_index` to `pending_index`.
#[derive(Debug, Default)]
pub struct CarouselMachine {
    pub sequence: GallerySequence,
    pub current_index: usize,
    pub pending_index: Option<usize>,
    pub is_paused: bool,
    pub last_outcome: Option<NavigationOutcome>,
}

impl CarouselMachine {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&mut self, sequence: &GallerySequence) -> Outcome<State> {
        self.sequence = sequence.clone();
        self.current_index = 0;
        self.pending_index = None;
        self.is_paused = false;
        self.last_outcome = None;
        tracing::info!(images = self.sequence.len(), "Carousel opened");
        self.settle()
    }

    fn replace(&mut self, sequence: &GallerySequence) -> Outcome<State> {
        let dropped = self.pending_index.take();
        self.sequence = sequence.clone();
        if self.current_index >= self.sequence.len() {
            self.current_index = 0;
        }
        tracing::info!(
            images = self.sequence.len(),
            current_index = self.current_index,
            dropped_transition = ?dropped,
            "Carousel sequence replaced"
        );
        self.settle()
    }

    fn settle(&self) -> Outcome<State> {
        if self.sequence.is_empty() {
            Transition(State::empty())
        } else {
            Transition(State::idle())
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.is_paused != paused {
            tracing::debug!(paused, "Auto-advance pause changed");
        }
        self.is_paused = paused;
    }

    fn begin(&mut self, target: usize, origin: NavigationOrigin) -> Outcome<State> {
        let len = self.sequence.len();
        let outcome = if target >= len {
            NavigationOutcome::OutOfRange { target, len }
        } else if origin == NavigationOrigin::AutoAdvance && self.is_paused {
            NavigationOutcome::Skipped
        } else if target == self.current_index {
            NavigationOutcome::AlreadyCurrent
        } else {
            NavigationOutcome::Started {
                from: self.current_index,
                to: target,
            }
        };
        self.last_outcome = Some(outcome);

        match outcome {
            NavigationOutcome::Started { from, to } => {
                self.pending_index = Some(to);
                tracing::info!(from, to, origin = ?origin, "Crossfade started");
                Transition(State::transitioning())
            }
            other => {
                tracing::debug!(requested = target, outcome = ?other, "Navigation request not accepted");
                Handled
            }
        }
    }
}

#[state_machine(initial = "State::empty()")]
impl CarouselMachine {
    #[state]
    fn empty(&mut self, event: &CarouselEvent) -> Outcome<State> {
        match event {
            CarouselEvent::Open { sequence } => self.load(sequence),
            CarouselEvent::Replace { sequence } => self.replace(sequence),
            CarouselEvent::GoTo { .. } => {
                self.last_outcome = Some(NavigationOutcome::NoImages);
                Handled
            }
            CarouselEvent::Pause => {
                self.set_paused(true);
                Handled
            }
            CarouselEvent::Resume => {
                self.set_paused(false);
                Handled
            }
            CarouselEvent::FadeComplete => Handled,
        }
    }

    #[state]
    fn idle(&mut self, event: &CarouselEvent) -> Outcome<State> {
        match event {
            CarouselEvent::Open { sequence } => self.load(sequence),
            CarouselEvent::Replace { sequence } => self.replace(sequence),
            CarouselEvent::GoTo { target, origin } => self.begin(*target, *origin),
            CarouselEvent::Pause => {
                self.set_paused(true);
                Handled
            }
            CarouselEvent::Resume => {
                self.set_paused(false);
                Handled
            }
            CarouselEvent::FadeComplete => Handled,
        }
    }

    #[state]
    fn transitioning(&mut self, event: &CarouselEvent) -> Outcome<State> {
        match event {
            CarouselEvent::Open { sequence } => self.load(sequence),
            CarouselEvent::Replace { sequence } => self.replace(sequence),
            CarouselEvent::GoTo { target, origin } => {
                self.last_outcome = Some(NavigationOutcome::TransitionInFlight);
                tracing::debug!(
                    requested = *target,
                    origin = ?origin,
                    pending = ?self.pending_index,
                    "Transition in flight, request dropped"
                );
                Handled
            }
            CarouselEvent::FadeComplete => match self.pending_index.take() {
                Some(next) => {
                    self.current_index = next;
                    tracing::info!(current_index = next, "Crossfade complete");
                    Transition(State::idle())
                }
                None => Transition(State::idle()),
            },
            CarouselEvent::Pause => {
                self.set_paused(true);
                Handled
            }
            CarouselEvent::Resume => {
                self.set_paused(false);
                Handled
            }
        }
    }
}

impl CarouselMachine {
    pub fn phase(&self) -> CarouselPhase {
        if self.sequence.is_empty() {
            return CarouselPhase::Empty;
        }
        match self.pending_index {
            Some(pending) => CarouselPhase::Transitioning {
                current: self.current_index,
                pending,
            },
            None => CarouselPhase::Idle {
                current: self.current_index,
            },
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending_index.is_some()
    }
}
