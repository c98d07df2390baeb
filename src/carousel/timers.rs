// Per-carousel timers, kept as deadlines so the owner decides when time passes

use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimerKind {
    /// One-shot end of the running crossfade
    Crossfade,
    /// One-shot end of the manual-interaction pause
    PauseCooldown,
    /// Recurring auto-advance tick
    AutoAdvance,
}

impl TimerKind {
    /// Fire order when deadlines coincide.
    const ORDER: [TimerKind; 3] = [
        TimerKind::Crossfade,
        TimerKind::PauseCooldown,
        TimerKind::AutoAdvance,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    crossfade: Option<Instant>,
    pause_cooldown: Option<Instant>,
    auto_advance: Option<Instant>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<Instant> {
        match kind {
            TimerKind::Crossfade => &mut self.crossfade,
            TimerKind::PauseCooldown => &mut self.pause_cooldown,
            TimerKind::AutoAdvance => &mut self.auto_advance,
        }
    }

    /// Arms `kind` at `at`, replacing any earlier deadline for it.
    pub fn schedule(&mut self, kind: TimerKind, at: Instant) {
        *self.slot(kind) = Some(at);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        *self.slot(kind) = None;
    }

    pub fn cancel_all(&mut self) {
        self.crossfade = None;
        self.pause_cooldown = None;
        self.auto_advance = None;
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        match kind {
            TimerKind::Crossfade => self.crossfade,
            TimerKind::PauseCooldown => self.pause_cooldown,
            TimerKind::AutoAdvance => self.auto_advance,
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadline(kind).is_some()
    }

    pub fn is_idle(&self) -> bool {
        TimerKind::ORDER.iter().all(|kind| !self.is_armed(*kind))
    }

    /// Earliest armed deadline, ties broken by `TimerKind::ORDER`.
    pub fn next_due(&self) -> Option<(TimerKind, Instant)> {
        TimerKind::ORDER
            .iter()
            .filter_map(|kind| self.deadline(*kind).map(|at| (*kind, at)))
            .fold(None, |best, candidate| match best {
                Some((_, at)) if at <= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    /// Disarms and returns the earliest timer whose deadline is `<= now`.
    pub fn take_due(&mut self, now: Instant) -> Option<(TimerKind, Instant)> {
        let (kind, at) = self.next_due()?;
        if at > now {
            return None;
        }
        self.cancel(kind);
        Some((kind, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_take_due_respects_deadlines() {
        let start = Instant::now();
        let mut timers = TimerSet::new();
        timers.schedule(TimerKind::AutoAdvance, start + Duration::from_millis(3000));
        timers.schedule(TimerKind::Crossfade, start + Duration::from_millis(300));

        assert_eq!(timers.take_due(start + Duration::from_millis(100)), None);

        let fired = timers.take_due(start + Duration::from_millis(5000));
        assert_eq!(fired.map(|(kind, _)| kind), Some(TimerKind::Crossfade));
        let fired = timers.take_due(start + Duration::from_millis(5000));
        assert_eq!(fired.map(|(kind, _)| kind), Some(TimerKind::AutoAdvance));
        assert!(timers.is_idle());
    }

    #[test]
    fn test_ties_fire_crossfade_first() {
        let start = Instant::now();
        let at = start + Duration::from_millis(300);
        let mut timers = TimerSet::new();
        timers.schedule(TimerKind::AutoAdvance, at);
        timers.schedule(TimerKind::PauseCooldown, at);
        timers.schedule(TimerKind::Crossfade, at);

        let order: Vec<TimerKind> = std::iter::from_fn(|| timers.take_due(at))
            .map(|(kind, _)| kind)
            .collect();
        assert_eq!(
            order,
            vec![
                TimerKind::Crossfade,
                TimerKind::PauseCooldown,
                TimerKind::AutoAdvance
            ]
        );
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let start = Instant::now();
        let mut timers = TimerSet::new();
        timers.schedule(TimerKind::PauseCooldown, start + Duration::from_millis(5000));
        timers.schedule(TimerKind::PauseCooldown, start + Duration::from_millis(7000));

        assert_eq!(
            timers.deadline(TimerKind::PauseCooldown),
            Some(start + Duration::from_millis(7000))
        );
        timers.cancel_all();
        assert!(timers.is_idle());
    }
}
