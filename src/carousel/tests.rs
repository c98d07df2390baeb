// Tests for the gallery carousel controller, driven with synthetic instants

#[cfg(test)]
mod tests {
    use super::super::controller::GalleryCarousel;
    use super::super::timers::TimerKind;
    use super::super::types::*;
    use crate::config::CarouselTimings;
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn sequence(n: usize) -> GallerySequence {
        (0..n)
            .map(|i| ImageItem::with_caption(format!("/uploads/{i}.jpg"), format!("Photo {i}")))
            .collect()
    }

    fn open(n: usize) -> (GalleryCarousel, Instant) {
        let start = Instant::now();
        let carousel = GalleryCarousel::opened(CarouselTimings::default(), sequence(n), start);
        (carousel, start)
    }

    #[test]
    fn test_open_starts_idle_at_first_image() {
        let (carousel, start) = open(3);

        assert_eq!(carousel.phase(), CarouselPhase::Idle { current: 0 });
        assert_eq!(carousel.pending_index(), None);
        assert!(!carousel.is_paused());
        assert!(carousel.shows_navigation());
        assert_eq!(
            carousel.timers().deadline(TimerKind::AutoAdvance),
            Some(start + ms(3000))
        );
        assert_eq!(carousel.counter_label().as_deref(), Some("Image 1 of 3"));
    }

    #[test]
    fn test_go_to_completes_after_crossfade() {
        let (mut carousel, start) = open(3);

        let outcome = carousel.request_go_to(1, start);
        assert_eq!(outcome, NavigationOutcome::Started { from: 0, to: 1 });
        assert_eq!(carousel.pending_index(), Some(1));

        carousel.advance(start + ms(299));
        assert_eq!(carousel.current_index(), Some(0));

        carousel.advance(start + ms(300));
        assert_eq!(carousel.current_index(), Some(1));
        assert_eq!(carousel.pending_index(), None);
        assert_eq!(carousel.phase(), CarouselPhase::Idle { current: 1 });
    }

    #[test]
    fn test_rapid_duplicate_request_is_dropped() {
        let (mut carousel, start) = open(3);

        carousel.request_go_to(1, start);
        let second = carousel.request_go_to(1, start + ms(100));
        assert_eq!(second, NavigationOutcome::TransitionInFlight);

        // The dropped request must not extend the crossfade
        carousel.advance(start + ms(300));
        assert_eq!(carousel.current_index(), Some(1));
        assert_eq!(carousel.pending_index(), None);
    }

    #[test]
    fn test_go_to_current_is_noop() {
        let (mut carousel, start) = open(3);
        let before = carousel.snapshot();

        let outcome = carousel.request_go_to(0, start);

        assert_eq!(outcome, NavigationOutcome::AlreadyCurrent);
        assert_eq!(carousel.phase(), before.phase);
        assert!(!carousel.timers().is_armed(TimerKind::Crossfade));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let (mut carousel, start) = open(3);

        let outcome = carousel.request_go_to(3, start);

        assert_eq!(outcome, NavigationOutcome::OutOfRange { target: 3, len: 3 });
        assert_eq!(carousel.phase(), CarouselPhase::Idle { current: 0 });
    }

    #[test]
    fn test_wraps_in_both_directions() {
        let (mut carousel, start) = open(3);

        assert_eq!(
            carousel.prev(start),
            NavigationOutcome::Started { from: 0, to: 2 }
        );
        carousel.advance(start + ms(300));
        assert_eq!(carousel.current_index(), Some(2));

        assert_eq!(
            carousel.next(start + ms(400)),
            NavigationOutcome::Started { from: 2, to: 0 }
        );
        carousel.advance(start + ms(700));
        assert_eq!(carousel.current_index(), Some(0));
    }

    #[test]
    fn test_next_then_prev_returns_to_origin() {
        for len in 2..6 {
            let (mut carousel, start) = open(len);
            carousel.next(start);
            carousel.advance(start + ms(300));
            carousel.prev(start + ms(300));
            carousel.advance(start + ms(600));
            assert_eq!(carousel.current_index(), Some(0), "len {len}");
        }
    }

    #[test]
    fn test_auto_advance_moves_without_pausing() {
        let (mut carousel, start) = open(3);

        let fired = carousel.advance(start + ms(3000));
        assert_eq!(fired, vec![TimerKind::AutoAdvance]);
        assert_eq!(carousel.pending_index(), Some(1));
        assert!(!carousel.is_paused());

        carousel.advance(start + ms(3300));
        assert_eq!(carousel.current_index(), Some(1));

        carousel.advance(start + ms(6300));
        assert_eq!(carousel.current_index(), Some(2));

        carousel.advance(start + ms(9300));
        assert_eq!(carousel.current_index(), Some(0));
    }

    #[test]
    fn test_manual_navigation_pauses_for_cooldown() {
        let (mut carousel, start) = open(4);

        carousel.request_go_to(2, start + ms(1000));
        assert!(carousel.is_paused());
        assert!(!carousel.timers().is_armed(TimerKind::AutoAdvance));

        // Well past the old auto-advance deadline: nothing moves
        carousel.advance(start + ms(5999));
        assert!(carousel.is_paused());
        assert_eq!(carousel.current_index(), Some(2));

        carousel.advance(start + ms(6000));
        assert!(!carousel.is_paused());
        assert_eq!(
            carousel.timers().deadline(TimerKind::AutoAdvance),
            Some(start + ms(9000))
        );

        carousel.advance(start + ms(9300));
        assert_eq!(carousel.current_index(), Some(3));
    }

    #[test]
    fn test_cooldown_restarts_on_each_interaction() {
        let (mut carousel, start) = open(4);

        carousel.request_go_to(1, start);
        carousel.advance(start + ms(4000));
        carousel.request_go_to(2, start + ms(4000));

        carousel.advance(start + ms(8999));
        assert!(carousel.is_paused(), "cooldown restarted at 4000 ms");

        carousel.advance(start + ms(9000));
        assert!(!carousel.is_paused());
    }

    #[test]
    fn test_rejected_manual_request_still_pauses() {
        let (mut carousel, start) = open(3);

        carousel.request_go_to(0, start);
        assert!(carousel.is_paused());
    }

    #[test]
    fn test_tick_is_noop_while_paused_or_transitioning() {
        let (mut carousel, start) = open(3);

        carousel.pause_auto_advance(start);
        let before = carousel.snapshot();
        assert_eq!(carousel.tick(start + ms(10)), NavigationOutcome::Skipped);
        assert_eq!(carousel.snapshot(), before);

        let (mut carousel, start) = open(3);
        carousel.advance(start + ms(3000));
        assert_eq!(carousel.pending_index(), Some(1));
        let before = carousel.snapshot();
        assert_eq!(
            carousel.tick(start + ms(3100)),
            NavigationOutcome::TransitionInFlight
        );
        assert_eq!(carousel.snapshot(), before);
    }

    #[test]
    fn test_single_image_has_no_timer_and_no_navigation() {
        let (mut carousel, start) = open(1);

        assert!(!carousel.shows_navigation());
        assert!(carousel.timers().is_idle());
        assert!(carousel.advance(start + ms(60_000)).is_empty());
        assert_eq!(carousel.current_index(), Some(0));
    }

    #[test]
    fn test_empty_sequence_renders_placeholder() {
        let (mut carousel, start) = open(0);

        assert_eq!(carousel.phase(), CarouselPhase::Empty);
        assert_eq!(carousel.frame(start), Frame::Placeholder);
        assert!(carousel.timers().is_idle());
        assert_eq!(carousel.request_go_to(0, start), NavigationOutcome::NoImages);
        assert_eq!(carousel.next(start), NavigationOutcome::NoImages);
        assert!(!carousel.is_paused());
        assert!(carousel.timers().is_idle());
        assert_eq!(carousel.counter_label(), None);
    }

    #[test]
    fn test_crossfade_frame_opacity() {
        let (mut carousel, start) = open(2);

        assert!(matches!(carousel.frame(start), Frame::Still(ref image) if image.source == "/uploads/0.jpg"));

        carousel.request_go_to(1, start);
        match carousel.frame(start + ms(150)) {
            Frame::Crossfade {
                base,
                overlay,
                opacity,
            } => {
                assert_eq!(base.source, "/uploads/0.jpg");
                assert_eq!(overlay.source, "/uploads/1.jpg");
                assert!((opacity - 0.5).abs() < 1e-3);
            }
            other => panic!("expected a crossfade, got {other:?}"),
        }

        match carousel.frame(start) {
            Frame::Crossfade { opacity, .. } => assert_eq!(opacity, 0.0),
            other => panic!("expected a crossfade, got {other:?}"),
        }

        carousel.advance(start + ms(300));
        assert!(matches!(carousel.frame(start + ms(300)), Frame::Still(ref image) if image.source == "/uploads/1.jpg"));
    }

    #[test]
    fn test_replace_sequence_keeps_valid_index() {
        let (mut carousel, start) = open(4);
        carousel.request_go_to(3, start);
        carousel.advance(start + ms(300));

        carousel.replace_sequence(sequence(6), start + ms(400));
        assert_eq!(carousel.current_index(), Some(3));
        assert!(carousel.is_paused());

        carousel.replace_sequence(sequence(2), start + ms(500));
        assert_eq!(carousel.current_index(), Some(0));
        assert_eq!(carousel.len(), 2);

        carousel.replace_sequence(sequence(1), start + ms(600));
        assert!(!carousel.timers().is_armed(TimerKind::AutoAdvance));
        assert!(!carousel.shows_navigation());
    }

    #[test]
    fn test_replace_from_empty_arms_auto_advance() {
        let (mut carousel, start) = open(0);

        carousel.replace_sequence(sequence(3), start + ms(200));

        assert_eq!(carousel.phase(), CarouselPhase::Idle { current: 0 });
        assert_eq!(
            carousel.timers().deadline(TimerKind::AutoAdvance),
            Some(start + ms(3200))
        );
    }

    #[test]
    fn test_reopen_resets_everything() {
        let (mut carousel, start) = open(3);
        carousel.request_go_to(2, start);

        carousel.open(sequence(5), start + ms(100));

        assert_eq!(carousel.phase(), CarouselPhase::Idle { current: 0 });
        assert!(!carousel.is_paused());
        assert!(!carousel.timers().is_armed(TimerKind::Crossfade));
        assert!(!carousel.timers().is_armed(TimerKind::PauseCooldown));
        assert_eq!(carousel.len(), 5);
    }

    #[test]
    fn test_late_advance_replays_each_deadline() {
        let (mut carousel, start) = open(3);

        // 3000 tick, 3300 fade, 6000 tick, 6300 fade
        let fired = carousel.advance(start + ms(6500));
        assert_eq!(
            fired,
            vec![
                TimerKind::AutoAdvance,
                TimerKind::Crossfade,
                TimerKind::AutoAdvance,
                TimerKind::Crossfade
            ]
        );
        assert_eq!(carousel.current_index(), Some(2));
    }

    #[derive(Debug, Clone)]
    enum Op {
        GoTo(usize),
        Next,
        Prev,
        Pause,
        Wait(u64),
        Replace(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..8).prop_map(Op::GoTo),
            Just(Op::Next),
            Just(Op::Prev),
            Just(Op::Pause),
            (0u64..7000).prop_map(Op::Wait),
            (0usize..6).prop_map(Op::Replace),
        ]
    }

    proptest! {
        #[test]
        fn prop_index_always_valid(len in 1usize..6, ops in proptest::collection::vec(op(), 0..60)) {
            let start = Instant::now();
            let mut carousel = GalleryCarousel::opened(CarouselTimings::default(), sequence(len), start);
            let mut now = start;

            for op in ops {
                match op {
                    Op::GoTo(target) => { carousel.request_go_to(target, now); }
                    Op::Next => { carousel.next(now); }
                    Op::Prev => { carousel.prev(now); }
                    Op::Pause => carousel.pause_auto_advance(now),
                    Op::Wait(millis) => {
                        now += Duration::from_millis(millis);
                        carousel.advance(now);
                    }
                    Op::Replace(n) => carousel.replace_sequence(sequence(n), now),
                }

                match carousel.phase() {
                    CarouselPhase::Empty => prop_assert_eq!(carousel.len(), 0),
                    CarouselPhase::Idle { current } => {
                        prop_assert!(current < carousel.len());
                        prop_assert!(!carousel.timers().is_armed(TimerKind::Crossfade));
                    }
                    CarouselPhase::Transitioning { current, pending } => {
                        prop_assert!(current < carousel.len());
                        prop_assert!(pending < carousel.len());
                        prop_assert_ne!(current, pending);
                        prop_assert!(carousel.timers().is_armed(TimerKind::Crossfade));
                    }
                }
                if carousel.len() <= 1 {
                    prop_assert!(!carousel.timers().is_armed(TimerKind::AutoAdvance));
                }
            }
        }
    }
}
