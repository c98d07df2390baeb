use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn, Instrument};

use super::controller::GalleryCarousel;
use super::types::{CarouselSnapshot, GallerySequence};
use crate::config::CarouselTimings;

/// Inputs accepted by a running carousel task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselCommand {
    Open(GallerySequence),
    Replace(GallerySequence),
    GoTo(usize),
    Next,
    Prev,
    Pause,
    Close,
}

/// Owner side of a spawned carousel task.
///
/// Commands from every input source go through one ordered channel, so a
/// keyboard press and a click arriving together are applied one after the
/// other. Dropping the handle aborts the task and with it every timer.
#[derive(Debug)]
pub struct CarouselHandle {
    commands: mpsc::UnboundedSender<CarouselCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    task: Option<JoinHandle<()>>,
}

/// Spawns the carousel task and opens it on `sequence`.
pub fn spawn_carousel(timings: CarouselTimings, sequence: GallerySequence) -> CarouselHandle {
    let carousel = GalleryCarousel::opened(timings, sequence, Instant::now().into_std());
    let (commands, receiver) = mpsc::unbounded_channel();
    let (publisher, snapshots) = watch::channel(carousel.snapshot());

    let span = tracing::info_span!("carousel", images = carousel.len());
    let task = tokio::spawn(run_carousel(carousel, receiver, publisher).instrument(span));

    CarouselHandle {
        commands,
        snapshots,
        task: Some(task),
    }
}

async fn run_carousel(
    mut carousel: GalleryCarousel,
    mut commands: mpsc::UnboundedReceiver<CarouselCommand>,
    publisher: watch::Sender<CarouselSnapshot>,
) {
    loop {
        let deadline = carousel.next_deadline().map(Instant::from_std);

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Command channel closed");
                    break;
                };
                if command == CarouselCommand::Close {
                    break;
                }
                apply(&mut carousel, command);
            }
            _ = sleep_until(deadline.unwrap_or_else(far_future)), if deadline.is_some() => {
                let fired = carousel.advance(Instant::now().into_std());
                debug!(?fired, "Timers fired");
            }
        }

        publisher.send_if_modified(|current| {
            let next = carousel.snapshot();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    carousel.close();
    publisher.send_replace(CarouselSnapshot::closed());
}

fn apply(carousel: &mut GalleryCarousel, command: CarouselCommand) {
    let now = Instant::now().into_std();
    match command {
        CarouselCommand::Open(sequence) => carousel.open(sequence, now),
        CarouselCommand::Replace(sequence) => carousel.replace_sequence(sequence, now),
        CarouselCommand::GoTo(target) => {
            let outcome = carousel.request_go_to(target, now);
            debug!(target_index = target, ?outcome, "Dot navigation");
        }
        CarouselCommand::Next => {
            let outcome = carousel.next(now);
            debug!(?outcome, "Next navigation");
        }
        CarouselCommand::Prev => {
            let outcome = carousel.prev(now);
            debug!(?outcome, "Previous navigation");
        }
        CarouselCommand::Pause => carousel.pause_auto_advance(now),
        CarouselCommand::Close => {}
    }
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365)
}

impl CarouselHandle {
    /// Queues a command; returns false once the task has stopped.
    pub fn send(&self, command: CarouselCommand) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!(command = ?e.0, "Carousel task is gone, command dropped");
                false
            }
        }
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the task and waits until its timers are gone.
    pub async fn close(mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = self.commands.send(CarouselCommand::Close);
        if let Err(e) = task.await {
            warn!(error = %e, "Carousel task ended abnormally");
        }
        info!("Carousel task stopped");
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
