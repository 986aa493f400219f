use crate::core::Visibility;
use crate::monitor::Sampler;
use crate::presenter::{self, Presenter};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread;
use std::time::Duration;

/// Drives a [`Sampler`] on a fixed interval and hands every snapshot to a
/// [`Presenter`].
///
/// The scheduler is either stopped or running with exactly one timer thread.
/// `start` on a running scheduler and `stop` on a stopped one do nothing.
pub struct Scheduler<P: Presenter + Send + 'static> {
    interval: Duration,
    pipeline: Arc<Mutex<Pipeline<P>>>,
    timer: Option<Timer>,
}

struct Pipeline<P> {
    sampler: Sampler,
    presenter: P,
}

// Dropping the sender wakes the timer thread and ends it.
struct Timer {
    _cancel: Sender<()>,
}

impl<P: Presenter + Send + 'static> Scheduler<P> {
    pub fn new(sampler: Sampler, presenter: P, interval: Duration) -> Self {
        Self {
            interval,
            pipeline: Arc::new(Mutex::new(Pipeline { sampler, presenter })),
            timer: None,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Sample immediately, then once per interval until stopped.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            debug!("Scheduler already running, ignoring start");
            return;
        }

        let (cancel, cancelled) = mpsc::channel::<()>();
        let pipeline = Arc::clone(&self.pipeline);
        let interval = self.interval;

        let spawned = thread::Builder::new()
            .name("pstatectl-timer".to_string())
            .spawn(move || {
                // a tick left over from before a restart may still be running;
                // the first sample waits for it instead of being skipped.
                tick(&pipeline, Wait::Block);
                loop {
                    match cancelled.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => tick(&pipeline, Wait::SkipIfBusy),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Timer thread exiting");
            });

        match spawned {
            Ok(_) => {
                info!("Sampling every {}ms", interval.as_millis());
                self.timer = Some(Timer { _cancel: cancel });
            }
            Err(e) => error!("Failed to spawn timer thread: {e}"),
        }
    }

    /// Prevent future ticks. A tick already in progress runs to completion.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            info!("Sampling stopped");
        }
    }

    pub fn on_visibility_changed(&mut self, visibility: Visibility) {
        debug!("Visibility changed: {visibility:?}");
        match visibility {
            Visibility::Shown => self.start(),
            Visibility::Hidden => self.stop(),
        }
    }
}

impl<P: Presenter + Send + 'static> Drop for Scheduler<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    Block,
    SkipIfBusy,
}

fn tick<P: Presenter>(pipeline: &Mutex<Pipeline<P>>, wait: Wait) {
    let locked = match wait {
        Wait::Block => pipeline.lock().map_err(TryLockError::from),
        Wait::SkipIfBusy => pipeline.try_lock(),
    };
    let mut guard = match locked {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => {
            debug!("Previous tick still in flight, skipping");
            return;
        }
        Err(TryLockError::Poisoned(poisoned)) => {
            warn!("A previous tick panicked, continuing with its state");
            poisoned.into_inner()
        }
    };

    let Pipeline { sampler, presenter } = &mut *guard;
    let snapshot = sampler.sample();
    presenter::present(presenter, &snapshot);
}
