use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::Visibility;
use crate::util::sysfs::read_sysfs_string;
use log::{debug, warn};

const DEBOUNCE: Duration = Duration::from_millis(50);

/// Read the visibility file. A missing or unreadable file means hidden.
pub fn read_visibility(path: &Path) -> Visibility {
    match read_sysfs_string(path) {
        Ok(state) => Visibility::from_state(&state),
        Err(e) => {
            debug!("Visibility file unavailable, treating as hidden: {e}");
            Visibility::Hidden
        }
    }
}

/// Watches a file whose contents say whether the consuming surface is shown,
/// and reports transitions.
pub struct VisibilityWatcher {
    rx: Receiver<Result<Event, notify::Error>>,
    _watcher: RecommendedWatcher, // keep watcher alive while watching
    path: PathBuf,
    current: Visibility,
    last_event_time: Instant,
}

impl VisibilityWatcher {
    /// Start watching `path`. The file may not exist yet; its directory must.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, notify::Error> {
        let path = path.into();
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

        // Watch the directory so that files replaced by rename are still seen.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let current = read_visibility(&path);
        Ok(Self {
            rx,
            _watcher: watcher,
            path,
            current,
            last_event_time: Instant::now(),
        })
    }

    pub const fn current(&self) -> Visibility {
        self.current
    }

    /// Drain pending file events and return the new visibility if it changed.
    pub fn check_for_changes(&mut self) -> Option<Visibility> {
        let mut touched = false;

        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if self.concerns_us(&event) {
                        touched = true;
                        self.last_event_time = Instant::now();
                    }
                }
                Ok(Err(e)) => {
                    warn!("Error watching visibility file: {e}");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Visibility watcher channel disconnected");
                    return None;
                }
            }
        }

        if !touched {
            return None;
        }

        // Let writers finish before reading the new state.
        let since = self.last_event_time.elapsed();
        if since < DEBOUNCE {
            thread::sleep(DEBOUNCE - since);
        }

        let visibility = read_visibility(&self.path);
        if visibility == self.current {
            return None;
        }
        self.current = visibility;
        Some(visibility)
    }

    fn concerns_us(&self, event: &Event) -> bool {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return false;
        }
        let name = self.path.file_name();
        event
            .paths
            .iter()
            .any(|p| p == &self.path || (name.is_some() && p.file_name() == name))
    }
}
