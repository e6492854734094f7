//! Filesystem notifications for the upgrade marker.
//!
//! notify delivers events from its own background thread into an mpsc
//! channel. This module consumes that channel on the caller's thread and
//! invokes the marker handler synchronously, so the handler never runs twice
//! at once and events queue up behind a running upgrade.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::Result;
use crate::paths::{is_marker, UPGRADE_MARKER};

pub struct MarkerWatcher {
    // Dropping the watcher closes the channel.
    watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    data_dir: PathBuf,
}

impl MarkerWatcher {
    /// Subscribe to non-recursive notifications on `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;

        tracing::info!("watching for {} in {}", UPGRADE_MARKER, data_dir.display());
        Ok(Self {
            watcher,
            events,
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Block until the notification channel closes, calling `on_marker` for
    /// every qualifying marker event.
    pub fn run(self, on_marker: impl FnMut(&Event)) -> usize {
        let MarkerWatcher {
            watcher, events, ..
        } = self;
        let handled = consume_events(events, on_marker);
        drop(watcher);
        handled
    }
}

/// Drain `events`, invoking `on_marker` for each create/write of the marker
/// file. Channel errors are logged and skipped. Returns the number of marker
/// events handled once the source is exhausted.
pub fn consume_events<I>(events: I, mut on_marker: impl FnMut(&Event)) -> usize
where
    I: IntoIterator<Item = notify::Result<Event>>,
{
    let mut handled = 0;
    for res in events {
        match res {
            Ok(event) => {
                if marker_trigger(&event).is_some() {
                    tracing::info!("detected {} file event: {:?}", UPGRADE_MARKER, event.kind);
                    on_marker(&event);
                    handled += 1;
                }
            }
            Err(e) => tracing::warn!("watcher error: {e}"),
        }
    }
    tracing::info!("file watcher channel closed");
    handled
}

/// The marker path carried by `event`, if the event is a create or write of
/// the marker. A file renamed into the directory counts as a create.
pub fn marker_trigger(event: &Event) -> Option<&Path> {
    let path = match event.kind {
        EventKind::Create(_)
        | EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.first(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.last(),
        _ => None,
    }?;
    is_marker(path).then_some(path.as_path())
}
