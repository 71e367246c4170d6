//! File watcher service for watch mode.
//!
//! Monitors the input image and the config file, broadcasting debounced
//! change events to the render loop.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};

/// Quiet period collecting raw events into one change event
pub const DEBOUNCE: Duration = Duration::from_millis(150);

/// Event sent when watched files change
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Paths that changed
    pub paths: Vec<PathBuf>,
}

/// File watcher for a fixed set of files
pub struct FileWatcher {
    /// Broadcast sender for file change events
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    /// Flag indicating if watcher is active
    active: bool,
}

impl FileWatcher {
    /// Watch the given files. Must be called inside a tokio runtime.
    ///
    /// Files are watched through their parent directories so editors that
    /// replace a file on save are still seen.
    pub fn new(files: &[PathBuf]) -> Self {
        let (sender, _) = broadcast::channel(16);

        let targets: HashSet<PathBuf> = files
            .iter()
            .filter_map(|path| match path.canonicalize() {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Watch path does not exist");
                    None
                }
            })
            .collect();

        if targets.is_empty() {
            tracing::debug!("No watch paths, file watching disabled");
            return Self {
                sender,
                _watcher: None,
                active: false,
            };
        }

        let (watcher, active) = match Self::start_watcher(targets.clone(), sender.clone()) {
            Ok(watcher) => {
                tracing::info!(files = targets.len(), "File watcher started");
                (Some(watcher), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start file watcher");
                (None, false)
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        targets: HashSet<PathBuf>,
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        // Create a channel for raw events
        let (tx, mut rx) = mpsc::channel::<PathBuf>(100);

        // Spawn debouncing task
        let debounce_sender = sender;
        tokio::spawn(async move {
            let pending: Arc<Mutex<HashSet<PathBuf>>> = Arc::new(Mutex::new(HashSet::new()));
            let pending_clone = pending.clone();

            // Debounce timer task
            let debounce_sender_clone = debounce_sender.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(DEBOUNCE).await;
                    let mut guard = pending_clone.lock().await;
                    if !guard.is_empty() {
                        let paths: Vec<PathBuf> = guard.drain().collect();
                        tracing::debug!(paths = ?paths, "Files changed (debounced)");
                        let _ = debounce_sender_clone.send(FileChangeEvent { paths });
                    }
                }
            });

            // Receive raw events and add to pending set
            while let Some(path) = rx.recv().await {
                pending.lock().await.insert(path);
            }
        });

        let dirs: HashSet<PathBuf> = targets
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    if event.kind.is_access() {
                        return;
                    }
                    for path in event.paths {
                        if targets.contains(&path) {
                            let _ = tx.blocking_send(path);
                        }
                    }
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}
