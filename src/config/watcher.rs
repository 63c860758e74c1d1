// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reloading chart settings.
//!
//! The viewer keeps its job snapshot while the config file changes; each
//! successful reload only re-derives the chart and lyrics with the new
//! settings.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::ConfigFile;

/// Events emitted by the settings watcher
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// Config file was modified and successfully reloaded
    Reloaded(Box<ConfigFile>),
    /// Config file was modified but failed to parse
    Error(String),
}

/// Debounced watcher on a single config file
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<SettingsEvent>,
    watched_path: PathBuf,
}

impl SettingsWatcher {
    /// Watch `path` for changes.
    ///
    /// The parent directory is watched, so editors that replace the file
    /// on save are still picked up.
    ///
    /// # Arguments
    /// * `path` - Config file to watch
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 300)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(300));
        let file_name = watched_path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| anyhow!("Config path has no file name: {:?}", watched_path))?;
        let watch_dir = match watched_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx): (Sender<SettingsEvent>, Receiver<SettingsEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watch_dir, e))?;

        let reload_path = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(event) => {
                        let relevant = matches!(
                            event.kind,
                            EventKind::Create(_) | EventKind::Modify(_)
                        ) && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == Some(file_name.as_os_str()));

                        if relevant {
                            last_event_time = Some(Instant::now());
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let Some(last_time) = last_event_time else {
                            continue;
                        };
                        if last_time.elapsed() < debounce_duration {
                            continue;
                        }
                        last_event_time = None;

                        let event = match ConfigFile::load(&reload_path) {
                            Ok(config) => {
                                debug!(path = ?reload_path, "settings reloaded");
                                SettingsEvent::Reloaded(Box::new(config))
                            }
                            Err(e) => {
                                warn!(path = ?reload_path, error = %e, "settings reload failed");
                                SettingsEvent::Error(format!("Failed to load {:?}: {}", reload_path, e))
                            }
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit thread
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next settings event (non-blocking)
    pub fn try_recv(&self) -> Option<SettingsEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending settings events
    pub fn recv_all(&self) -> Vec<SettingsEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Validate a configuration file without applying it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
    ConfigFile::load(path)
}
