//! Process-wide dark-mode switch with change notification.
//!
//! One `ThemeSetting` is shared (cheap `Clone`) by the progress store and
//! every themed view. Views read `is_dark()` when they paint; anything that
//! caches themed resources subscribes and drains its receiver each frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Broadcast when the effective theme flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub dark: bool,
}

#[derive(Debug)]
struct ThemeInner {
    dark: bool,
    subscribers: Vec<Sender<ThemeChange>>,
}

#[derive(Debug, Clone)]
pub struct ThemeSetting {
    inner: Arc<Mutex<ThemeInner>>,
}

impl ThemeSetting {
    pub fn new(dark: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ThemeInner {
                dark,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ThemeInner> {
        // A panicked painter must not take the theme down with it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_dark(&self) -> bool {
        self.lock().dark
    }

    /// Set the flag; subscribers hear about it only when the value changes.
    pub fn set_dark(&self, dark: bool) {
        let mut inner = self.lock();
        if inner.dark == dark {
            return;
        }
        inner.dark = dark;
        let change = ThemeChange { dark };
        inner.subscribers.retain(|tx| tx.send(change).is_ok());
        log::info!("theme switched to {}", if dark { "dark" } else { "light" });
    }

    pub fn subscribe(&self) -> Receiver<ThemeChange> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}
