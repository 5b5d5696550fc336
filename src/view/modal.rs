//! "Read in depth" overlay: open/closed state, focus trap and per-subtopic
//! expansion.
//!
//! Generic over the focus handle so the binary can use widget ids directly.
//! The first focusable is always the close control.

use std::collections::HashSet;

/// Keys the modal reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Tab,
    ShiftTab,
    Escape,
}

#[derive(Debug, Clone)]
struct OpenState<F> {
    /// Had focus before opening; gets it back on close.
    trigger: Option<F>,
    focusables: Vec<F>,
    focus: usize,
    expanded: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct DeepDiveModal<F> {
    open: Option<OpenState<F>>,
}

impl<F> Default for DeepDiveModal<F> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<F: Clone + PartialEq> DeepDiveModal<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open the modal and move focus to `close`.
    ///
    /// `trigger` is whatever held focus before; `inner` are the remaining
    /// focusable elements in tab order. Opening an open modal keeps the
    /// original trigger.
    pub fn open(&mut self, trigger: Option<F>, close: F, inner: Vec<F>) {
        let mut focusables = Vec::with_capacity(inner.len() + 1);
        focusables.push(close);
        focusables.extend(inner);
        let (trigger, expanded) = match self.open.take() {
            Some(prev) => (prev.trigger, prev.expanded),
            None => (trigger, HashSet::new()),
        };
        self.open = Some(OpenState {
            trigger,
            focusables,
            focus: 0,
            expanded,
        });
    }

    /// Replace the tab order (e.g. after a subtopic expands). Focus stays on
    /// the same element if it is still present, else returns to close.
    pub fn set_focusables(&mut self, close: F, inner: Vec<F>) {
        if let Some(state) = &mut self.open {
            let current = state.focusables.get(state.focus).cloned();
            let mut focusables = Vec::with_capacity(inner.len() + 1);
            focusables.push(close);
            focusables.extend(inner);
            state.focus = current
                .and_then(|f| focusables.iter().position(|x| *x == f))
                .unwrap_or(0);
            state.focusables = focusables;
        }
    }

    /// Element that should hold focus, `None` while closed.
    pub fn focused(&self) -> Option<&F> {
        self.open
            .as_ref()
            .and_then(|s| s.focusables.get(s.focus))
    }

    /// Move focus to `target` if it belongs to the modal (pointer focus).
    pub fn focus(&mut self, target: &F) -> bool {
        match &mut self.open {
            Some(state) => match state.focusables.iter().position(|f| f == target) {
                Some(i) => {
                    state.focus = i;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Handle a key. Tab and Shift-Tab wrap inside the modal; Escape closes.
    ///
    /// Returns the element to restore focus to when the key closed the modal.
    pub fn key(&mut self, key: ModalKey) -> Option<F> {
        let state = self.open.as_mut()?;
        let n = state.focusables.len();
        match key {
            ModalKey::Tab => {
                state.focus = (state.focus + 1) % n;
                None
            }
            ModalKey::ShiftTab => {
                state.focus = (state.focus + n - 1) % n;
                None
            }
            ModalKey::Escape => self.close(),
        }
    }

    /// A click outside the dialog closes it.
    pub fn backdrop_click(&mut self) -> Option<F> {
        self.close()
    }

    /// Close and hand back the trigger for focus restoration.
    pub fn close(&mut self) -> Option<F> {
        self.open.take().and_then(|s| s.trigger)
    }

    /// Flip one subtopic between collapsed and expanded.
    pub fn toggle_subtopic(&mut self, id: &str) {
        if let Some(state) = &mut self.open {
            if !state.expanded.remove(id) {
                state.expanded.insert(id.to_string());
            }
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.open
            .as_ref()
            .is_some_and(|s| s.expanded.contains(id))
    }
}
