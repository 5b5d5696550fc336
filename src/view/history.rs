//! Back/forward navigation history.

use super::Route;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    idx: usize,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
            idx: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.idx]
    }

    /// Navigate to `route`. Forward history is dropped; re-visiting the
    /// current route is a no-op.
    pub fn push(&mut self, route: Route) {
        if *self.current() == route {
            return;
        }
        self.entries.truncate(self.idx + 1);
        self.entries.push(route);
        self.idx = self.entries.len() - 1;
    }

    /// Step back; `None` at the oldest entry.
    pub fn back(&mut self) -> Option<&Route> {
        if self.idx == 0 {
            return None;
        }
        self.idx -= 1;
        Some(self.current())
    }

    /// Step forward; `None` at the newest entry.
    pub fn forward(&mut self) -> Option<&Route> {
        if self.idx + 1 >= self.entries.len() {
            return None;
        }
        self.idx += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.idx > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.idx + 1 < self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_and_forward() {
        let mut h = History::default();
        h.push(Route::Explore);
        h.push(Route::chapter("fear"));
        assert_eq!(h.back(), Some(&Route::Explore));
        assert_eq!(h.back(), Some(&Route::Home));
        assert_eq!(h.back(), None);
        assert_eq!(h.forward(), Some(&Route::Explore));
        assert!(h.can_go_forward());
    }

    #[test]
    fn push_truncates_forward() {
        let mut h = History::default();
        h.push(Route::Explore);
        h.push(Route::Wander);
        h.back();
        h.push(Route::Library);
        assert!(!h.can_go_forward());
        assert_eq!(h.back(), Some(&Route::Explore));
    }

    #[test]
    fn repeated_push_is_ignored() {
        let mut h = History::default();
        h.push(Route::Home);
        assert!(!h.can_go_back());
        h.push(Route::Library);
        h.push(Route::Library);
        assert_eq!(h.back(), Some(&Route::Home));
    }
}
