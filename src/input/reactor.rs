//! Pointer/scroll reactor.
//!
//! Turns raw pointer, touch, scroll and resize events into two read values
//! (normalized pointer position and scroll position with direction) and
//! integrates them once per frame into an accumulated rotation for the
//! active scene group.
//!
//! ```text
//! rotation.x += scroll_delta.y * SCROLL_GAIN + (pointer.y - 0.5) * POINTER_GAIN
//! rotation.y += scroll_delta.x * SCROLL_GAIN + (pointer.x - 0.5) * POINTER_GAIN
//! ```

/// Radians per scrolled pixel.
pub const SCROLL_GAIN: f32 = 0.000_05;
/// Radians per frame at full pointer deflection from centre.
pub const POINTER_GAIN: f32 = 0.015;

const CENTER: [f32; 2] = [0.5, 0.5];

/// Raw platform input. Coordinates are in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    /// Touch positions; only the first point drives the pointer.
    Touch { points: Vec<[f32; 2]> },
    /// Absolute scroll offset of the page.
    Scrolled { x: f32, y: f32 },
    Resized { width: f32, height: f32 },
}

/// Direction of the latest scroll movement. Vertical wins over horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl ScrollDirection {
    fn between(prev: [f32; 2], next: [f32; 2]) -> Self {
        if next[1] > prev[1] {
            ScrollDirection::Down
        } else if next[1] < prev[1] {
            ScrollDirection::Up
        } else if next[0] > prev[0] {
            ScrollDirection::Right
        } else if next[0] < prev[0] {
            ScrollDirection::Left
        } else {
            ScrollDirection::None
        }
    }
}

/// Per-view input state and accumulated rotation.
#[derive(Debug, Clone)]
pub struct Reactor {
    viewport: [f32; 2],
    pointer: [f32; 2],
    scroll: [f32; 2],
    direction: ScrollDirection,
    /// Scroll movement since the last integrated frame.
    pending_scroll: [f32; 2],
    /// `[x, y]` in radians.
    rotation: [f32; 2],
    last_frame: Option<u64>,
    reduced_motion: bool,
}

impl Reactor {
    pub fn new(viewport: [f32; 2], reduced_motion: bool) -> Self {
        Self {
            viewport,
            pointer: CENTER,
            scroll: [0.0, 0.0],
            direction: ScrollDirection::None,
            pending_scroll: [0.0, 0.0],
            rotation: [0.0, 0.0],
            last_frame: None,
            reduced_motion,
        }
    }

    /// Start from a known scroll offset so the first sample is not a jump.
    pub fn with_scroll_baseline(mut self, scroll: [f32; 2]) -> Self {
        if scroll.iter().all(|v| v.is_finite()) {
            self.scroll = scroll;
        }
        self
    }

    /// Apply one event. Malformed events are dropped and the last valid
    /// values are kept.
    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMoved { x, y } => self.move_pointer(x, y),
            InputEvent::Touch { ref points } => match points.first() {
                Some(&[x, y]) => self.move_pointer(x, y),
                None => log::debug!("touch event without points ignored"),
            },
            InputEvent::Scrolled { x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    return;
                }
                let next = [x, y];
                if next == self.scroll {
                    return;
                }
                self.direction = ScrollDirection::between(self.scroll, next);
                self.pending_scroll[0] += next[0] - self.scroll[0];
                self.pending_scroll[1] += next[1] - self.scroll[1];
                self.scroll = next;
            }
            InputEvent::Resized { width, height } => {
                if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 {
                    self.viewport = [width, height];
                }
            }
        }
    }

    fn move_pointer(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.pointer = [
            normalize(x, self.viewport[0]),
            normalize(y, self.viewport[1]),
        ];
    }

    /// Integrate pending input into the rotation for `frame`.
    ///
    /// A second call with the same frame number is a no-op; returns whether
    /// the rotation step was applied.
    pub fn advance(&mut self, frame: u64) -> bool {
        if self.last_frame == Some(frame) {
            return false;
        }
        self.last_frame = Some(frame);

        let scroll = std::mem::take(&mut self.pending_scroll);
        if self.reduced_motion {
            return true;
        }
        self.rotation[0] += scroll[1] * SCROLL_GAIN + (self.pointer[1] - 0.5) * POINTER_GAIN;
        self.rotation[1] += scroll[0] * SCROLL_GAIN + (self.pointer[0] - 0.5) * POINTER_GAIN;
        true
    }

    pub fn set_reduced_motion(&mut self, on: bool) {
        self.reduced_motion = on;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Normalized pointer in `[0,1]×[0,1]`; centre until the first event.
    pub fn pointer(&self) -> [f32; 2] {
        self.pointer
    }

    pub fn scroll(&self) -> [f32; 2] {
        self.scroll
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Accumulated `[x, y]` rotation in radians.
    pub fn rotation(&self) -> [f32; 2] {
        self.rotation
    }
}

/// Map a pixel coordinate into 0..=1; a degenerate extent reads as centre.
#[inline]
fn normalize(v: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        (v / extent).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn reactor() -> Reactor {
        Reactor::new([800.0, 600.0], false)
    }

    #[test]
    fn test_defaults_to_center() {
        let r = reactor();
        assert_eq!(r.pointer(), [0.5, 0.5]);
        assert_eq!(r.direction(), ScrollDirection::None);
        assert_eq!(r.rotation(), [0.0, 0.0]);
    }

    #[test]
    fn test_pointer_normalized_and_clamped() {
        let mut r = reactor();
        r.handle(&InputEvent::PointerMoved { x: 200.0, y: 150.0 });
        assert_eq!(r.pointer(), [0.25, 0.25]);
        r.handle(&InputEvent::PointerMoved { x: -50.0, y: 9000.0 });
        assert_eq!(r.pointer(), [0.0, 1.0]);
    }

    #[test]
    fn test_zero_viewport_reads_center() {
        let mut r = Reactor::new([0.0, 0.0], false);
        r.handle(&InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        assert_eq!(r.pointer(), [0.5, 0.5]);
    }

    #[test]
    fn test_rotation_is_running_sum_of_pointer_terms() {
        let mut r = reactor();
        let samples = [[0.1, 0.9], [0.5, 0.5], [0.75, 0.2], [1.0, 0.0]];
        let mut expected = [0.0f32, 0.0f32];
        for (frame, p) in samples.iter().enumerate() {
            r.handle(&InputEvent::PointerMoved {
                x: p[0] * 800.0,
                y: p[1] * 600.0,
            });
            assert!(r.advance(frame as u64));
            expected[0] += (p[1] - 0.5) * POINTER_GAIN;
            expected[1] += (p[0] - 0.5) * POINTER_GAIN;
        }
        let rot = r.rotation();
        assert!((rot[0] - expected[0]).abs() < EPS, "{:?} vs {:?}", rot, expected);
        assert!((rot[1] - expected[1]).abs() < EPS);
    }

    #[test]
    fn test_scroll_term_uses_delta() {
        let mut r = reactor();
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 400.0 });
        r.advance(1);
        assert!((r.rotation()[0] - 400.0 * SCROLL_GAIN).abs() < EPS);
        assert!(r.rotation()[1].abs() < EPS);

        // No further scroll: pointer is centred, nothing accumulates.
        r.advance(2);
        assert!((r.rotation()[0] - 400.0 * SCROLL_GAIN).abs() < EPS);
    }

    #[test]
    fn test_advance_is_idempotent_per_frame() {
        let mut r = reactor();
        r.handle(&InputEvent::PointerMoved { x: 800.0, y: 600.0 });
        assert!(r.advance(7));
        let once = r.rotation();
        assert!(!r.advance(7));
        assert!(!r.advance(7));
        assert_eq!(r.rotation(), once);
        assert!(r.advance(8));
        assert!(r.rotation()[0] > once[0]);
    }

    #[test]
    fn test_reduced_motion_freezes_rotation() {
        let mut r = Reactor::new([800.0, 600.0], true);
        for frame in 0..50u64 {
            r.handle(&InputEvent::PointerMoved {
                x: (frame * 16 % 800) as f32,
                y: 600.0,
            });
            r.handle(&InputEvent::Scrolled { x: 0.0, y: frame as f32 * 30.0 });
            r.advance(frame);
        }
        assert_eq!(r.rotation(), [0.0, 0.0]);
        // Read values still track input.
        assert_eq!(r.direction(), ScrollDirection::Down);
    }

    #[test]
    fn test_scroll_direction() {
        let mut r = reactor();
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 100.0 });
        assert_eq!(r.direction(), ScrollDirection::Down);
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 50.0 });
        assert_eq!(r.direction(), ScrollDirection::Up);
        r.handle(&InputEvent::Scrolled { x: 30.0, y: 50.0 });
        assert_eq!(r.direction(), ScrollDirection::Right);
        r.handle(&InputEvent::Scrolled { x: 10.0, y: 50.0 });
        assert_eq!(r.direction(), ScrollDirection::Left);
        r.handle(&InputEvent::Scrolled { x: 10.0, y: 50.0 });
        assert_eq!(r.direction(), ScrollDirection::None);
    }

    #[test]
    fn test_malformed_events_keep_last_value() {
        let mut r = reactor();
        r.handle(&InputEvent::PointerMoved { x: 400.0, y: 0.0 });
        let before = r.pointer();
        r.handle(&InputEvent::Touch { points: vec![] });
        r.handle(&InputEvent::PointerMoved { x: f32::NAN, y: 10.0 });
        r.handle(&InputEvent::Scrolled { x: f32::INFINITY, y: 0.0 });
        r.handle(&InputEvent::Resized { width: -1.0, height: 10.0 });
        assert_eq!(r.pointer(), before);
        assert_eq!(r.scroll(), [0.0, 0.0]);
    }

    #[test]
    fn test_first_touch_drives_pointer() {
        let mut r = reactor();
        r.handle(&InputEvent::Touch {
            points: vec![[800.0, 0.0], [0.0, 600.0]],
        });
        assert_eq!(r.pointer(), [1.0, 0.0]);
    }

    #[test]
    fn test_scroll_baseline() {
        let mut r = reactor().with_scroll_baseline([0.0, 500.0]);
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 510.0 });
        r.advance(0);
        assert!((r.rotation()[0] - 10.0 * SCROLL_GAIN).abs() < EPS);
    }

    #[test]
    fn repeated_scroll_offset_keeps_direction() {
        let mut r = Reactor::new([100.0, 100.0], false);
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 40.0 });
        assert_eq!(r.direction(), ScrollDirection::Down);
        r.advance(1);
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 40.0 });
        assert_eq!(r.direction(), ScrollDirection::Down);
        r.advance(2);
        // Nothing new to integrate on the second frame.
        let before = r.rotation();
        r.handle(&InputEvent::Scrolled { x: 0.0, y: 40.0 });
        r.advance(3);
        let pointer_only = (r.pointer()[1] - 0.5) * POINTER_GAIN;
        assert!((r.rotation()[0] - before[0] - pointer_only).abs() < 1e-7);
    }
}
