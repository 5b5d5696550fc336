//! Input plumbing for mounted scenes.
//!
//! The application owns one `InputHub` and forwards every platform event to
//! it. A view that mounts a scene calls `attach`, which hands back a
//! `Subscription`: the view's private `Reactor` lives in the hub for exactly
//! as long as that guard does. Dropping the guard on navigation (or on any
//! early return) releases the listener, so handlers never leak across views.

pub mod reactor;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub use reactor::{InputEvent, Reactor, ScrollDirection};

#[derive(Debug)]
struct HubInner {
    next_id: u64,
    listeners: BTreeMap<u64, Reactor>,
    /// Latest viewport and scroll, seeded into new reactors.
    viewport: [f32; 2],
    scroll: [f32; 2],
    reduced_motion: bool,
}

/// Fan-out of input events to every attached reactor.
#[derive(Debug, Clone)]
pub struct InputHub {
    inner: Rc<RefCell<HubInner>>,
}

impl InputHub {
    pub fn new(viewport: [f32; 2], reduced_motion: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                next_id: 0,
                listeners: BTreeMap::new(),
                viewport,
                scroll: [0.0, 0.0],
                reduced_motion,
            })),
        }
    }

    /// Register a fresh reactor. It listens until the returned guard drops.
    pub fn attach(&self) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let reactor =
            Reactor::new(inner.viewport, inner.reduced_motion).with_scroll_baseline(inner.scroll);
        inner.listeners.insert(id, reactor);
        log::debug!("input listener {} attached ({} active)", id, inner.listeners.len());
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver one event to every attached reactor.
    pub fn dispatch(&self, event: &InputEvent) {
        let mut inner = self.inner.borrow_mut();
        match *event {
            InputEvent::Resized { width, height }
                if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 =>
            {
                inner.viewport = [width, height];
            }
            InputEvent::Scrolled { x, y } if x.is_finite() && y.is_finite() => {
                inner.scroll = [x, y];
            }
            _ => {}
        }
        for reactor in inner.listeners.values_mut() {
            reactor.handle(event);
        }
    }

    /// Propagate a changed reduced-motion signal to current and future reactors.
    pub fn set_reduced_motion(&self, on: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.reduced_motion = on;
        for reactor in inner.listeners.values_mut() {
            reactor.set_reduced_motion(on);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Scoped registration of one reactor. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    /// Run the frame step for this reactor; see [`Reactor::advance`].
    ///
    /// Returns the rotation after the step, or `None` once the hub is gone.
    pub fn advance(&self, frame: u64) -> Option<[f32; 2]> {
        self.with(|r| {
            r.advance(frame);
            r.rotation()
        })
    }

    /// Copy of the reactor's current state.
    pub fn snapshot(&self) -> Option<Reactor> {
        self.with(|r| r.clone())
    }

    fn with<R>(&self, f: impl FnOnce(&mut Reactor) -> R) -> Option<R> {
        let hub = self.hub.upgrade()?;
        let mut inner = hub.borrow_mut();
        inner.listeners.get_mut(&self.id).map(f)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if let Ok(mut inner) = hub.try_borrow_mut() {
                inner.listeners.remove(&self.id);
                log::debug!("input listener {} detached", self.id);
            } else {
                log::warn!("input listener {} left attached: hub busy", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_drop_lifecycle() {
        let hub = InputHub::new([100.0, 100.0], false);
        assert_eq!(hub.listener_count(), 0);
        let a = hub.attach();
        let b = hub.attach();
        assert_eq!(hub.listener_count(), 2);
        drop(a);
        assert_eq!(hub.listener_count(), 1);
        drop(b);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn released_on_early_return() {
        fn mount_then_fail(hub: &InputHub) -> Result<(), &'static str> {
            let _sub = hub.attach();
            Err("view failed")
        }
        let hub = InputHub::new([100.0, 100.0], false);
        assert!(mount_then_fail(&hub).is_err());
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn dispatch_reaches_every_reactor() {
        let hub = InputHub::new([200.0, 100.0], false);
        let a = hub.attach();
        let b = hub.attach();
        hub.dispatch(&InputEvent::PointerMoved { x: 200.0, y: 0.0 });
        assert_eq!(a.snapshot().unwrap().pointer(), [1.0, 0.0]);
        assert_eq!(b.snapshot().unwrap().pointer(), [1.0, 0.0]);
    }

    #[test]
    fn new_reactor_inherits_viewport_and_scroll() {
        let hub = InputHub::new([100.0, 100.0], false);
        hub.dispatch(&InputEvent::Resized { width: 400.0, height: 200.0 });
        hub.dispatch(&InputEvent::Scrolled { x: 0.0, y: 300.0 });
        let sub = hub.attach();
        hub.dispatch(&InputEvent::PointerMoved { x: 100.0, y: 100.0 });
        let r = sub.snapshot().unwrap();
        assert_eq!(r.pointer(), [0.25, 0.5]);
        assert_eq!(r.scroll(), [0.0, 300.0]);
        // Baseline means no jump on the first frame.
        let rot = sub.advance(0).unwrap();
        assert!(rot[0].abs() < 1e-6);
    }

    #[test]
    fn reduced_motion_propagates() {
        let hub = InputHub::new([100.0, 100.0], false);
        let sub = hub.attach();
        hub.set_reduced_motion(true);
        hub.dispatch(&InputEvent::PointerMoved { x: 100.0, y: 100.0 });
        for frame in 0..10 {
            sub.advance(frame);
        }
        assert_eq!(sub.snapshot().unwrap().rotation(), [0.0, 0.0]);
        assert!(hub.attach().snapshot().unwrap().reduced_motion());
    }

    #[test]
    fn subscription_outliving_hub_is_inert() {
        let hub = InputHub::new([100.0, 100.0], false);
        let sub = hub.attach();
        drop(hub);
        assert!(sub.advance(1).is_none());
        assert!(sub.snapshot().is_none());
    }

    #[test]
    fn drop_while_hub_borrowed_leaves_listener_without_panicking() {
        let hub = InputHub::new([100.0, 100.0], false);
        let sub = hub.attach();
        {
            let _busy = hub.inner.borrow();
            drop(sub);
        }
        assert_eq!(hub.listener_count(), 1);
        drop(hub.attach());
        assert_eq!(hub.listener_count(), 1);
    }
}
