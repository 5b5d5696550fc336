//! Painting for chapter visuals.
//!
//! - `mesh`: tessellation of scene primitives
//! - `scene_paint`: projected 3D painter
//! - `fallback`: flat gradient panel used without 3D
//! - `palette`: light / dark colors

pub mod fallback;
pub mod mesh;
pub mod palette;
pub mod scene_paint;

use crate::config::EnvSignals;

/// What the current platform can draw for chapter visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    #[default]
    Projected3D,
    /// Scenes are replaced by the gradient fallback panel.
    Flat2D,
}

impl Capability {
    /// Decide once at startup.
    pub fn probe(signals: &EnvSignals) -> Self {
        if !cfg!(feature = "scene-3d") {
            log::info!("built without scene-3d; using 2D fallback");
            return Capability::Flat2D;
        }
        if signals.disable_3d {
            log::info!("3D disabled by environment; using 2D fallback");
            return Capability::Flat2D;
        }
        Capability::Projected3D
    }

    pub fn supports_3d(self) -> bool {
        self == Capability::Projected3D
    }
}
