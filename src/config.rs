//! Runtime configuration and platform signals.
//!
//! Everything is read from the environment once at startup:
//!
//! | Variable             | Effect                                            |
//! |----------------------|---------------------------------------------------|
//! | `HNE_DATA_DIR`       | directory holding the progress file               |
//! | `HNE_IN_MEMORY`      | `1` forces the in-memory progress backend         |
//! | `HNE_REDUCED_MOTION` | `1` reports a reduced-motion preference           |
//! | `HNE_COLOR_SCHEME`   | `dark` / `light` system color scheme              |
//! | `HNE_DISABLE_3D`     | `1` forces the flat 2D scene fallback             |

use std::path::PathBuf;

const APP_DIR_NAME: &str = "human-nature-explorer";

/// Color scheme reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Environment signals consumed by the views.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvSignals {
    pub prefers_reduced_motion: bool,
    pub color_scheme: ColorScheme,
    pub disable_3d: bool,
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the progress file lives. `None` means no persistent location.
    pub data_dir: Option<PathBuf>,
    pub force_in_memory: bool,
    pub signals: EnvSignals,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir().map(|d| d.join(APP_DIR_NAME)),
            force_in_memory: false,
            signals: EnvSignals::default(),
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(dir) = lookup("HNE_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            cfg.data_dir = Some(PathBuf::from(dir));
        }
        cfg.force_in_memory = flag(lookup("HNE_IN_MEMORY"));
        cfg.signals.prefers_reduced_motion = flag(lookup("HNE_REDUCED_MOTION"));
        cfg.signals.disable_3d = flag(lookup("HNE_DISABLE_3D"));
        cfg.signals.color_scheme = match lookup("HNE_COLOR_SCHEME").as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("dark") => ColorScheme::Dark,
            _ => ColorScheme::Light,
        };

        log::debug!("config: {:?}", cfg);
        cfg
    }
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}
