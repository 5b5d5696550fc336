pub mod config;
pub mod error;

pub mod content;
pub mod scene;
pub mod input;
pub mod progress;
pub mod view;

// Painting (egui)
pub mod render;
