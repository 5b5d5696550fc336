//! View layer: routes, history and the per-page state machines.
//!
//! - `route`: path ↔ `Route`
//! - `history`: back / forward stack
//! - `pages`: composition of page view models
//! - `prompts`: reflection prompt panel
//! - `modal`: deep-dive overlay with focus trap

pub mod history;
pub mod modal;
pub mod pages;
pub mod prompts;
pub mod route;

pub use history::History;
pub use modal::{DeepDiveModal, ModalKey};
pub use pages::{compose, BrowseState, ComposeContext, Page, Visual};
pub use prompts::{PromptPanel, SaveRequest};
pub use route::Route;
