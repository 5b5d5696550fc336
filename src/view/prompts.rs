//! Reflection prompt panel state for the chapter detail view.
//!
//! At most one prompt is expanded at a time. Drafts are kept per prompt for
//! as long as the view lives, so collapsing a prompt does not lose text.

use std::collections::HashMap;

/// Ask the progress store to append a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub prompt_index: usize,
    pub response: String,
}

#[derive(Debug, Clone, Default)]
pub struct PromptPanel {
    expanded: Option<usize>,
    drafts: HashMap<usize, String>,
}

impl PromptPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `index`, or collapse it if it is the expanded one.
    pub fn toggle(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    pub fn draft(&self, index: usize) -> &str {
        self.drafts.get(&index).map(String::as_str).unwrap_or("")
    }

    pub fn draft_mut(&mut self, index: usize) -> &mut String {
        self.drafts.entry(index).or_default()
    }

    /// Build a save request from the draft. Blank drafts are not saved.
    ///
    /// The draft stays in place so the reader can keep refining it.
    pub fn save(&self, index: usize) -> Option<SaveRequest> {
        let text = self.draft(index).trim();
        if text.is_empty() {
            return None;
        }
        Some(SaveRequest {
            prompt_index: index,
            response: text.to_string(),
        })
    }
}
