//! Reader progress: visited chapters, saved reflections and preferences.
//!
//! The whole record is one JSON blob under a single storage key. Every field
//! defaults, so a blob with missing fields still loads.

pub mod store;
pub mod theme;

use serde::{Deserialize, Serialize};

pub use store::{FileStorage, MemoryStorage, ProgressStore, StorageBackend};
pub use theme::{ThemeChange, ThemeSetting};

/// One saved reflection. Re-saving the same prompt appends another entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedPrompt {
    pub chapter_id: String,
    pub prompt_index: usize,
    pub response: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub audio_enabled: bool,
    pub reduced_motion: bool,
    /// `None` until the reader makes an explicit choice; the system color
    /// scheme applies until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
}

/// A single preference change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    AudioEnabled(bool),
    ReducedMotion(bool),
    DarkMode(bool),
}

impl Preferences {
    pub fn apply(&mut self, pref: Preference) {
        match pref {
            Preference::AudioEnabled(v) => self.audio_enabled = v,
            Preference::ReducedMotion(v) => self.reduced_motion = v,
            Preference::DarkMode(v) => self.dark_mode = Some(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub visited_chapters: Vec<String>,
    pub saved_prompts: Vec<SavedPrompt>,
    pub last_visited: Option<String>,
    pub preferences: Preferences,
}

impl ProgressRecord {
    /// Record a visit. Visited chapters have set semantics.
    pub fn mark_visited(&mut self, chapter_id: &str) {
        if !self.has_visited(chapter_id) {
            self.visited_chapters.push(chapter_id.to_string());
        }
        self.last_visited = Some(chapter_id.to_string());
    }

    pub fn has_visited(&self, chapter_id: &str) -> bool {
        self.visited_chapters.iter().any(|c| c == chapter_id)
    }

    /// Number of distinct visited chapters, even if the blob repeats ids.
    pub fn visited_count(&self) -> usize {
        let mut ids: Vec<&str> = self.visited_chapters.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// All saved responses for one chapter, oldest first.
    pub fn responses_for<'a>(&'a self, chapter_id: &'a str) -> impl Iterator<Item = &'a SavedPrompt> {
        self.saved_prompts
            .iter()
            .filter(move |p| p.chapter_id == chapter_id)
    }

    /// The newest response saved for one prompt.
    pub fn latest_response(&self, chapter_id: &str, prompt_index: usize) -> Option<&SavedPrompt> {
        self.saved_prompts
            .iter()
            .rev()
            .find(|p| p.chapter_id == chapter_id && p.prompt_index == prompt_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut record = ProgressRecord::default();
        record.mark_visited("fear");
        record.saved_prompts.push(SavedPrompt {
            chapter_id: "fear".into(),
            prompt_index: 1,
            response: "hello".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
        });
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["visitedChapters"][0], "fear");
        assert_eq!(json["lastVisited"], "fear");
        assert_eq!(json["savedPrompts"][0]["chapterId"], "fear");
        assert_eq!(json["savedPrompts"][0]["promptIndex"], 1);
        assert_eq!(json["preferences"]["audioEnabled"], false);
        assert!(json["preferences"].get("darkMode").is_none());
    }

    #[test]
    fn missing_fields_default() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"visitedChapters":["memory"],"preferences":{"darkMode":true}}"#)
                .unwrap();
        assert_eq!(record.visited_chapters, vec!["memory"]);
        assert!(record.saved_prompts.is_empty());
        assert_eq!(record.last_visited, None);
        assert_eq!(record.preferences.dark_mode, Some(true));
        assert!(!record.preferences.reduced_motion);
    }

    #[test]
    fn visits_have_set_semantics() {
        let mut record = ProgressRecord::default();
        record.mark_visited("fear");
        record.mark_visited("memory");
        record.mark_visited("fear");
        assert_eq!(record.visited_chapters.len(), 2);
        assert_eq!(record.last_visited.as_deref(), Some("fear"));

        record.visited_chapters.push("fear".into());
        assert_eq!(record.visited_count(), 2);
    }

    #[test]
    fn latest_response_wins() {
        let mut record = ProgressRecord::default();
        for (i, text) in ["first", "second"].iter().enumerate() {
            record.saved_prompts.push(SavedPrompt {
                chapter_id: "empathy".into(),
                prompt_index: 0,
                response: text.to_string(),
                timestamp: format!("2026-01-0{}T00:00:00Z", i + 1),
            });
        }
        assert_eq!(record.latest_response("empathy", 0).unwrap().response, "second");
        assert!(record.latest_response("empathy", 1).is_none());
        assert_eq!(record.responses_for("empathy").count(), 2);
    }

    #[test]
    fn preference_apply() {
        let mut prefs = Preferences::default();
        prefs.apply(Preference::ReducedMotion(true));
        prefs.apply(Preference::DarkMode(false));
        prefs.apply(Preference::AudioEnabled(true));
        assert!(prefs.reduced_motion);
        assert!(prefs.audio_enabled);
        assert_eq!(prefs.dark_mode, Some(false));
    }
}
