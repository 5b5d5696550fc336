//! Route table.
//!
//! Paths are resolved against a fixed `app://` base with the `url` crate so
//! relative links, dot segments and fragments behave like they would in a
//! browser address bar.

use std::fmt;

use url::Url;

const BASE: &str = "app://human-nature-explorer/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/explore`
    Explore,
    /// `/wander`
    Wander,
    /// `/library`
    Library,
    /// `/chapter/:id`
    Chapter { id: String },
    /// `/chapter/:id/deep`, optionally `#subtopic`
    Deep { id: String, section: Option<String> },
    /// Anything else.
    NotFound { path: String },
}

impl Route {
    /// Resolve a path. Never fails: unknown paths become `NotFound`.
    ///
    /// Chapter ids are not checked here; an unknown id is a page state.
    pub fn parse(path: &str) -> Route {
        let url = match Url::parse(BASE).and_then(|base| base.join(path.trim())) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("unparseable path `{}`: {}", path, e);
                return Route::NotFound {
                    path: path.to_string(),
                };
            }
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let section = url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        match segments.as_slice() {
            [] => Route::Home,
            ["explore"] => Route::Explore,
            ["wander"] => Route::Wander,
            ["library"] => Route::Library,
            ["chapter", id] => Route::Chapter { id: id.to_string() },
            ["chapter", id, "deep"] => Route::Deep {
                id: id.to_string(),
                section,
            },
            _ => Route::NotFound {
                path: url.path().to_string(),
            },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Explore => "/explore".into(),
            Route::Wander => "/wander".into(),
            Route::Library => "/library".into(),
            Route::Chapter { id } => format!("/chapter/{}", id),
            Route::Deep { id, section: None } => format!("/chapter/{}/deep", id),
            Route::Deep {
                id,
                section: Some(s),
            } => format!("/chapter/{}/deep#{}", id, s),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// The chapter a route is about, if any.
    pub fn chapter_id(&self) -> Option<&str> {
        match self {
            Route::Chapter { id } | Route::Deep { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn chapter(id: &str) -> Route {
        Route::Chapter { id: id.to_string() }
    }

    pub fn deep(id: &str) -> Route {
        Route::Deep {
            id: id.to_string(),
            section: None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}
