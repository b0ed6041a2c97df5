//! Router configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a working configuration.

use serde::Deserialize;
use snafu::ResultExt;
use std::path::Path;

use crate::error::{ConfigSnafu, IoSnafu};

/// Markup written to the content area when a page fails to render.
pub const DEFAULT_FAILURE_MARKUP: &str = "<div class=\"container mt-5\"><div class=\"alert alert-danger\">Failed to load page content</div></div>";

/// How overlapping renders are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPolicy {
    /// Every completed render writes the content area; the last to finish wins.
    #[default]
    LastWriteWins,
    /// Only the most recently started render may write the content area.
    LatestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Suffix appended to every page title.
    pub app_name: String,
    /// Route substituted for the root path `/`.
    pub home_path: String,
    /// Route substituted for unknown paths.
    pub not_found_path: String,
    /// Where blocked navigations are redirected.
    pub login_path: String,
    pub failure_markup: String,
    pub render_policy: RenderPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            app_name: "Volunteer Connect".to_string(),
            home_path: "/home".to_string(),
            not_found_path: "/404".to_string(),
            login_path: "/login".to_string(),
            failure_markup: DEFAULT_FAILURE_MARKUP.to_string(),
            render_policy: RenderPolicy::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).context(ConfigSnafu)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).context(IoSnafu),
        }
    }

    /// Document title for a route title, e.g. `"About - Volunteer Connect"`.
    pub fn page_title(&self, route_title: &str) -> String {
        format!("{} - {}", route_title, self.app_name)
    }
}
