//! In-memory rendering surface.
//!
//! `Document` holds everything the router writes: the title, the content
//! area's markup, the scroll offset and the navigation links. Hosts read a
//! snapshot to draw it and subscribe to redraw on change.

use tokio::sync::watch;

use crate::router::ContentSink;
use crate::state::Entity;

/// Prefix marking an href as an internal, hash-routed link.
pub const INTERNAL_LINK_PREFIX: &str = "#/";

/// A navigation link and, if it sits inside a list item, that item's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
    /// `Some(active)` when the link has a list-item ancestor.
    pub list_item: Option<bool>,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            active: false,
            list_item: None,
        }
    }

    /// A link nested in a list item.
    pub fn in_list_item(mut self) -> Self {
        self.list_item = Some(false);
        self
    }

    /// The path this link navigates to, if it is an internal link.
    pub fn target(&self) -> Option<&str> {
        self.href.starts_with(INTERNAL_LINK_PREFIX).then(|| &self.href[1..])
    }
}

/// Mark the internal links targeting `current` active and clear all others.
///
/// Links that are not internal are left as they are. Running this twice with
/// the same path leaves the same state.
pub fn decorate_links(links: &mut [NavLink], current: &str) {
    for link in links.iter_mut() {
        let Some(target) = link.target() else { continue };
        let active = target == current;
        link.active = active;
        if let Some(item) = link.list_item.as_mut() {
            *item = active;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    pub title: String,
    pub markup: String,
    pub scroll_offset: u16,
    pub links: Vec<NavLink>,
}

impl DocumentState {
    /// The currently active internal link, if any.
    pub fn active_link(&self) -> Option<&NavLink> {
        self.links.iter().find(|link| link.active)
    }
}

/// Shared document implementing [`ContentSink`].
#[derive(Clone)]
pub struct Document {
    state: Entity<DocumentState>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            state: Entity::new(DocumentState { links, ..DocumentState::default() }),
        }
    }

    pub fn snapshot(&self) -> crate::Result<DocumentState> {
        self.state.read(|state| state.clone())
    }

    /// Replace the navigation links (e.g. when the header is reloaded after login).
    pub fn set_links(&self, links: Vec<NavLink>) -> crate::Result<()> {
        self.state.update(|state| state.links = links)
    }

    /// Scroll the content by `delta` lines, clamped at the top.
    pub fn scroll_by(&self, delta: i32) -> crate::Result<()> {
        self.state.update(|state| {
            let next = i32::from(state.scroll_offset).saturating_add(delta);
            state.scroll_offset = next.clamp(0, i32::from(u16::MAX)) as u16;
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.state.subscribe()
    }

    fn apply<F: FnOnce(&mut DocumentState)>(&self, f: F) {
        if let Err(e) = self.state.update(f) {
            tracing::warn!(error = %e, "document update dropped");
        }
    }
}

impl ContentSink for Document {
    fn set_markup(&self, html: &str) {
        self.apply(|state| state.markup = html.to_string());
    }

    fn set_title(&self, title: &str) {
        self.apply(|state| state.title = title.to_string());
    }

    fn scroll_to_top(&self) {
        self.apply(|state| state.scroll_offset = 0);
    }

    fn highlight_active(&self, path: &str) {
        self.apply(|state| decorate_links(&mut state.links, path));
    }
}
