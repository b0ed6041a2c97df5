//! Capabilities the router is given by its host.

/// Answers whether a user session is active.
///
/// Queried synchronously once per resolution; the answer is never cached.
pub trait SessionGuard: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

impl<F> SessionGuard for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_authenticated(&self) -> bool {
        self()
    }
}

/// The visible region the router renders into.
pub trait ContentSink: Send + Sync {
    /// Replace the content area's markup.
    fn set_markup(&self, html: &str);

    /// Replace the document title.
    fn set_title(&self, title: &str);

    /// Reset the scroll position to the top.
    fn scroll_to_top(&self);

    /// Mark the navigation links targeting `path` active and clear the rest.
    fn highlight_active(&self, path: &str);
}

/// The host's navigation target (e.g. the address-bar hash fragment).
pub trait Navigator: Send + Sync {
    /// The current target path, `/` when none is set.
    fn current_path(&self) -> String;

    /// Request a change of the navigation target.
    fn navigate(&self, path: &str);
}
