use super::{Location, LocationChange};
use crate::error::RouterError;
use serde::Deserialize;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Called with every location a backend navigates to.
pub type Listener = Arc<dyn Fn(&Location) + Send + Sync>;

/// Detaches a listener registered with [`HistoryBackend::listen`].
pub type Unlisten = Box<dyn FnOnce() + Send>;

/// Called once when a backend completes.
pub type CompleteCallback = Arc<dyn Fn() + Send + Sync>;

/// Options forwarded by the router driver to its history backend.
///
/// These can be built in code or read from an application's own configuration:
///
/// ```rust
/// use scoped_router::location::HistoryOptions;
///
/// let options = HistoryOptions::builder()
///     .queries(true)
///     .basename("/app")
///     .build();
/// assert_eq!(options.basename.as_deref(), Some("/app"));
/// assert!(!options.hash);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct HistoryOptions {
    /// Produce hash-based hrefs (`#/path`).
    #[builder(default)]
    pub hash: bool,
    /// Parse the query string of every location into [`Location::query`].
    #[builder(default)]
    pub queries: bool,
    /// A path prefix every href is created under.
    #[builder(default, setter(strip_option, into))]
    pub basename: Option<String>,
}

/// The history backend a router driver is wired to.
///
/// A browser backend would wrap the window's session history; the
/// [`ServerHistory`](super::ServerHistory) backend keeps everything in memory.
pub trait HistoryBackend: Send + Sync + 'static {
    /// Registers a listener that is invoked on every navigation.
    fn listen(&self, listener: Listener) -> Unlisten;

    /// Navigates to a new location, adding a history entry.
    fn push(&self, change: LocationChange) -> Result<(), RouterError>;

    /// Navigates to a new location, replacing the current history entry.
    fn replace(&self, change: LocationChange) -> Result<(), RouterError>;

    /// Turns a path into an href suitable for a link.
    fn create_href(&self, path: &str) -> String;

    /// Normalizes a navigation request without navigating.
    fn create_location(
        &self,
        change: LocationChange,
    ) -> Result<Location, RouterError>;

    fn current_location(&self) -> Location;

    /// Applies driver options.
    fn configure(&self, _options: &HistoryOptions) {}

    /// Registers a callback run when the backend completes. Every registered
    /// callback runs, in registration order.
    fn on_complete(&self, _callback: CompleteCallback) {}

    /// Signals that no more navigations will happen.
    fn complete(&self) {}
}
