use super::{
    create_key, Action, CompleteCallback, HistoryBackend, HistoryOptions,
    Listener, Location, LocationChange, Unlisten,
};
use crate::error::RouterError;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// An in-memory history backend for use outside a browser: on the server
/// while rendering a request, or in tests driven by a finite list of paths.
///
/// Every navigation is delivered synchronously to the registered listeners.
/// There is no history stack, so [`replace`](HistoryBackend::replace) behaves
/// exactly like [`push`](HistoryBackend::push), and hrefs are returned as-is
/// unless a basename or hash routing is configured.
#[derive(Clone)]
pub struct ServerHistory {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    current: Location,
    listeners: Vec<Listener>,
    on_complete: Vec<CompleteCallback>,
    options: HistoryOptions,
    completed: bool,
}

impl fmt::Debug for ServerHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ServerHistory")
            .field("current", &inner.current)
            .field("listeners", &inner.listeners.len())
            .field("completed", &inner.completed)
            .finish_non_exhaustive()
    }
}

/// Creates a [`ServerHistory`] starting at `seed`.
///
/// Fails with [`RouterError::Configuration`] if no initial location is given.
pub fn create_server_history(
    seed: Option<LocationChange>,
) -> Result<ServerHistory, RouterError> {
    match seed {
        Some(seed) => ServerHistory::new(seed),
        None => Err(RouterError::Configuration(
            "ServerHistory needs an initial location passed in as a parameter"
                .into(),
        )),
    }
}

impl ServerHistory {
    /// Creates a history whose current location is parsed from `seed`.
    pub fn new(seed: impl Into<LocationChange>) -> Result<Self, RouterError> {
        let seed = seed.into();
        let action = if seed.replace {
            Action::Replace
        } else {
            Action::Pop
        };
        Ok(Self::from_location(Location::from_change(&seed, action)?))
    }

    /// Creates a history whose current location is exactly `location`.
    pub fn from_location(location: Location) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current: location,
                listeners: Vec::new(),
                on_complete: Vec::new(),
                options: HistoryOptions::default(),
                completed: false,
            })),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.inner.lock().completed
    }

    fn build_location(
        options: &HistoryOptions,
        change: &LocationChange,
        action: Action,
    ) -> Result<Location, RouterError> {
        let mut location = Location::from_change(change, action)?;
        if let Some(basename) = options.basename.as_deref() {
            location.pathname = strip_basename(&location.pathname, basename);
        }
        if options.queries {
            location = location.with_query();
        }
        Ok(location)
    }
}

/// Brings a basename into the `/segment` form, or `None` if it is empty.
fn normalize_basename(basename: &str) -> Option<String> {
    let trimmed = basename.trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
}

/// Strips a basename in `/segment` form from the start of `pathname`.
fn strip_basename(pathname: &str, basename: &str) -> String {
    match pathname.strip_prefix(basename) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => pathname.to_string(),
    }
}

impl HistoryBackend for ServerHistory {
    fn listen(&self, listener: Listener) -> Unlisten {
        self.inner.lock().listeners.push(listener);
        Box::new(|| {})
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "trace",
            skip_all,
            fields(path = %change.value)
        )
    )]
    fn push(&self, change: LocationChange) -> Result<(), RouterError> {
        let (location, listeners) = {
            let inner = self.inner.lock();
            if inner.completed {
                return Err(RouterError::Invariant(
                    "Cannot push a location after the history has completed"
                        .into(),
                ));
            }
            if inner.listeners.is_empty() {
                return Err(RouterError::Invariant(
                    "Must be given at least one listener before pushing".into(),
                ));
            }
            let location = Self::build_location(
                &inner.options,
                &change,
                Action::Push,
            )?
            .with_key(create_key());
            (location, inner.listeners.clone())
        };

        // the lock is released so that listeners may navigate again
        for listener in &listeners {
            listener(&location);
        }
        self.inner.lock().current = location;
        Ok(())
    }

    fn replace(&self, change: LocationChange) -> Result<(), RouterError> {
        self.push(change)
    }

    fn create_href(&self, path: &str) -> String {
        let inner = self.inner.lock();
        let mut href = String::new();
        if inner.options.hash {
            href.push('#');
        }
        if let Some(basename) = inner.options.basename.as_deref() {
            href.push_str(basename);
        }
        href.push_str(path);
        href
    }

    fn create_location(
        &self,
        change: LocationChange,
    ) -> Result<Location, RouterError> {
        let options = self.inner.lock().options.clone();
        Self::build_location(&options, &change, Action::Pop)
    }

    fn current_location(&self) -> Location {
        self.inner.lock().current.clone()
    }

    fn configure(&self, options: &HistoryOptions) {
        let mut inner = self.inner.lock();
        inner.options = HistoryOptions {
            basename: options.basename.as_deref().and_then(normalize_basename),
            ..options.clone()
        };
        if options.queries && inner.current.query.is_none() {
            inner.current = inner.current.clone().with_query();
        }
    }

    fn on_complete(&self, callback: CompleteCallback) {
        {
            let mut inner = self.inner.lock();
            if !inner.completed {
                inner.on_complete.push(callback);
                return;
            }
        }
        callback();
    }

    fn complete(&self) {
        let callbacks = {
            let mut inner = self.inner.lock();
            if inner.completed {
                return;
            }
            inner.completed = true;
            std::mem::take(&mut inner.on_complete)
        };
        #[cfg(feature = "tracing")]
        tracing::debug!("server history completed");
        for callback in callbacks {
            callback();
        }
    }
}
