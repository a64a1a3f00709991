use crate::{
    error::RouterError,
    location::{HistoryBackend, HistoryOptions, Location, LocationChange},
    path::CreateHref,
    source::RouterSource,
    stream::{Observer, Stream, Subject},
};
use core::fmt;
use std::sync::Arc;

/// Builds a [`RouterDriver`] over a history backend.
///
/// Fails with [`RouterError::Configuration`] if `history` is `None`. The
/// `options` are handed to the backend, which is responsible for their effect.
pub fn make_router_driver<H>(
    history: Option<H>,
    options: HistoryOptions,
) -> Result<RouterDriver, RouterError>
where
    H: HistoryBackend,
{
    let Some(history) = history else {
        return Err(RouterError::Configuration(
            "First argument to make_router_driver must be a valid history \
             driver"
                .into(),
        ));
    };
    history.configure(&options);
    Ok(RouterDriver {
        history: Arc::new(history),
        options,
    })
}

/// Connects a stream of navigation requests to a history backend and exposes
/// the resulting locations as a [`RouterSource`].
#[derive(Clone)]
pub struct RouterDriver {
    history: Arc<dyn HistoryBackend>,
    options: HistoryOptions,
}

impl fmt::Debug for RouterDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterDriver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RouterDriver {
    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    pub fn history(&self) -> &Arc<dyn HistoryBackend> {
        &self.history
    }

    /// Starts the driver.
    ///
    /// Every [`LocationChange`] emitted by `sink` is pushed to (or, if it asks
    /// for it, replaces the current entry of) the backend. The returned root
    /// source sees the backend's current location first, then every later
    /// navigation; subscribers that arrive late receive the latest location.
    /// When `sink` completes, the backend is completed too.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn run(&self, sink: Stream<LocationChange>) -> RouterSource {
        let locations = Subject::remember_with(self.history.current_location());

        // the backend keeps its listeners for its whole lifetime
        let _unlisten = self.history.listen(Arc::new({
            let locations = locations.clone();
            move |location: &Location| locations.next(location.clone())
        }));
        self.history.on_complete(Arc::new({
            let locations = locations.clone();
            move || locations.complete()
        }));

        let history = Arc::clone(&self.history);
        let on_complete = Arc::clone(&self.history);
        let _subscription = sink.subscribe(
            Observer::new(move |change: &LocationChange| {
                let result = if change.replace {
                    history.replace(change.clone())
                } else {
                    history.push(change.clone())
                };
                if let Err(e) = result {
                    #[cfg(feature = "tracing")]
                    tracing::error!("{e}");
                    #[cfg(not(feature = "tracing"))]
                    eprintln!("{e}");
                }
            })
            .on_complete(move || on_complete.complete()),
        );

        let create_href: CreateHref = {
            let history = Arc::clone(&self.history);
            Arc::new(move |path: &str| history.create_href(path))
        };
        RouterSource::new(locations.stream(), Vec::<String>::new(), create_href)
    }
}
