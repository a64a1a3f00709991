use crate::{
    location::Location,
    matching::{LongestPrefix, PathMatcher, Routes},
    params::ParamsMap,
    path::{filter_path, is_in_scope, split_path, CreateHref, HrefBuilder},
    stream::{Observer, Stream, Subscription},
};
use core::fmt;
use std::sync::Arc;

/// A view of the location stream, scoped to a namespace of path segments.
///
/// The root source (empty namespace) sees every location. Each call to
/// [`path`](RouterSource::path) returns a narrower source that only sees
/// locations whose pathname starts with the accumulated namespace, segment by
/// segment.
#[derive(Clone)]
pub struct RouterSource {
    history: Stream<Location>,
    namespace: Arc<[String]>,
    create_href: CreateHref,
}

impl fmt::Debug for RouterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterSource")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl RouterSource {
    pub fn new(
        history: Stream<Location>,
        namespace: impl Into<Arc<[String]>>,
        create_href: CreateHref,
    ) -> Self {
        Self {
            history,
            namespace: namespace.into(),
            create_href,
        }
    }

    /// The locations visible in this scope.
    pub fn history(&self) -> &Stream<Location> {
        &self.history
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// Narrows the scope by `segment`.
    ///
    /// Slashes in `segment` are ignored, so `path("/some")` and `path("some")`
    /// are the same scope and `path("/a/b")` narrows by two segments. The
    /// original source is not affected.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "trace",
            skip(self),
            fields(namespace = ?self.namespace)
        )
    )]
    pub fn path(&self, segment: &str) -> RouterSource {
        let namespace: Arc<[String]> = self
            .namespace
            .iter()
            .cloned()
            .chain(split_path(segment).into_iter().map(String::from))
            .collect();
        let history = {
            let namespace = Arc::clone(&namespace);
            self.history
                .filter(move |location| {
                    is_in_scope(&namespace, &location.pathname)
                })
        };
        RouterSource {
            history,
            namespace,
            create_href: Arc::clone(&self.create_href),
        }
    }

    /// Matches every location in scope against `routes` with the default
    /// [`LongestPrefix`] matcher.
    pub fn define<V>(&self, routes: Routes<V>) -> MatchStream<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.define_with(routes, LongestPrefix)
    }

    /// Matches every location in scope against `routes` with `matcher`.
    ///
    /// The namespace segments are stripped from each pathname before matching,
    /// so routes are written relative to this scope.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "trace",
            skip_all,
            fields(namespace = ?self.namespace)
        )
    )]
    pub fn define_with<V, M>(
        &self,
        routes: Routes<V>,
        matcher: M,
    ) -> MatchStream<V>
    where
        V: Clone + Send + Sync + 'static,
        M: PathMatcher,
    {
        let create_href = self.href_builder();
        let namespace = Arc::clone(&self.namespace);
        let stream = self.history.map({
            let create_href = create_href.clone();
            move |location: &Location| {
                let remainder = format!(
                    "/{}",
                    filter_path(&split_path(&location.pathname), &namespace)
                );
                let resolved = matcher.match_path(&remainder, &routes);
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    pathname = %location.pathname,
                    %remainder,
                    matched = %resolved.path,
                    "resolved route"
                );
                RouteMatch {
                    path: resolved.path,
                    value: resolved.value,
                    params: resolved.params,
                    location: location.clone(),
                    create_href: create_href.clone(),
                }
            }
        });
        MatchStream {
            stream,
            create_href,
        }
    }

    /// Creates an href for `fragment`, relative to this scope.
    pub fn create_href(&self, fragment: &str) -> String {
        self.href_builder().create_href(fragment)
    }

    fn href_builder(&self) -> HrefBuilder {
        HrefBuilder::new(
            Arc::clone(&self.namespace),
            Arc::clone(&self.create_href),
        )
    }
}

/// One location matched against a route table.
#[derive(Debug, Clone)]
pub struct RouteMatch<V> {
    /// The part of the scoped path consumed by the route table.
    pub path: String,
    pub value: Option<V>,
    /// Parameters captured by `:name` and `*name` patterns.
    pub params: ParamsMap,
    pub location: Location,
    pub create_href: HrefBuilder,
}

impl<V> RouteMatch<V> {
    pub fn create_href(&self, fragment: &str) -> String {
        self.create_href.create_href(fragment)
    }
}

/// The stream returned by [`RouterSource::define`].
///
/// Hrefs can be created from it directly, before any match has been emitted.
#[derive(Clone)]
pub struct MatchStream<V> {
    stream: Stream<RouteMatch<V>>,
    create_href: HrefBuilder,
}

impl<V> fmt::Debug for MatchStream<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchStream")
            .field("create_href", &self.create_href)
            .finish_non_exhaustive()
    }
}

impl<V> MatchStream<V>
where
    V: Send + Sync + 'static,
{
    pub fn subscribe(&self, observer: Observer<RouteMatch<V>>) -> Subscription {
        self.stream.subscribe(observer)
    }

    pub fn for_each(
        &self,
        next: impl Fn(&RouteMatch<V>) + Send + Sync + 'static,
    ) -> Subscription {
        self.stream.for_each(next)
    }

    pub fn stream(&self) -> &Stream<RouteMatch<V>> {
        &self.stream
    }

    pub fn into_stream(self) -> Stream<RouteMatch<V>> {
        self.stream
    }

    pub fn create_href(&self, fragment: &str) -> String {
        self.create_href.create_href(fragment)
    }
}
