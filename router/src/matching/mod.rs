mod matcher;

use crate::{params::ParamsMap, path::split_path};
pub use matcher::*;

/// The key of the fallback entry in a route table.
pub const WILDCARD: &str = "*";

/// An entry of a route table: either a value or a nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteNode<V> {
    Value(V),
    Nested(Routes<V>),
}

/// A nested route table.
///
/// ```rust
/// use scoped_router::Routes;
///
/// let routes = Routes::new()
///     .nest("/correct", Routes::new().route("/route", 123))
///     .route("*", 999);
/// assert_eq!(routes.fallback(), Some(&999));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Routes<V> {
    entries: Vec<(String, RouteNode<V>)>,
    fallback: Option<V>,
}

impl<V> Default for Routes<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
        }
    }
}

impl<V> Routes<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a terminal route. The pattern `*` sets the fallback instead.
    pub fn route(mut self, pattern: impl Into<String>, value: V) -> Self {
        let pattern = pattern.into();
        if pattern == WILDCARD {
            self.fallback = Some(value);
        } else {
            self.entries.push((pattern, RouteNode::Value(value)));
        }
        self
    }

    /// Adds a nested table under `pattern`.
    pub fn nest(
        mut self,
        pattern: impl Into<String>,
        routes: Routes<V>,
    ) -> Self {
        self.entries.push((pattern.into(), RouteNode::Nested(routes)));
        self
    }

    /// The value used when no pattern matches.
    pub fn fallback(&self) -> Option<&V> {
        self.fallback.as_ref()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &RouteNode<V>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.fallback.is_none()
    }
}

/// The outcome of matching a path against a route table.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<V> {
    /// The matched part of the path, or the whole path when nothing matched.
    pub path: String,
    /// `None` when nothing matched and there was no fallback.
    pub value: Option<V>,
    pub params: ParamsMap,
}

/// Resolves a path against a route table.
pub trait PathMatcher: Send + Sync + 'static {
    fn match_path<V: Clone>(
        &self,
        path: &str,
        routes: &Routes<V>,
    ) -> Resolution<V>;
}

/// The default matcher.
///
/// Every pattern of a table is tested against the leading segments of the
/// path; nested tables continue with whatever their pattern left over. The
/// candidate consuming the most segments wins, with ties going to the entry
/// declared first. When no pattern matches, the table's `*` fallback consumes
/// the whole (remaining) path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LongestPrefix;

struct Candidate<V> {
    consumed: usize,
    value: V,
    params: ParamsMap,
}

impl LongestPrefix {
    fn resolve<V: Clone>(
        segments: &[&str],
        routes: &Routes<V>,
    ) -> Option<Candidate<V>> {
        let mut best: Option<Candidate<V>> = None;

        for (pattern, node) in &routes.entries {
            let Some(matched) = Matcher::new(pattern).test(segments) else {
                continue;
            };
            let candidate = match node {
                RouteNode::Value(value) => Some(Candidate {
                    consumed: matched.consumed,
                    value: value.clone(),
                    params: matched.params,
                }),
                RouteNode::Nested(nested) => {
                    Self::resolve(&segments[matched.consumed..], nested).map(
                        |child| {
                            let mut params = matched.params;
                            params.extend(child.params);
                            Candidate {
                                consumed: matched.consumed + child.consumed,
                                value: child.value,
                                params,
                            }
                        },
                    )
                }
            };
            if let Some(candidate) = candidate {
                if best
                    .as_ref()
                    .is_none_or(|best| candidate.consumed > best.consumed)
                {
                    best = Some(candidate);
                }
            }
        }

        best.or_else(|| {
            routes.fallback.as_ref().map(|value| Candidate {
                consumed: segments.len(),
                value: value.clone(),
                params: ParamsMap::new(),
            })
        })
    }
}

impl PathMatcher for LongestPrefix {
    fn match_path<V: Clone>(
        &self,
        path: &str,
        routes: &Routes<V>,
    ) -> Resolution<V> {
        let segments = split_path(path);
        match Self::resolve(&segments, routes) {
            Some(Candidate {
                consumed,
                value,
                params,
            }) => Resolution {
                path: format!("/{}", segments[..consumed].join("/")),
                value: Some(value),
                params,
            },
            None => Resolution {
                path: path.to_string(),
                value: None,
                params: ParamsMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params_map;

    fn table() -> Routes<i32> {
        Routes::new()
            .nest("/correct", Routes::new().route("/route", 123))
            .route("*", 999)
    }

    #[test]
    fn matches_nested_routes() {
        let resolved = LongestPrefix.match_path("/correct/route", &table());
        assert_eq!(resolved.path, "/correct/route");
        assert_eq!(resolved.value, Some(123));
    }

    #[test]
    fn falls_back_to_wildcard() {
        let resolved = LongestPrefix.match_path("/incorrect/route", &table());
        assert_eq!(resolved.path, "/incorrect/route");
        assert_eq!(resolved.value, Some(999));
    }

    #[test]
    fn matches_partials() {
        let routes = Routes::new().route("/correct/route", 123);
        let resolved = LongestPrefix.match_path("/correct/route/partial", &routes);
        assert_eq!(resolved.path, "/correct/route");
        assert_eq!(resolved.value, Some(123));
    }

    #[test]
    fn unmatched_without_fallback_keeps_path() {
        let routes = Routes::new().route("/home", 1);
        let resolved = LongestPrefix.match_path("/away", &routes);
        assert_eq!(resolved.path, "/away");
        assert_eq!(resolved.value, None);
        assert!(resolved.params.is_empty());
    }

    #[test]
    fn longest_match_wins_and_ties_go_to_first() {
        let routes = Routes::new()
            .route("/a", "short")
            .route("/a/b", "long")
            .route("/a/:x", "param");
        let resolved = LongestPrefix.match_path("/a/b/c", &routes);
        assert_eq!(resolved.value, Some("long"));
        assert_eq!(resolved.path, "/a/b");
        assert_eq!(LongestPrefix.match_path("/a", &routes).value, Some("short"));
    }

    #[test]
    fn root_pattern_only_matches_root() {
        let routes = Routes::new()
            .route("/", "home")
            .nest("/users", Routes::new().route("/", "list").route("/:id", "user"));
        assert_eq!(LongestPrefix.match_path("/", &routes).value, Some("home"));
        assert_eq!(LongestPrefix.match_path("/users", &routes).value, Some("list"));
        assert_eq!(LongestPrefix.match_path("/other", &routes).value, None);
    }

    #[test]
    fn collects_params_through_nesting() {
        let routes = Routes::new().nest(
            "/org/:org",
            Routes::new().route("/repo/:repo", "repo"),
        );
        let resolved = LongestPrefix.match_path("/org/leptos/repo/router", &routes);
        assert_eq!(resolved.value, Some("repo"));
        assert_eq!(resolved.params, params_map!("org" => "leptos", "repo" => "router"));
    }

    #[test]
    fn nested_fallback_applies_to_its_remainder() {
        let routes = Routes::new()
            .nest("/docs", Routes::new().route("/intro", 1).route("*", 2))
            .route("*", 3);
        let resolved = LongestPrefix.match_path("/docs/missing/page", &routes);
        assert_eq!(resolved.value, Some(2));
        assert_eq!(resolved.path, "/docs/missing/page");
        assert_eq!(LongestPrefix.match_path("/blog", &routes).value, Some(3));
    }
}
