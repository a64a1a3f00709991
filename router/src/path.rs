use std::{fmt, sync::Arc};

/// Turns a full path into an href. Supplied by the history backend.
pub type CreateHref = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Splits a path into its non-empty segments.
///
/// Leading, trailing and repeated slashes are collapsed, so `"//a/b/"` yields
/// `["a", "b"]` and `""` yields nothing.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|p| !p.is_empty()).collect()
}

/// Removes every segment that appears anywhere in `namespace` and joins the
/// rest with `/`.
///
/// Segments are removed by membership, not by position: a segment equal to any
/// namespace segment is dropped wherever it occurs in the path.
pub fn filter_path<S: AsRef<str>>(
    segments: &[&str],
    namespace: &[S],
) -> String {
    segments
        .iter()
        .filter(|part| !namespace.iter().any(|ns| ns.as_ref() == **part))
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `namespace` is a positional segment prefix of `path`.
pub fn is_in_scope<S: AsRef<str>>(namespace: &[S], path: &str) -> bool {
    let parts = split_path(path);
    namespace
        .iter()
        .enumerate()
        .all(|(i, ns)| parts.get(i) == Some(&ns.as_ref()))
}

/// Builds hrefs relative to a namespace.
#[derive(Clone)]
pub struct HrefBuilder {
    namespace: Arc<[String]>,
    root: CreateHref,
}

impl fmt::Debug for HrefBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HrefBuilder")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl HrefBuilder {
    pub fn new(namespace: impl Into<Arc<[String]>>, root: CreateHref) -> Self {
        Self {
            namespace: namespace.into(),
            root,
        }
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// Joins the namespace and `fragment` with a single `/`, makes sure the
    /// result starts with `/` (or `#/`), and passes it to the root href
    /// function.
    pub fn create_href(&self, fragment: &str) -> String {
        let full = if self.namespace.is_empty() {
            fragment.to_string()
        } else {
            let prefix = self.namespace.join("/");
            let rest = fragment.trim_start_matches('/');
            if rest.is_empty() {
                prefix
            } else {
                format!("{prefix}/{rest}")
            }
        };

        if full.starts_with('/') || full.starts_with("#/") {
            (self.root)(&full)
        } else {
            (self.root)(&format!("/{full}"))
        }
    }
}

/// Returns an href function scoped to `namespace`.
pub fn make_create_href(
    namespace: impl Into<Arc<[String]>>,
    root: CreateHref,
) -> impl Fn(&str) -> String + Clone + Send + Sync + 'static {
    let builder = HrefBuilder::new(namespace, root);
    move |fragment: &str| builder.create_href(fragment)
}
