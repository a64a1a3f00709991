use crate::{error::RouterError, params::ParamsMap};
use core::fmt;
use percent_encoding::percent_decode_str;
use rand::{distr::Alphanumeric, Rng};
use serde_json::Value;

mod history;
mod server;
pub use history::*;
pub use server::*;

pub(crate) const BASE: &str = "http://localhost";

const KEY_LENGTH: usize = 6;

/// How a location was reached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Push,
    #[default]
    Pop,
    Replace,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Push => "PUSH",
            Action::Pop => "POP",
            Action::Replace => "REPLACE",
        })
    }
}

/// Arbitrary data attached to a history entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct State(Option<Value>);

impl State {
    pub fn new(state: Option<Value>) -> Self {
        Self(state)
    }

    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Value> for State {
    fn from(value: Value) -> Self {
        State(Some(value))
    }
}

/// A single navigation: the URL state of one history entry.
///
/// A new `Location` is created for every navigation; it is never modified
/// afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Location {
    /// The path of the URL, without query string or hash. Starts with `/`.
    pub pathname: String,
    /// The raw query string, empty or starting with `?`.
    pub search: String,
    /// The hash fragment, empty or starting with `#`.
    pub hash: String,
    pub state: State,
    pub action: Action,
    /// A unique key assigned by the history backend.
    pub key: Option<String>,
    /// The query string parsed into its key-value pairs, when query parsing is
    /// enabled on the backend.
    pub query: Option<ParamsMap>,
}

impl Location {
    /// Normalizes a path (which may carry a query string and a hash) into a
    /// `Location` with action [`Action::Pop`], no state and no key.
    ///
    /// The pathname keeps the segments it was given, percent-decoded and with
    /// exactly one leading `/`. Dot segments are not resolved.
    pub fn parse(path: &str) -> Result<Self, RouterError> {
        let (path, hash) = match path.split_once('#') {
            Some((path, hash)) => (path, Some(hash)),
            None => (path, None),
        };
        let (path, search) = match path.split_once('?') {
            Some((path, search)) => (path, Some(search)),
            None => (path, None),
        };

        // only the query and fragment go through the URL parser
        let mut url = url::Url::parse(BASE)?;
        url.set_query(search.filter(|q| !q.is_empty()));
        url.set_fragment(hash.filter(|h| !h.is_empty()));

        Ok(Location {
            pathname: format!("/{}", unescape(path).trim_start_matches('/')),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hash: url.fragment().map(|h| format!("#{h}")).unwrap_or_default(),
            ..Default::default()
        })
    }

    /// Builds the location a backend records for `change`.
    pub fn from_change(
        change: &LocationChange,
        action: Action,
    ) -> Result<Self, RouterError> {
        let mut location = Self::parse(&change.value)?;
        location.state = change.state.clone();
        location.action = action;
        Ok(location)
    }

    /// Fills in `query` from the search string.
    pub fn with_query(mut self) -> Self {
        self.query = Some(ParamsMap::from_query(&self.search));
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The path, query string and hash joined back together.
    pub fn to_full_path(&self) -> String {
        let mut path = self.pathname.clone();
        path.push_str(&self.search);
        path.push_str(&self.hash);
        path
    }
}

/// A request to navigate, as carried by a router driver's input stream.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocationChange {
    /// The new URL.
    pub value: String,
    /// If true, the new location replaces the current history entry.
    pub replace: bool,
    pub state: State,
}

impl LocationChange {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn replace(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            replace: true,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<State>) -> Self {
        self.state = state.into();
        self
    }
}

impl From<&str> for LocationChange {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LocationChange {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&Location> for LocationChange {
    fn from(location: &Location) -> Self {
        Self {
            value: location.to_full_path(),
            replace: location.action == Action::Replace,
            state: location.state.clone(),
        }
    }
}

pub(crate) fn unescape(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

pub(crate) fn create_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}
