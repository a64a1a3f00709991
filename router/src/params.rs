use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::borrow::Cow;

type ParamsMapInner = Vec<(Cow<'static, str>, Vec<String>)>;

/// An ordered multimap of string keys and values, used both for the parsed
/// query string of a [`Location`](crate::location::Location) and for the
/// parameters captured while matching a route.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ParamsMap(ParamsMapInner);

impl ParamsMap {
    /// Creates an empty map.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without its leading `?`.
    pub fn from_query(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        url::form_urlencoded::parse(search.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Inserts a value into the map.
    ///
    /// If a value with that key already exists, the new value is added to it.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: String) {
        let key = key.into();
        if let Some(prev) = self.0.iter_mut().find(|(k, _)| k == &key) {
            prev.1.push(value);
        } else {
            self.0.push((key, vec![value]));
        }
    }

    /// Merges all entries of `other` into this map.
    pub fn extend(&mut self, other: ParamsMap) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    /// Gets the most-recently-added value of this key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_str(key).map(ToOwned::to_owned)
    }

    /// Gets every value stored under this key.
    pub fn get_all(&self, key: &str) -> Option<Vec<String>> {
        self.0
            .iter()
            .find_map(|(k, v)| if k == key { Some(v.clone()) } else { None })
    }

    /// Gets a reference to the most-recently-added value of this key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.iter().find_map(|(k, v)| {
            if k == key {
                v.last().map(|i| i.as_str())
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the map back into a query string, including the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut buf = String::new();
        if !self.0.is_empty() {
            buf.push('?');
            for (k, vs) in &self.0 {
                for v in vs {
                    buf.extend(utf8_percent_encode(k, NON_ALPHANUMERIC));
                    buf.push('=');
                    buf.extend(utf8_percent_encode(v, NON_ALPHANUMERIC));
                    buf.push('&');
                }
            }
            buf.pop();
        }
        buf
    }
}

impl<K, V> FromIterator<(K, V)> for ParamsMap
where
    K: Into<Cow<'static, str>>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value.into());
        }
        map
    }
}

impl IntoIterator for ParamsMap {
    type Item = (Cow<'static, str>, String);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
            .into_iter()
            .flat_map(|(k, vs)| vs.into_iter().map(move |v| (k.clone(), v)))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

/// Builds a [`ParamsMap`] from `key => value` pairs.
#[macro_export]
macro_rules! params_map {
    ($($key:expr => $val:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut map = $crate::params::ParamsMap::new();
        $( map.insert($key, ::std::string::String::from($val)); )*
        map
    });
}
