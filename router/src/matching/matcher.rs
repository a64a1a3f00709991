use crate::params::ParamsMap;
use percent_encoding::percent_decode_str;

/// The part of a path consumed by one route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMatch {
    /// How many location segments the pattern consumed.
    pub consumed: usize,
    pub params: ParamsMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// Tests a single route pattern against the leading segments of a path.
///
/// Patterns are made of static segments, `:name` parameters, and an optional
/// trailing `*` or `*name` splat that consumes every remaining segment.
/// Extra location segments past the end of the pattern are allowed, so
/// `/foo` matches the first segment of `/foo/bar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    segments: Vec<Segment>,
    splat: Option<String>,
}

impl Matcher {
    pub fn new(pattern: &str) -> Self {
        let (pattern, splat) = match pattern.split_once('*') {
            Some((p, s)) => (p, Some(s.trim_matches('/').to_string())),
            None => (pattern, None),
        };
        let segments = pattern
            .split('/')
            .filter(|p| !p.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(segment.to_string()),
            })
            .collect();
        Self { segments, splat }
    }

    /// Whether the pattern has no segments at all, i.e. is `/` or empty.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty() && self.splat.is_none()
    }

    pub fn test(&self, location: &[&str]) -> Option<SegmentMatch> {
        // quick path: the pattern has more segments than the location
        if location.len() < self.segments.len() {
            return None;
        }
        // the root pattern only matches an empty remainder
        if self.is_root() && !location.is_empty() {
            return None;
        }

        let mut params = ParamsMap::new();
        for (segment, loc_segment) in self.segments.iter().zip(location) {
            match segment {
                Segment::Param(name) => {
                    params.insert(name.clone(), unescape(loc_segment))
                }
                Segment::Static(s) if s == loc_segment => {}
                Segment::Static(_) => return None,
            }
        }

        let mut consumed = self.segments.len();
        if let Some(splat) = &self.splat {
            let rest = &location[consumed..];
            if !splat.is_empty() {
                params.insert(splat.clone(), rest.join("/"));
            }
            consumed = location.len();
        }

        Some(SegmentMatch { consumed, params })
    }
}

fn unescape(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
