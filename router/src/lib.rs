//! A router over a stream of history locations.
//!
//! A [`RouterDriver`] connects a stream of navigation requests to a
//! [`HistoryBackend`](location::HistoryBackend) and hands back a root
//! [`RouterSource`]. Sources are narrowed with [`RouterSource::path`] and
//! resolved against a nested [`Routes`] table with [`RouterSource::define`]:
//!
//! ```rust
//! use scoped_router::{
//!     location::{HistoryOptions, LocationChange, ServerHistory},
//!     make_router_driver,
//!     stream::Stream,
//!     Routes,
//! };
//! use std::sync::{Arc, Mutex};
//!
//! let history = ServerHistory::new("/").unwrap();
//! let driver =
//!     make_router_driver(Some(history), HistoryOptions::default()).unwrap();
//! let router = driver.run(Stream::from_iter([
//!     LocationChange::from("/wrong/path"),
//!     LocationChange::from("/some/nested/correct/route"),
//! ]));
//!
//! let matches = router
//!     .path("/some")
//!     .path("/nested")
//!     .define(Routes::new().nest("/correct", Routes::new().route("/route", 123)));
//! assert_eq!(matches.create_href("/correct/route"), "/some/nested/correct/route");
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! matches.for_each({
//!     let seen = Arc::clone(&seen);
//!     move |m| seen.lock().unwrap().push((m.path.clone(), m.value))
//! });
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![("/correct/route".to_string(), Some(123))]
//! );
//! ```

#![forbid(unsafe_code)]

mod driver;
mod error;
pub mod location;
mod matching;
pub mod params;
pub mod path;
mod source;
pub mod stream;

pub use driver::*;
pub use error::*;
pub use matching::*;
pub use source::*;
