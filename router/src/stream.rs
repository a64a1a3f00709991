//! A small push-based stream runtime.
//!
//! A [`Stream`] is lazy: nothing happens until it is subscribed to, and each
//! derived stream ([`filter`](Stream::filter), [`map`](Stream::map))
//! subscribes to its source when it is itself subscribed to. A [`Subject`] is
//! the hot end: values passed to [`Subject::next`] are delivered synchronously,
//! in order, to every current subscriber.
//!
//! ```rust
//! use scoped_router::stream::Subject;
//! use std::sync::{Arc, Mutex};
//!
//! let subject = Subject::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let even = subject.stream().filter(|n: &i32| n % 2 == 0);
//! let sub = even.for_each({
//!     let seen = Arc::clone(&seen);
//!     move |n| seen.lock().unwrap().push(*n)
//! });
//!
//! subject.next(1);
//! subject.next(2);
//! sub.cancel();
//! subject.next(4);
//! assert_eq!(*seen.lock().unwrap(), vec![2]);
//! ```

use core::fmt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type NextFn<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CompleteFn = Arc<dyn Fn() + Send + Sync>;

/// Receives the values of a stream.
pub struct Observer<T> {
    next: NextFn<T>,
    complete: Option<CompleteFn>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            next: Arc::clone(&self.next),
            complete: self.complete.clone(),
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}

impl<T> Observer<T> {
    pub fn new(next: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self {
            next: Arc::new(next),
            complete: None,
        }
    }

    /// Adds a callback for the end of the stream.
    pub fn on_complete(
        mut self,
        complete: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.complete = Some(Arc::new(complete));
        self
    }

    pub fn next(&self, value: &T) {
        (self.next)(value)
    }

    pub fn complete(&self) {
        if let Some(complete) = &self.complete {
            complete()
        }
    }
}

/// A handle to an active subscription.
///
/// Dropping the handle does not cancel the subscription.
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// A subscription with nothing left to cancel.
    pub fn closed() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }

    /// Stops delivery to the observer. Cancelling twice does nothing.
    pub fn cancel(&self) {
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.lock().is_none()
    }
}

type SubscribeFn<T> = Arc<dyn Fn(Observer<T>) -> Subscription + Send + Sync>;

/// A lazily-evaluated, push-based stream of values.
pub struct Stream<T> {
    subscribe: SubscribeFn<T>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe: Arc::clone(&self.subscribe),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

impl<T> Stream<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a stream from its subscribe function.
    pub fn new(
        subscribe: impl Fn(Observer<T>) -> Subscription + Send + Sync + 'static,
    ) -> Self {
        Self {
            subscribe: Arc::new(subscribe),
        }
    }

    /// A stream that emits each item to every subscriber, then completes.
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        let items: Arc<[T]> = items.into_iter().collect();
        Self::new(move |observer| {
            for item in items.iter() {
                observer.next(item);
            }
            observer.complete();
            Subscription::closed()
        })
    }

    /// A stream that emits `value` once, then completes.
    pub fn of(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_iter([value])
    }

    /// A stream that completes without emitting.
    pub fn empty() -> Self {
        Self::new(|observer| {
            observer.complete();
            Subscription::closed()
        })
    }

    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        (self.subscribe)(observer)
    }

    /// Subscribes with a callback for each value.
    pub fn for_each(
        &self,
        next: impl Fn(&T) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe(Observer::new(next))
    }

    /// Emits only the values for which `predicate` returns `true`.
    pub fn filter(
        &self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Stream<T> {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Stream::new(move |observer: Observer<T>| {
            let predicate = Arc::clone(&predicate);
            let downstream = observer.clone();
            source.subscribe(
                Observer::new(move |value: &T| {
                    if predicate(value) {
                        downstream.next(value);
                    }
                })
                .on_complete(move || observer.complete()),
            )
        })
    }

    /// Emits `f(value)` for every value.
    pub fn map<U>(
        &self,
        f: impl Fn(&T) -> U + Send + Sync + 'static,
    ) -> Stream<U>
    where
        U: Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Stream::new(move |observer: Observer<U>| {
            let f = Arc::clone(&f);
            let downstream = observer.clone();
            source.subscribe(
                Observer::new(move |value: &T| downstream.next(&f(value)))
                    .on_complete(move || observer.complete()),
            )
        })
    }
}

struct SubjectInner<T> {
    observers: Vec<(usize, Observer<T>)>,
    next_id: usize,
    remember: bool,
    last: Option<T>,
    completed: bool,
}

/// A hot, multicast source of values.
///
/// A remembering subject keeps its latest value and delivers it to every new
/// subscriber before any later value.
pub struct Subject<T> {
    inner: Arc<Mutex<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Subject")
            .field("observers", &inner.observers.len())
            .field("remember", &inner.remember)
            .field("completed", &inner.completed)
            .finish()
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::with_inner(false, None)
    }
}

impl<T> Subject<T> {
    fn with_inner(remember: bool, last: Option<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SubjectInner {
                observers: Vec::new(),
                next_id: 0,
                remember,
                last,
                completed: false,
            })),
        }
    }
}

impl<T> Subject<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// A subject that replays its latest value to new subscribers.
    pub fn remember() -> Self {
        Self::with_inner(true, None)
    }

    /// A remembering subject that starts out holding `initial`.
    pub fn remember_with(initial: T) -> Self {
        Self::with_inner(true, Some(initial))
    }

    /// Delivers `value` to every current subscriber. Ignored after completion.
    pub fn next(&self, value: T) {
        let observers = {
            let mut inner = self.inner.lock();
            if inner.completed {
                return;
            }
            if inner.remember {
                inner.last = Some(value.clone());
            }
            inner
                .observers
                .iter()
                .map(|(_, observer)| observer.clone())
                .collect::<Vec<_>>()
        };
        for observer in observers {
            observer.next(&value);
        }
    }

    /// Completes every current subscriber and rejects later values.
    pub fn complete(&self) {
        let observers = {
            let mut inner = self.inner.lock();
            if inner.completed {
                return;
            }
            inner.completed = true;
            std::mem::take(&mut inner.observers)
        };
        for (_, observer) in observers {
            observer.complete();
        }
    }

    pub fn is_completed(&self) -> bool {
        self.inner.lock().completed
    }

    /// The latest value, if this subject remembers values.
    pub fn last(&self) -> Option<T> {
        self.inner.lock().last.clone()
    }

    /// A stream of the values passed to this subject.
    pub fn stream(&self) -> Stream<T> {
        let weak = Arc::downgrade(&self.inner);
        Stream::new(move |observer: Observer<T>| {
            let Some(inner) = weak.upgrade() else {
                observer.complete();
                return Subscription::closed();
            };
            let (id, last) = {
                let mut inner = inner.lock();
                let last = inner.last.clone();
                if inner.completed {
                    (None, last)
                } else {
                    let id = inner.next_id;
                    inner.next_id += 1;
                    inner.observers.push((id, observer.clone()));
                    (Some(id), last)
                }
            };

            if let Some(last) = last {
                observer.next(&last);
            }
            match id {
                Some(id) => {
                    let inner: Weak<_> = Arc::downgrade(&inner);
                    Subscription::new(move || {
                        if let Some(inner) = inner.upgrade() {
                            inner.lock().observers.retain(|(i, _)| *i != id);
                        }
                    })
                }
                None => {
                    observer.complete();
                    Subscription::closed()
                }
            }
        })
    }
}
