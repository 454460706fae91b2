//! The canonical request.
//!
//! Every wire format is decoded into a [`Request`]. Handlers never see the
//! gateway-specific shape unless they ask for it through [`Request::event`].

use http::HeaderMap;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Path parameters, keyed by name.
pub type PathParams = HashMap<String, String>;

/// Query parameters, keyed by name, preserving every value in arrival order.
pub type QueryParams = HashMap<String, Vec<String>>;

/// The decoded wire event, kept as a read-only passthrough.
#[derive(Clone)]
pub struct Event(Option<Arc<dyn Any + Send + Sync>>);

impl Event {
    /// Wraps a decoded wire event.
    pub fn new<T: Any + Send + Sync>(event: T) -> Self {
        Self(Some(Arc::new(event)))
    }

    /// An empty passthrough, used for requests built by hand.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns the event as `T`, if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|e| e.downcast_ref::<T>())
    }

    /// Returns `true` if no event is attached.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("attached", &self.0.is_some())
            .finish()
    }
}

/// The canonical request shared by every wire format.
///
/// Path, query and header containers are always present; absence is an empty
/// container.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method, as sent by the gateway.
    pub method: String,
    /// Raw request path.
    pub raw_path: String,
    /// Path parameters.
    pub path: PathParams,
    /// Query parameters.
    pub query: QueryParams,
    /// Request headers; names compare case-insensitively.
    pub headers: HeaderMap,
    /// Request body; empty means no body.
    pub body: String,
    /// The decoded wire event this request came from.
    pub event: Event,
}

impl Request {
    /// Creates a request with the given method and path and empty containers.
    #[must_use]
    pub fn new(method: impl Into<String>, raw_path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            raw_path: raw_path.into(),
            ..Self::default()
        }
    }

    /// Returns the decoded wire event as `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use rack_core::{Event, Request};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct MyEvent(u32);
    ///
    /// let mut req = Request::new("GET", "/");
    /// req.event = Event::new(MyEvent(7));
    ///
    /// assert_eq!(req.event::<MyEvent>(), Some(&MyEvent(7)));
    /// assert!(req.event::<String>().is_none());
    /// ```
    #[must_use]
    pub fn event<T: Any>(&self) -> Option<&T> {
        self.event.downcast_ref::<T>()
    }

    /// Returns the first query value for `key`, if any.
    #[must_use]
    pub fn first_query(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
