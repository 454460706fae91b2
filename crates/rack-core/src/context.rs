//! Per-invocation handler context.
//!
//! The [`Context`] is created by the pipeline once the payload has been
//! decoded and is dropped once the response has been encoded. It is a cheap
//! handle: clones share the same request, response and scratch store, so
//! work spawned by a handler can write to the same response.

use crate::error::StatusError;
use crate::handler::{BindHook, HandlerResult};
use crate::{Invocation, Request, Response};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";

type Store = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// The handler context for one invocation.
///
/// # Example
///
/// ```
/// use rack_core::{Context, Invocation, Request};
/// use http::StatusCode;
///
/// let mut req = Request::new("GET", "/users/42");
/// req.path.insert("id".to_string(), "42".to_string());
///
/// let ctx = Context::new(Invocation::new(), req);
/// assert_eq!(ctx.path("id"), "42");
/// assert_eq!(ctx.query("missing"), "");
///
/// ctx.string(StatusCode::OK, "hello").unwrap();
/// assert_eq!(ctx.response().body, "hello");
/// ```
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    invocation: Invocation,
    request: Request,
    response: RwLock<Response>,
    store: RwLock<Option<Store>>,
    on_bind: BindHook,
}

impl Context {
    /// Creates a context with an unwritten response and a no-op bind hook.
    #[must_use]
    pub fn new(invocation: Invocation, request: Request) -> Self {
        Self::with_bind_hook(invocation, request, Arc::new(accept_bound))
    }

    /// Creates a context that runs `on_bind` after every successful bind.
    #[must_use]
    pub fn with_bind_hook(invocation: Invocation, request: Request, on_bind: BindHook) -> Self {
        Self {
            inner: Arc::new(Inner {
                invocation,
                request,
                response: RwLock::new(Response::new()),
                store: RwLock::new(None),
                on_bind,
            }),
        }
    }

    /// Returns the invocation carrier (request id, deadline, cancellation).
    #[must_use]
    pub fn invocation(&self) -> &Invocation {
        &self.inner.invocation
    }

    /// Returns the canonical request.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.inner.request
    }

    /// Locks the response for reading.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn response(&self) -> RwLockReadGuard<'_, Response> {
        self.inner.response.read()
    }

    /// Locks the response for writing.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn response_mut(&self) -> RwLockWriteGuard<'_, Response> {
        self.inner.response.write()
    }

    /// Returns a copy of the response as it stands.
    #[must_use]
    pub fn snapshot(&self) -> Response {
        self.inner.response.read().clone()
    }

    /// Returns the stored value for `key` if it exists and is a `T`.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get_any(key).and_then(|v| v.downcast::<T>().ok())
    }

    /// Returns the stored value for `key` without a type check.
    #[must_use]
    pub fn get_any(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.inner
            .store
            .read()
            .as_ref()
            .and_then(|store| store.get(key).cloned())
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.inner
            .store
            .write()
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), Arc::new(value));
    }

    /// Returns the path parameter `key`, or an empty string.
    #[must_use]
    pub fn path(&self, key: &str) -> &str {
        self.inner
            .request
            .path
            .get(key)
            .map_or("", String::as_str)
    }

    /// Returns the first query value for `key`, or an empty string.
    ///
    /// Read [`Request::query`] directly when every value is needed.
    #[must_use]
    pub fn query(&self, key: &str) -> &str {
        self.inner.request.first_query(key).unwrap_or("")
    }

    /// Decodes the JSON body into `target`.
    ///
    /// An empty body leaves `target` untouched. A malformed body fails with a
    /// `400 Bad Request` [`StatusError`]. On success the configured bind hook
    /// runs and its error, if any, is returned unchanged.
    pub fn bind<T>(&self, target: &mut T) -> HandlerResult
    where
        T: DeserializeOwned + Any,
    {
        let body = &self.inner.request.body;
        if body.is_empty() {
            return Ok(());
        }

        *target = serde_json::from_str(body)
            .map_err(|e| StatusError::wrap(StatusCode::BAD_REQUEST, e))?;

        (self.inner.on_bind)(self, &*target)
    }

    /// Writes a status code with no body.
    pub fn no_content(&self, code: StatusCode) -> HandlerResult {
        self.response_mut().status = Some(code);
        Ok(())
    }

    /// Writes a status code and a plain-text body.
    pub fn string(&self, code: StatusCode, body: impl Into<String>) -> HandlerResult {
        let mut res = self.response_mut();
        res.status = Some(code);
        res.body = body.into();
        res.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        Ok(())
    }

    /// Serializes `value` and writes it as a JSON body.
    ///
    /// The response is left untouched if serialization fails.
    pub fn json<T: Serialize + ?Sized>(&self, code: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_string(value)?;

        let mut res = self.response_mut();
        res.status = Some(code);
        res.body = body;
        res.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Ok(())
    }
}

fn accept_bound(_: &Context, _: &dyn Any) -> HandlerResult {
    Ok(())
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("invocation", &self.inner.invocation)
            .field("request", &self.inner.request)
            .field("response", &*self.inner.response.read())
            .finish_non_exhaustive()
    }
}
