//! Ordered middleware composition.
//!
//! A [`Chain`] is an ordered list of middleware. [`Chain::then`] folds it
//! right-to-left around a handler, so index 0 ends up outermost:
//!
//! ```text
//! Chain[m1, m2].then(h)  ==  m1(m2(h))
//!
//! m1 before → m2 before → h → m2 after → m1 after
//! ```
//!
//! The composed handler is built once and reused for every invocation.

use crate::middleware::{SharedMiddleware, Wrapped};
use rack_core::BoxedHandler;
use std::sync::Arc;

/// An ordered sequence of middleware.
#[derive(Clone, Default)]
pub struct Chain {
    middleware: Vec<SharedMiddleware>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware; it runs inside everything added before it.
    #[must_use]
    pub fn with<M: crate::Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared middleware.
    #[must_use]
    pub fn with_shared(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Returns the number of middleware in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Returns `true` if the chain has no middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Returns the middleware names, outermost first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.middleware.iter().map(|m| m.name())
    }

    /// Composes the chain around `handler`.
    ///
    /// An empty chain returns `handler` unchanged.
    #[must_use]
    pub fn then(&self, handler: BoxedHandler) -> BoxedHandler {
        self.middleware.iter().rev().fold(handler, |next, middleware| {
            Arc::new(Wrapped::new(Arc::clone(middleware), next))
        })
    }
}

impl FromIterator<SharedMiddleware> for Chain {
    fn from_iter<I: IntoIterator<Item = SharedMiddleware>>(iter: I) -> Self {
        Self {
            middleware: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
