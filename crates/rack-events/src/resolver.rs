//! Processor resolution.
//!
//! A [`Resolver`] picks the processor for a raw payload. Use a
//! [`StaticResolver`] when the event source is fixed at deploy time and a
//! [`ConditionalResolver`] when one function sits behind several sources.

use crate::processor::{EventFormat, SharedProcessor};
use crate::EventError;
use std::sync::Arc;

/// Selects a processor for a raw payload.
pub trait Resolver: Send + Sync + 'static {
    /// Returns the processor for `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnsupportedEventType`] when nothing claims it.
    fn resolve(&self, payload: &[u8]) -> Result<SharedProcessor, EventError>;
}

/// A shared resolver handle.
pub type SharedResolver = Arc<dyn Resolver>;

/// Always returns the same processor without inspecting the payload.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    processor: SharedProcessor,
}

impl StaticResolver {
    /// Creates a resolver that always returns `processor`.
    #[must_use]
    pub fn new(processor: SharedProcessor) -> Self {
        Self { processor }
    }
}

impl From<EventFormat> for StaticResolver {
    fn from(format: EventFormat) -> Self {
        Self::new(format.processor())
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, _payload: &[u8]) -> Result<SharedProcessor, EventError> {
        Ok(Arc::clone(&self.processor))
    }
}

/// Returns the first processor, in order, whose `can_process` is true.
#[derive(Debug, Clone)]
pub struct ConditionalResolver {
    processors: Vec<SharedProcessor>,
}

impl ConditionalResolver {
    /// Creates a resolver over `processors`, tried in the given order.
    #[must_use]
    pub fn new(processors: Vec<SharedProcessor>) -> Self {
        Self { processors }
    }

    /// Appends a processor after the existing ones.
    #[must_use]
    pub fn with_processor(mut self, processor: SharedProcessor) -> Self {
        self.processors.push(processor);
        self
    }

    /// Returns the processors in resolution order.
    #[must_use]
    pub fn processors(&self) -> &[SharedProcessor] {
        &self.processors
    }
}

impl Default for ConditionalResolver {
    /// The built-in processors in [`EventFormat::RESOLUTION_ORDER`].
    fn default() -> Self {
        Self::new(
            EventFormat::RESOLUTION_ORDER
                .into_iter()
                .map(EventFormat::processor)
                .collect(),
        )
    }
}

impl Resolver for ConditionalResolver {
    fn resolve(&self, payload: &[u8]) -> Result<SharedProcessor, EventError> {
        let processor = self
            .processors
            .iter()
            .find(|p| p.can_process(payload))
            .ok_or(EventError::UnsupportedEventType)?;

        tracing::debug!(format = processor.name(), "resolved event format");
        Ok(Arc::clone(processor))
    }
}

/// Returns the resolver used when none is configured: a
/// [`ConditionalResolver`] over the built-ins.
#[must_use]
pub fn default_resolver() -> SharedResolver {
    Arc::new(ConditionalResolver::default())
}
