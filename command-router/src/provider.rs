//! Provider chain
//!
//! Handlers ask the context for shared services by type instead of having
//! them injected. Each provider is tried in registration order; the first
//! one that returns a value of the requested type wins.
//!
//! # Example
//! ```rust,ignore
//! let providers = Providers::new().value(AppContext::new());
//!
//! fn list(ctx: &mut CommandContext) -> CliResult<Flow> {
//!     let app = ctx.provide::<AppContext>()?;
//!     // ...
//! }
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

/// A shared, type-erased value.
pub type Provided = Arc<dyn Any + Send + Sync>;

type ProviderFn = Arc<dyn Fn(TypeId) -> Option<Provided> + Send + Sync>;

/// Ordered list of providers.
#[derive(Clone, Default)]
pub struct Providers {
    chain: Vec<ProviderFn>,
}

impl Providers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance returned for requests of type `T`.
    pub fn value<T: Any + Send + Sync>(self, value: T) -> Self {
        let shared: Provided = Arc::new(value);
        self.with(move |requested| (requested == TypeId::of::<T>()).then(|| shared.clone()))
    }

    /// Register a custom provider.
    pub fn with<F>(mut self, provider: F) -> Self
    where
        F: Fn(TypeId) -> Option<Provided> + Send + Sync + 'static,
    {
        self.chain.push(Arc::new(provider));
        self
    }

    /// Append every provider of `other` after this chain's own.
    pub fn extend(&mut self, other: &Providers) {
        self.chain.extend(other.chain.iter().cloned());
    }

    /// Ask each provider in turn for a `T`.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let requested = TypeId::of::<T>();
        self.chain
            .iter()
            .filter_map(|provider| provider(requested))
            .find_map(|value| value.downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
