//! Named value resolvers
//!
//! A resolver turns one raw argv token into a [`Value`], or rejects it.
//! Resolvers are referenced by name from declarations (`{id:int}`,
//! `<count:uint>`, `{value:float}`) and looked up in a [`Resolvers`]
//! registry that is passed explicitly to the grammar compiler.

use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;

/// Name of the identity resolver used when a dynamic segment names none.
pub const IDENTITY: &str = "string";

type ResolveFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// A named, cloneable resolver function.
#[derive(Clone)]
pub struct Resolver {
    name: String,
    func: ResolveFn,
}

impl Resolver {
    /// Create a resolver from a closure.
    ///
    /// # Example
    /// ```rust,ignore
    /// let port = Resolver::new("port", |raw| {
    ///     raw.parse::<u16>().map(Value::from).map_err(|e| e.to_string())
    /// });
    /// ```
    pub fn new<F, E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            name: name.into(),
            func: Arc::new(move |raw: &str| f(raw).map_err(|e| e.to_string())),
        }
    }

    /// Create a resolver that parses the raw token with [`FromStr`].
    pub fn parse<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Serialize + 'static,
        T::Err: fmt::Display,
    {
        Self::new(name, |raw: &str| -> Result<Value, String> {
            let parsed = raw.parse::<T>().map_err(|e| e.to_string())?;
            serde_json::to_value(parsed).map_err(|e| e.to_string())
        })
    }

    /// The identity resolver.
    pub fn identity() -> Self {
        Self::new(IDENTITY, |raw: &str| Ok::<_, String>(Value::String(raw.to_string())))
    }

    /// The name this resolver was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the resolver to a raw token.
    ///
    /// A `null` result or a panic counts as a rejection, the same as an
    /// error.
    pub fn resolve(&self, raw: &str) -> Result<Value, String> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.func)(raw))) {
            Ok(Ok(Value::Null)) => Err(format!("resolver '{}' produced no value", self.name)),
            Ok(other) => other,
            Err(payload) => Err(format!(
                "resolver '{}' panicked: {}",
                self.name,
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolver").field(&self.name).finish()
    }
}

// Resolvers are compared by name; two routes compiled against the same
// registry are structurally equal.
impl PartialEq for Resolver {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Resolver {}

/// Registry of named resolvers.
///
/// [`Resolvers::default()`] registers `string`, `int`, `uint`, `float` and `bool`.
#[derive(Clone, Debug)]
pub struct Resolvers {
    entries: HashMap<String, Resolver>,
}

impl Default for Resolvers {
    fn default() -> Self {
        Self::empty()
            .with(Resolver::parse::<i64>("int"))
            .with(Resolver::parse::<u64>("uint"))
            .with(Resolver::parse::<f64>("float"))
            .with(Resolver::parse::<bool>("bool"))
    }
}

impl Resolvers {
    /// A registry holding only the identity resolver.
    pub fn empty() -> Self {
        let mut entries = HashMap::new();
        entries.insert(IDENTITY.to_string(), Resolver::identity());
        Self { entries }
    }

    /// Register a resolver, replacing any previous one with the same name.
    pub fn with(mut self, resolver: Resolver) -> Self {
        self.insert(resolver);
        self
    }

    /// Register a resolver in place.
    pub fn insert(&mut self, resolver: Resolver) {
        self.entries.insert(resolver.name.clone(), resolver);
    }

    /// Look up a resolver by name.
    pub fn get(&self, name: &str) -> Option<&Resolver> {
        self.entries.get(name)
    }

    /// Check if a resolver is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered resolver names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}
