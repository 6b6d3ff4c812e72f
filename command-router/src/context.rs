//! Execution context for one command invocation
//!
//! A [`CommandContext`] is created by the validator once a route matched and
//! validated, handed to every middleware and the handler, and dropped when
//! the pipeline returns. Values are stored as resolved JSON and converted to
//! the caller's type on access.

use crate::invocation::InvocationId;
use crate::io::{Input, Output};
use crate::middleware::Flow;
use crate::provider::Providers;
use crate::{CliError, CliResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolved parameters of one option occurrence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionValues {
    values: HashMap<String, Value>,
}

impl OptionValues {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Get a parameter converted to `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> CliResult<T> {
        let raw = self.raw(name)?;
        convert(raw, "option parameter", name)
    }

    /// Get a parameter as stored.
    pub fn raw(&self, name: &str) -> CliResult<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| CliError::unknown_name("option parameter", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
}

/// Context wrapper providing typed access to one validated invocation.
pub struct CommandContext {
    arguments: HashMap<String, Value>,
    parameters: HashMap<String, Value>,
    options: HashMap<String, Vec<OptionValues>>,
    attributes: HashMap<String, Box<dyn Any>>,
    input: Option<Box<dyn Input>>,
    output: Option<Box<dyn Output>>,
    providers: Providers,
    invocation_id: InvocationId,
}

impl CommandContext {
    /// Create a context from resolved values.
    ///
    /// Option keys are matched case-insensitively.
    pub fn new(
        arguments: HashMap<String, Value>,
        parameters: HashMap<String, Value>,
        options: HashMap<String, Vec<OptionValues>>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect();
        Self {
            arguments,
            parameters,
            options,
            attributes: HashMap::new(),
            input: None,
            output: None,
            providers: Providers::new(),
            invocation_id: InvocationId::new(),
        }
    }

    // Arguments

    /// Get an argument converted to `T`.
    ///
    /// Optional arguments that were not supplied hold `null`, so they can be
    /// read as `Option<T>`.
    pub fn arg<T: DeserializeOwned>(&self, name: &str) -> CliResult<T> {
        convert(self.raw_arg(name)?, "argument", name)
    }

    /// Get a vararg argument converted to a list of `T`.
    pub fn var_arg<T: DeserializeOwned>(&self, name: &str) -> CliResult<Vec<T>> {
        match self.raw_arg(name)? {
            value @ Value::Array(_) => convert(value, "vararg", name),
            _ => Err(CliError::unknown_name("vararg", name)),
        }
    }

    /// Returns true if the argument was supplied.
    pub fn has_arg(&self, name: &str) -> bool {
        self.arguments.get(name).is_some_and(|v| !v.is_null())
    }

    /// Get an argument as stored.
    pub fn raw_arg(&self, name: &str) -> CliResult<&Value> {
        self.arguments
            .get(name)
            .ok_or_else(|| CliError::unknown_name("argument", name))
    }

    // Segment parameters

    /// Get a dynamic segment value converted to `T`.
    pub fn param<T: DeserializeOwned>(&self, name: &str) -> CliResult<T> {
        convert(self.raw_param(name)?, "parameter", name)
    }

    /// Get a dynamic segment value as stored.
    pub fn raw_param(&self, name: &str) -> CliResult<&Value> {
        self.parameters
            .get(name)
            .ok_or_else(|| CliError::unknown_name("parameter", name))
    }

    // Options

    /// Returns true if the option was supplied at least once. Undeclared
    /// names are never present.
    pub fn has_option(&self, name: &str) -> bool {
        self.option_count(name).is_ok_and(|count| count > 0)
    }

    /// Number of times the option was supplied.
    pub fn option_count(&self, name: &str) -> CliResult<usize> {
        self.options(name).map(|instances| instances.len())
    }

    /// Every occurrence of the option, in supplied order.
    pub fn options(&self, name: &str) -> CliResult<&[OptionValues]> {
        self.options
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| CliError::unknown_name("option", name))
    }

    /// First occurrence of the option.
    pub fn option(&self, name: &str) -> CliResult<&OptionValues> {
        self.option_at(name, 0)
    }

    /// Occurrence `index` of the option.
    pub fn option_at(&self, name: &str, index: usize) -> CliResult<&OptionValues> {
        let instances = self.options(name)?;
        instances.get(index).ok_or_else(|| {
            CliError::unknown_name("option", name).with_details(serde_json::json!({
                "occurrences": instances.len(),
                "requested": index,
            }))
        })
    }

    /// A parameter of the first occurrence of the option, converted to `T`.
    pub fn option_value<T: DeserializeOwned>(&self, name: &str, param: &str) -> CliResult<T> {
        self.option(name)?.get(param)
    }

    // Attributes

    /// Store a value for later steps of the pipeline.
    pub fn set_attr<T: Any>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.attributes.insert(key.into(), Box::new(value));
        self
    }

    /// Get a stored value, if present and of type `T`.
    pub fn attr<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref::<T>()
    }

    pub fn attr_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.attributes.get_mut(key)?.downcast_mut::<T>()
    }

    /// Remove a stored value, returning it if it was of type `T`.
    pub fn remove_attr<T: Any>(&mut self, key: &str) -> Option<T> {
        let value = self.attributes.remove(key)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    // Providers

    /// Ask the provider chain for a shared `T`.
    pub fn provide<T: Any + Send + Sync>(&self) -> CliResult<Arc<T>> {
        self.providers
            .resolve::<T>()
            .ok_or_else(|| CliError::unknown_name("provided type", std::any::type_name::<T>()))
    }

    /// Replace the provider chain.
    pub fn bind_providers(&mut self, providers: Providers) {
        self.providers = providers;
    }

    // Input and output

    pub fn bind_input(&mut self, input: Box<dyn Input>) {
        self.input = Some(input);
    }

    pub fn bind_output(&mut self, output: Box<dyn Output>) {
        self.output = Some(output);
    }

    pub fn input(&mut self) -> Option<&mut (dyn Input + 'static)> {
        self.input.as_deref_mut()
    }

    pub fn output(&mut self) -> Option<&mut (dyn Output + 'static)> {
        self.output.as_deref_mut()
    }

    /// Read one line from the bound input; `None` at end of input or when
    /// no input is bound.
    pub fn read_line(&mut self) -> CliResult<Option<String>> {
        match self.input.as_deref_mut() {
            Some(input) => Ok(input.read_line()?),
            None => Ok(None),
        }
    }

    pub fn print(&mut self, message: &str) {
        if let Some(output) = self.output.as_deref_mut() {
            output.print(message);
        }
    }

    pub fn warn(&mut self, message: &str) {
        if let Some(output) = self.output.as_deref_mut() {
            output.warn(message);
        }
    }

    pub fn error(&mut self, message: &str) {
        if let Some(output) = self.output.as_deref_mut() {
            output.error(message);
        }
    }

    /// Stop the pipeline successfully.
    pub fn done(&self) -> Flow {
        Flow::Stop(true)
    }

    /// Print an error and stop the pipeline unsuccessfully.
    pub fn fail(&mut self, message: &str) -> Flow {
        self.error(message);
        Flow::Stop(false)
    }

    pub fn invocation_id(&self) -> InvocationId {
        self.invocation_id
    }

    pub fn set_invocation_id(&mut self, id: InvocationId) {
        self.invocation_id = id;
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("invocation_id", &self.invocation_id)
            .field("arguments", &self.arguments)
            .field("parameters", &self.parameters)
            .field("options", &self.options)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn convert<T: DeserializeOwned>(value: &Value, kind: &str, name: &str) -> CliResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| {
        CliError::serialization(format!("Can not read {} '{}': {}", kind, name, e))
    })
}
