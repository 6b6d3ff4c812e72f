//! Validation and resolution of a structural match
//!
//! Turns the raw [`ParseResult`] of a matched route into a
//! [`CommandContext`], checking argument arity, option occurrences and
//! option parameters, and running every declared resolver. Any resolver
//! failure becomes a validation error.

use crate::context::{CommandContext, OptionValues};
use crate::matcher::ParseResult;
use crate::resolver::Resolver;
use crate::route::{RouteDefinition, RouteOption};
use crate::{CliError, CliResult};
use serde_json::Value;
use std::collections::HashMap;

/// Validate `parsed` against `route` and build the execution context.
pub fn validate(route: &RouteDefinition, parsed: ParseResult) -> CliResult<CommandContext> {
    let arguments = resolve_arguments(route, &parsed.arguments)?;

    for raw in &parsed.options {
        if route.find_option(&raw.name).is_none() {
            return Err(CliError::unknown_option(&crate::route::display_option_name(
                &raw.name,
            )));
        }
    }

    let mut options = HashMap::with_capacity(route.options().len());
    for option in route.options() {
        let instances = match parsed.option(&option.name) {
            Some(raw) => resolve_option(option, &raw.instances)?,
            None if option.required => {
                return Err(CliError::missing_option(&option.display_name()));
            }
            None => Vec::new(),
        };
        options.insert(option.name.to_lowercase(), instances);
    }

    Ok(CommandContext::new(arguments, parsed.parameters, options))
}

fn resolve_arguments(route: &RouteDefinition, raw: &[String]) -> CliResult<HashMap<String, Value>> {
    let declared = route.arguments();

    if raw.len() < route.min_arguments() {
        // Required arguments precede optional ones, so the next declared
        // argument is the first missing one.
        let missing = &declared[raw.len()];
        return Err(CliError::missing_argument(&missing.name));
    }
    if let Some(max) = route.max_arguments() {
        if raw.len() > max {
            return Err(CliError::unexpected_argument(&raw[max]));
        }
    }

    let mut resolved: HashMap<String, Value> = HashMap::with_capacity(declared.len());
    for argument in declared {
        let initial = if argument.vararg {
            Value::Array(Vec::new())
        } else {
            Value::Null
        };
        resolved.insert(argument.name.clone(), initial);
    }

    for (index, token) in raw.iter().enumerate() {
        let Some(argument) = declared.get(index.min(declared.len().saturating_sub(1))) else {
            return Err(CliError::unexpected_argument(token));
        };
        let value = apply(argument.resolver.as_ref(), token).map_err(|_| {
            CliError::invalid_value(format!(
                "Invalid argument value for argument '{}': {}",
                argument.name, token
            ))
            .with_details(serde_json::json!({ "argument": argument.name, "value": token }))
        })?;
        if argument.vararg {
            if let Some(Value::Array(values)) = resolved.get_mut(&argument.name) {
                values.push(value);
            }
        } else {
            resolved.insert(argument.name.clone(), value);
        }
    }

    Ok(resolved)
}

fn resolve_option(option: &RouteOption, instances: &[Vec<String>]) -> CliResult<Vec<OptionValues>> {
    let display = option.display_name();
    if instances.len() > 1 && !option.repeatable {
        return Err(CliError::repeated_option(&display));
    }

    let mut resolved = Vec::with_capacity(instances.len());
    for instance in instances {
        let declared = &option.parameters;
        if instance.len() > declared.len() {
            let message = if declared.is_empty() {
                format!(
                    "The option '{}' does not allow any parameters, given '{}'",
                    display, instance[0]
                )
            } else {
                format!(
                    "The option '{}' takes {} parameters, given {}",
                    display,
                    declared.len(),
                    instance.len()
                )
            };
            return Err(CliError::option_parameters(message));
        }
        if instance.len() < declared.len() {
            let missing = &declared[instance.len()];
            return Err(CliError::option_parameters(format!(
                "Option '{}' is missing the required parameter #{} ('{}')",
                display,
                instance.len(),
                missing.name
            )));
        }

        let mut values = HashMap::with_capacity(declared.len());
        for (index, (parameter, raw)) in declared.iter().zip(instance).enumerate() {
            let value = apply(parameter.resolver.as_ref(), raw).map_err(|_| {
                CliError::invalid_value(format!(
                    "Parameter #{} ('{}') of option '{}' has invalid value: {}",
                    index, parameter.name, display, raw
                ))
            })?;
            values.insert(parameter.name.clone(), value);
        }
        resolved.push(OptionValues::new(values));
    }
    Ok(resolved)
}

/// Unresolved values are kept as strings.
fn apply(resolver: Option<&Resolver>, raw: &str) -> Result<Value, String> {
    match resolver {
        Some(resolver) => resolver.resolve(raw),
        None => Ok(Value::String(raw.to_string())),
    }
}
