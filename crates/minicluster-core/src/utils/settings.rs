use std::str::FromStr;

use crate::component::error::AdapterError;
use crate::config::Configuration;

/// Value under `key`, failing with `MissingConfig` when absent or empty.
pub fn required<'a>(config: &'a Configuration, key: &str) -> Result<&'a str, AdapterError> {
    match config.get(key).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AdapterError::MissingConfig(key.to_string())),
    }
}

/// Parse the value under `key`, e.g. a port or a broker id.
pub fn parse_required<T>(config: &Configuration, key: &str) -> Result<T, AdapterError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = required(config, key)?;
    value.parse().map_err(|e: T::Err| AdapterError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Like [`parse_required`], with a fallback when the key is absent or empty.
pub fn parse_or<T>(config: &Configuration, key: &str, default: T) -> Result<T, AdapterError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match required(config, key) {
        Ok(_) => parse_required(config, key),
        Err(_) => Ok(default),
    }
}
