use crate::component::ComponentId;
use crate::config::Configuration;
use crate::config::error::ConfigError;
use crate::kernel::constants::OVERRIDE_IDENTITY_SEPARATOR;

/// Override-wins-if-non-empty merge.
pub struct ConfigOverlay;

impl ConfigOverlay {
    /// Layer `overrides` onto `base`.
    ///
    /// The keys of `base` are the recognized keys: for each of them a
    /// non-empty override value replaces the base value, anything else keeps
    /// it. Override keys absent from `base` are ignored. Pure; neither input
    /// is modified.
    pub fn resolve(base: &Configuration, overrides: &Configuration) -> Configuration {
        base.iter()
            .map(|(key, value)| {
                let winner = match overrides.get(key) {
                    Some(candidate) if !candidate.is_empty() => candidate,
                    _ => value,
                };
                (key.clone(), winner.clone())
            })
            .collect()
    }

    /// Override keys that `resolve` would ignore against `base`.
    pub fn unrecognized<'a>(base: &Configuration, overrides: &'a Configuration) -> Vec<&'a str> {
        overrides
            .keys()
            .filter(|key| !base.contains_key(*key))
            .map(String::as_str)
            .collect()
    }
}

/// Parse one command-line override of the form `IDENTITY:key=value`. The
/// identity is normalized the way [`ComponentId`]'s `FromStr` does it; the
/// value may be empty (and then loses against the base value).
pub fn parse_override(raw: &str) -> Result<(ComponentId, String, String), ConfigError> {
    let invalid = || ConfigError::InvalidOverride(raw.to_string());

    let (identity, assignment) = raw.split_once(OVERRIDE_IDENTITY_SEPARATOR).ok_or_else(invalid)?;
    let (key, value) = assignment.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if identity.trim().is_empty() || key.is_empty() {
        return Err(invalid());
    }

    let identity = identity.parse::<ComponentId>().map_err(|_| invalid())?;
    Ok((identity, key.to_string(), value.trim().to_string()))
}
