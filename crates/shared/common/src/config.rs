//! Shared configuration helpers.
//!
//! Credential settings travel as a `Properties` bag with dotted keys. In a
//! deployment they come from environment variables, where each dotted key is
//! spelled in upper snake case (`password.length.min` -> `PASSWORD_LENGTH_MIN`),
//! optionally behind a service prefix.

use std::env;

use domain::{Properties, CONFIGURATION_KEYS};

/// Environment variable name for a dotted property key.
pub fn env_var_name(prefix: Option<&str>, key: &str) -> String {
    let name = key.replace('.', "_").to_ascii_uppercase();
    match prefix {
        Some(prefix) => format!("{}_{}", prefix, name),
        None => name,
    }
}

/// Build credential properties from the environment.
///
/// Loads `.env` first. A prefixed variable wins over the bare one; keys with
/// neither are left out so validation can report them.
pub fn properties_from_env(prefix: Option<&str>) -> Properties {
    dotenvy::dotenv().ok();
    properties_from_lookup(prefix, |name| env::var(name).ok())
}

/// Build credential properties from an arbitrary variable lookup.
pub fn properties_from_lookup<F>(prefix: Option<&str>, lookup: F) -> Properties
where
    F: Fn(&str) -> Option<String>,
{
    CONFIGURATION_KEYS
        .iter()
        .filter_map(|key| {
            let prefixed = prefix.and_then(|p| lookup(&env_var_name(Some(p), key)));
            prefixed
                .or_else(|| lookup(&env_var_name(None, key)))
                .map(|value| (*key, value))
        })
        .collect()
}
