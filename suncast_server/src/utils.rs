use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

pub fn default_server_binding_addr() -> String {
    "0.0.0.0:8080".to_string()
}

pub fn default_timeout_ms() -> u64 {
    5000
}

/// Substitute `${VAR}` references with values from the process environment.
pub fn substitute_env(raw: &str) -> Result<String, envsubst::Error> {
    // Values containing substitution delimiters are rejected by envsubst, so
    // they're left out of the variable set entirely.
    let variables: HashMap<String, String> = std::env::vars()
        .filter(|(key, value)| {
            !key.contains(['$', '{', '}']) && !value.contains(['$', '{', '}'])
        })
        .collect();
    envsubst::substitute(raw, &variables)
}

pub fn deserialize_with_envsubst<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw = String::deserialize(deserializer)?;
    substitute_env(&raw)
        .map(T::from)
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_map_with_envsubst<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    HashMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| {
            substitute_env(&value)
                .map(|value| (key, value))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
