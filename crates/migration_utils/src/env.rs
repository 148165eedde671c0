use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;

/// Read `key` from the environment, falling back to `default_value` when unset.
pub fn get_env(key: &str, default_value: Option<&str>) -> anyhow::Result<String> {
    match (std::env::var(key), default_value) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(value)) => Ok(value.to_string()),
        (Err(_), None) => Err(anyhow!("expect env {}", key)),
    }
}

pub fn get_env_parsed<T>(key: &str, default_value: Option<&str>) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let value = get_env(key, default_value)?;
    value
        .trim()
        .parse::<T>()
        .map_err(|err| anyhow!("env {} invalid {:?}: {}", key, value, err))
}

pub fn get_env_bool(key: &str) -> anyhow::Result<bool> {
    let value = get_env(key, Some("false"))?;
    match value.to_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" | "" => Ok(false),
        other => Err(anyhow!("invalid bool value {} for {}", other, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_without_default_is_an_error() {
        let err = get_env("MIGRATION_UTILS_TEST_UNSET_KEY", None).unwrap_err();
        assert_eq!(err.to_string(), "expect env MIGRATION_UTILS_TEST_UNSET_KEY");
    }

    #[test]
    fn missing_env_uses_default() {
        let value: usize = get_env_parsed("MIGRATION_UTILS_TEST_UNSET_SIZE", Some("250")).unwrap();
        assert_eq!(value, 250);
        assert!(!get_env_bool("MIGRATION_UTILS_TEST_UNSET_BOOL").unwrap());
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = get_env_parsed::<u32>("MIGRATION_UTILS_TEST_UNSET_NUM", Some("abc")).unwrap_err();
        assert!(err.to_string().contains("MIGRATION_UTILS_TEST_UNSET_NUM"));
    }
}
