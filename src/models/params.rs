use std::str::FromStr;

use crate::error::{AppError, Result};

/// First non-blank value for `key` in raw query pairs.
pub(crate) fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_value<T: FromStr>(pairs: &[(String, String)], key: &str) -> Result<Option<T>> {
    first_value(pairs, key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid value for '{}': {}", key, raw)))
        })
        .transpose()
}
