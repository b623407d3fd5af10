//! Parsing of typed axis-limit input

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitParseError {
    #[error("invalid bound {0:?}")]
    InvalidBound(String),
}

/// Parse `"start:end"`, or a bare `"end"` meaning `0:end`
///
/// Returns `Ok(None)` for blank input. Bounds are returned in ascending
/// order.
pub fn parse_limit<T>(raw: &str) -> Result<Option<(T, T)>, LimitParseError>
where
    T: FromStr + PartialOrd + Default,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let (start, end) = match raw.split_once(':') {
        Some((start, end)) => (parse_bound(start)?, parse_bound(end)?),
        None => (T::default(), parse_bound(raw)?),
    };

    Ok(Some(if end < start { (end, start) } else { (start, end) }))
}

fn parse_bound<T: FromStr>(text: &str) -> Result<T, LimitParseError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| LimitParseError::InvalidBound(text.to_string()))
}
