//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// SQL `LIKE` pattern matching the provided input as a substring.
///
/// `LIKE` metacharacters of the input are escaped, so they match literally.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new substring [`LikePattern`] out of the given `input`.
    #[must_use]
    pub fn contains(input: &str) -> Self {
        let escaped = input
            .replace('\\', r"\\")
            .replace('%', r"\%")
            .replace('_', r"\_");
        Self(format!("%{escaped}%"))
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(LikePattern::contains("casa").to_string(), "%casa%");
        assert_eq!(
            LikePattern::contains(r"100%_off\").to_string(),
            r"%100\%\_off\\%",
        );
    }
}
