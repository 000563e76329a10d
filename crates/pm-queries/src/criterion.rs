//! Categorical selector

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keyword that selects every value
pub const ALL: &str = "all";

/// Either no restriction or equality with one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Criterion<T = String> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Criterion<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Criterion::All => true,
            Criterion::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Criterion::All)
    }
}

impl<T> Criterion<T> {
    pub fn only(value: impl Into<T>) -> Self {
        Criterion::Only(value.into())
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Criterion::All => None,
            Criterion::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Criterion<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Criterion::All, Criterion::Only)
    }
}

/// `"all"` (any case) parses to `All`, anything else goes through `T::from_str`
impl<T: FromStr> FromStr for Criterion<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL) {
            Ok(Criterion::All)
        } else {
            s.parse().map(Criterion::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::All => f.write_str(ALL),
            Criterion::Only(value) => value.fmt(f),
        }
    }
}
