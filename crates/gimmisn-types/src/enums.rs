//! Enumeration types used in relation configuration.
//!
//! This module provides enum representations for the coded values that
//! appear in relation documents, such as a street's interpolation mode or
//! the relation's missing-streets policy.

use std::fmt;
use std::str::FromStr;

/// Interpolation policy of a street range.
///
/// Indicates whether only the numbers sharing the parity of the range start
/// are valid (the usual even/odd street sides) or every integer in bounds.
///
/// # Examples
///
/// ```
/// use gimmisn_types::Interpolation;
///
/// assert_eq!("all".parse::<Interpolation>(), Ok(Interpolation::All));
/// assert_eq!(Interpolation::default(), Interpolation::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interpolation {
    /// Only numbers with the parity of the range start are valid.
    #[default]
    Default,
    /// Every integer between start and end is valid.
    All,
}

impl Interpolation {
    /// Returns true if the street side is not even/odd segregated.
    pub fn is_all(self) -> bool {
        self == Self::All
    }

    /// Returns the configuration keyword for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::All => "all",
        }
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Default),
            "all" => Ok(Self::All),
            other => Err(format!("unknown interpolation: {other}")),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state policy deciding which reports a relation takes part in.
///
/// # Examples
///
/// ```
/// use gimmisn_types::MissingStreetsPolicy;
///
/// let policy: MissingStreetsPolicy = "only".parse().unwrap();
/// assert!(policy.checks_streets());
/// assert!(!policy.checks_housenumbers());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MissingStreetsPolicy {
    /// Check both streets and house numbers.
    #[default]
    Yes,
    /// Check house numbers only.
    No,
    /// Check streets only.
    Only,
}

impl MissingStreetsPolicy {
    /// Returns true if the street-level report applies.
    pub fn checks_streets(self) -> bool {
        matches!(self, Self::Yes | Self::Only)
    }

    /// Returns true if the house-number-level report applies.
    pub fn checks_housenumbers(self) -> bool {
        matches!(self, Self::Yes | Self::No)
    }

    /// Returns the configuration keyword for this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Only => "only",
        }
    }
}

impl FromStr for MissingStreetsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "only" => Ok(Self::Only),
            other => Err(format!("unknown missing-streets policy: {other}")),
        }
    }
}

impl fmt::Display for MissingStreetsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
