//! Normalized house number type.
//!
//! This module provides the [`HouseNumber`] struct, a canonical house number
//! together with the raw text it was derived from, plus helpers to order
//! house numbers numerically.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A normalized house number.
///
/// `number` is the canonical display form: decimal digits, optionally
/// followed by a `*` marker for numbers that only appear in a supplementary
/// reference source. `source` is the raw text the number was expanded from,
/// e.g. `"2-6"` for the `"4"` produced by interval expansion.
///
/// Equality, hashing and ordering only look at the numeric value: `number`
/// without its `*` marker. The same house number coming from different raw
/// ranges or reference sources is matched across datasets.
///
/// # Examples
///
/// ```
/// use gimmisn_types::HouseNumber;
///
/// let a = HouseNumber::new("4", "2-6");
/// let b = HouseNumber::new("4", "4");
/// assert_eq!(a, b);
/// assert_eq!(HouseNumber::new("4*", "4*"), b);
/// assert!(HouseNumber::new("10", "10") > HouseNumber::new("9", "9"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseNumber {
    number: String,
    source: String,
}

impl HouseNumber {
    /// Creates a house number from its canonical form and its raw source.
    pub fn new(number: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            source: source.into(),
        }
    }

    /// Returns the canonical house number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the raw text this number was derived from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Decides if `house_number` is listed in `invalids`.
    ///
    /// Besides an exact match, the number is also compared in its compact
    /// form: leading digits followed by the last letter in lowercase, so
    /// `15/A` is found as `15a`.
    pub fn is_invalid(house_number: &str, invalids: &[String]) -> bool {
        if invalids.iter().any(|i| i == house_number) {
            return true;
        }

        let digits: String = house_number
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let suffix = house_number
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .last()
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_default();
        let compact = digits + &suffix;
        invalids.iter().any(|i| *i == compact)
    }

    /// Returns the number without its supplementary source marker.
    pub fn value(&self) -> &str {
        self.number.strip_suffix('*').unwrap_or(&self.number)
    }

    fn sort_key(&self) -> (u64, &str) {
        split_house_number(self.value())
    }
}

impl PartialEq for HouseNumber {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for HouseNumber {}

impl Hash for HouseNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl PartialOrd for HouseNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HouseNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.value().cmp(other.value()))
    }
}

/// Splits a house number into its leading integer and the rest.
///
/// The integer is 0 when there are no leading digits (or they overflow).
///
/// # Examples
///
/// ```
/// use gimmisn_types::split_house_number;
///
/// assert_eq!(split_house_number("42"), (42, ""));
/// assert_eq!(split_house_number("36*"), (36, "*"));
/// assert_eq!(split_house_number("1000/11"), (1000, "/11"));
/// assert_eq!(split_house_number(""), (0, ""));
/// ```
pub fn split_house_number(house_number: &str) -> (u64, &str) {
    let digits_end = house_number
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(house_number.len());
    let (digits, rest) = house_number.split_at(digits_end);
    (digits.parse().unwrap_or(0), rest)
}

/// Sorts house numbers numerically, keeping the input order of equal keys.
pub fn sort_numerically<I>(house_numbers: I) -> Vec<HouseNumber>
where
    I: IntoIterator<Item = HouseNumber>,
{
    let mut ret: Vec<HouseNumber> = house_numbers.into_iter().collect();
    ret.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    ret
}
