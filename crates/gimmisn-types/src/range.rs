//! House number range filters.
//!
//! A [`Range`] is a closed numeric interval with an interpolation policy;
//! [`Ranges`] is the set of intervals configured for one street.

use crate::Interpolation;

/// A closed interval of plausible house numbers on one street.
///
/// With [`Interpolation::Default`] only numbers sharing the parity of
/// `start` are accepted, so `Range::new(137, 165, ..)` describes the odd side
/// of a street between 137 and 165.
///
/// # Examples
///
/// ```
/// use gimmisn_types::{Interpolation, Range};
///
/// let odd = Range::new(1, 15, Interpolation::Default);
/// assert!(odd.contains(7));
/// assert!(!odd.contains(8));
///
/// let all = Range::new(1, 12, Interpolation::All);
/// assert!(all.contains(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// First valid number.
    pub start: u32,
    /// Last valid number.
    pub end: u32,
    /// Whether parity is enforced.
    pub interpolation: Interpolation,
}

impl Range {
    /// Creates a new range.
    ///
    /// `start <= end` is not enforced; an inverted range accepts nothing.
    pub fn new(start: u32, end: u32, interpolation: Interpolation) -> Self {
        Self {
            start,
            end,
            interpolation,
        }
    }

    /// Returns true if `number` is inside the bounds and, unless the range is
    /// `interpolation=all`, has the parity of `start`.
    pub fn contains(&self, number: u32) -> bool {
        if !self.interpolation.is_all() && number % 2 != self.start % 2 {
            return false;
        }
        self.start <= number && number <= self.end
    }
}

/// The ranges configured for one street.
///
/// An empty set places no restriction on the street.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranges {
    items: Vec<Range>,
}

impl Ranges {
    /// Creates a range set from its members.
    pub fn new(items: Vec<Range>) -> Self {
        Self { items }
    }

    /// The sanity filter used for streets without configured ranges: odd
    /// numbers in `1..=999` and even numbers in `2..=998`.
    pub fn sanity() -> Self {
        Self::new(vec![
            Range::new(1, 999, Interpolation::Default),
            Range::new(2, 998, Interpolation::Default),
        ])
    }

    /// Returns true if any member accepts `number`, or if there are no members.
    pub fn contains(&self, number: u32) -> bool {
        if self.items.is_empty() {
            return true;
        }
        self.items.iter().any(|range| range.contains(number))
    }

    /// Returns the members of this set.
    pub fn items(&self) -> &[Range] {
        &self.items
    }

    /// Returns true if no ranges are configured.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_parity() {
        let range = Range::new(137, 165, Interpolation::Default);
        assert!(range.contains(137));
        assert!(range.contains(165));
        assert!(!range.contains(138));
        assert!(!range.contains(167));
        assert!(!range.contains(135));
    }

    #[test]
    fn test_range_interpolation_all() {
        let range = Range::new(1, 12, Interpolation::All);
        assert!(range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(12));
        assert!(!range.contains(13));
        assert!(!range.contains(0));
    }

    #[test]
    fn test_range_inverted_accepts_nothing() {
        let range = Range::new(10, 2, Interpolation::All);
        assert!(!range.contains(10));
        assert!(!range.contains(5));
    }

    #[test]
    fn test_ranges_union() {
        let ranges = Ranges::new(vec![
            Range::new(1, 15, Interpolation::Default),
            Range::new(2, 26, Interpolation::Default),
        ]);
        assert!(ranges.contains(15));
        assert!(ranges.contains(26));
        assert!(!ranges.contains(17));
        assert!(ranges.contains(18));
    }

    #[test]
    fn test_empty_ranges_accept_everything() {
        let ranges = Ranges::default();
        assert!(ranges.is_empty());
        assert!(ranges.contains(0));
        assert!(ranges.contains(100_000));
    }

    #[test]
    fn test_sanity_ranges() {
        let ranges = Ranges::sanity();
        assert!(!ranges.contains(0));
        assert!(ranges.contains(1));
        assert!(ranges.contains(998));
        assert!(ranges.contains(999));
        assert!(!ranges.contains(1000));
        assert!(!ranges.contains(2000));
    }
}
