//! # gimmisn-types
//!
//! Type definitions for reconciling OpenStreetMap house numbers against a
//! reference dataset.
//!
//! This crate provides the plain value types shared by the engine: a
//! normalized [`HouseNumber`], the numeric [`Range`]/[`Ranges`] filters that
//! describe which house numbers are plausible on a street, and the small
//! enumerations used in relation configuration.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use gimmisn_types::{HouseNumber, Interpolation, Range, Ranges};
//!
//! let ranges = Ranges::new(vec![Range::new(137, 165, Interpolation::Default)]);
//! assert!(ranges.contains(163));
//! assert!(!ranges.contains(164));
//! assert!(!ranges.contains(167));
//!
//! let number = HouseNumber::new("163", "163-167");
//! assert_eq!(number.number(), "163");
//! assert_eq!(number.source(), "163-167");
//! ```

#![warn(missing_docs)]

mod enums;
mod housenumber;
mod range;

// Re-export all public types at crate root
pub use enums::{Interpolation, MissingStreetsPolicy};
pub use housenumber::{sort_numerically, split_house_number, HouseNumber};
pub use range::{Range, Ranges};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        // Verify all types are accessible from crate root
        let _number = HouseNumber::new("1", "1");
        let _range = Range::new(1, 999, Interpolation::Default);
        let _ranges = Ranges::default();
        let _policy = MissingStreetsPolicy::Yes;
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let number = HouseNumber::new("36*", "36*");

        let json = serde_json::to_string(&number).unwrap();
        let parsed: HouseNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(number, parsed);
        assert_eq!(parsed.source(), "36*");
    }
}
