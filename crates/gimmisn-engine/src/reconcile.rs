//! Set comparison of OSM data against the reference.
//!
//! Pure functions: every result keeps the order of its first argument.

use gimmisn_types::HouseNumber;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;

/// A street name with the house numbers found for it.
pub type StreetNumbers = (String, Vec<HouseNumber>);

/// Returns the items of `first` that are not in `second`.
pub fn get_only_in_first<T: PartialEq + Clone>(first: &[T], second: &[T]) -> Vec<T> {
    first
        .iter()
        .filter(|item| !second.contains(item))
        .cloned()
        .collect()
}

/// Returns the items of `first` that are also in `second`.
pub fn get_in_both<T: PartialEq + Clone>(first: &[T], second: &[T]) -> Vec<T> {
    first
        .iter()
        .filter(|item| second.contains(item))
        .cloned()
        .collect()
}

/// Compares reference street names with OSM ones (already mapped to
/// reference names).
///
/// Returns `(only_in_reference, in_both)`, both sorted; blacklisted streets
/// are never reported as only in the reference.
pub fn missing_streets(
    osm_streets: &[String],
    ref_streets: &[String],
    blacklist: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut only_in_reference: Vec<String> = get_only_in_first(ref_streets, osm_streets)
        .into_iter()
        .filter(|street| !blacklist.contains(street))
        .collect();
    let mut in_both = get_in_both(ref_streets, osm_streets);
    sort_street_names(&mut only_in_reference);
    sort_street_names(&mut in_both);
    (only_in_reference, in_both)
}

/// Sorts street names with Hungarian collation, so `Ábel utca` comes
/// before `Bem utca`.
///
/// Falls back to codepoint order if the collation data can't be loaded.
pub fn sort_street_names(streets: &mut [String]) {
    match Collator::try_new(&locale!("hu").into(), CollatorOptions::new()) {
        Ok(collator) => streets.sort_by(|a, b| collator.compare(a, b)),
        Err(err) => {
            tracing::warn!("Hungarian collation unavailable, using codepoint order: {err}");
            streets.sort();
        }
    }
}

/// Compares house numbers street by street.
///
/// `streets` yields `(street, reference numbers, OSM numbers)` in street
/// discovery order. Returns `(ongoing, done)`: the reference-only numbers of
/// streets that have any, ordered by their count descending, and the
/// matched numbers of streets that have any, in input order.
pub fn missing_housenumbers<I>(streets: I) -> (Vec<StreetNumbers>, Vec<StreetNumbers>)
where
    I: IntoIterator<Item = (String, Vec<HouseNumber>, Vec<HouseNumber>)>,
{
    let mut ongoing = Vec::new();
    let mut done = Vec::new();

    for (street, ref_numbers, osm_numbers) in streets {
        let only_in_reference = get_only_in_first(&ref_numbers, &osm_numbers);
        let in_both = get_in_both(&ref_numbers, &osm_numbers);
        if !only_in_reference.is_empty() {
            ongoing.push((street.clone(), only_in_reference));
        }
        if !in_both.is_empty() {
            done.push((street, in_both));
        }
    }

    // Longest to-do list first; sort_by is stable.
    ongoing.sort_by(|a: &StreetNumbers, b: &StreetNumbers| b.1.len().cmp(&a.1.len()));
    (ongoing, done)
}
