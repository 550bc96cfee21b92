//! House number normalization.
//!
//! Turns a raw house number value, as found in OSM or in the reference, into
//! the individual house numbers it stands for, keeping only the ones that are
//! plausible on the street:
//!
//! - `;` separates independent values: `1;2` is `1` and `2`.
//! - `x-y` is an interval: `2-6` is `2`, `4` and `6` on an even/odd street,
//!   `2-5` is `2`, `3`, `4` and `5` on an `interpolation=all` street.
//!   Intervals that look like noise are not expanded, see [`plan_expansion`].
//!   Both ends must be plain numbers: `2a-6` is just `2`.
//! - A trailing `*` is kept on every number produced from the value.
//! - Values without leading digits produce nothing.
//!
//! Every produced number must pass the street's [`Ranges`]; streets without
//! configured ranges use [`Ranges::sanity`].

use std::collections::HashMap;

use gimmisn_types::{HouseNumber, Ranges};

/// Intervals whose end is above this are noise.
const MAX_INTERVAL_END: u32 = 1000;

/// Intervals spanning more than this are noise.
const MAX_INTERVAL_SPAN: u32 = 24;

/// How the two numbers of an `x-y` value are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Keep the numbers as individual literals.
    Literals,
    /// Keep only the first number; the second is a suffix, as in `42-1`.
    StartOnly,
    /// Expand the closed interval.
    Interval {
        /// First number.
        start: u32,
        /// Last number.
        end: u32,
    },
}

/// Decides how to interpret the numbers parsed from one value.
///
/// Only two-number values are intervals. A descending pair keeps its start
/// only. A parity mismatch on an even/odd street, a zero start, an end above
/// 1000 or a span above 24 keep both numbers as literals.
pub fn plan_expansion(numbers: &[u32], street_is_even_odd: bool) -> Expansion {
    let [start, end] = numbers else {
        return Expansion::Literals;
    };
    let (start, end) = (*start, *end);

    if end < start {
        return Expansion::StartOnly;
    }

    if street_is_even_odd && start % 2 != end % 2 {
        return Expansion::Literals;
    }

    if start == 0 {
        return Expansion::Literals;
    }

    if end > MAX_INTERVAL_END || end - start > MAX_INTERVAL_SPAN {
        return Expansion::Literals;
    }

    Expansion::Interval { start, end }
}

/// Normalizes a raw value against a street's ranges.
///
/// The result follows the order of the input; every item keeps the whole
/// raw value as its source.
pub fn normalize_with(raw: &str, ranges: &Ranges, street_is_even_odd: bool) -> Vec<HouseNumber> {
    raw.split(';')
        .flat_map(|token| normalize_token(token, raw, ranges, street_is_even_odd))
        .collect()
}

/// Normalizes a raw value on a street, looking up the street's ranges.
pub fn normalize(
    raw: &str,
    street: &str,
    street_ranges: &HashMap<String, Ranges>,
    street_is_even_odd: bool,
) -> Vec<HouseNumber> {
    match street_ranges.get(street) {
        Some(ranges) => normalize_with(raw, ranges, street_is_even_odd),
        None => normalize_with(raw, &Ranges::sanity(), street_is_even_odd),
    }
}

fn normalize_token(
    token: &str,
    source: &str,
    ranges: &Ranges,
    street_is_even_odd: bool,
) -> Vec<HouseNumber> {
    let (body, suffix) = match token.strip_suffix('*') {
        Some(body) => (body, "*"),
        None => (token, ""),
    };

    let parts: Vec<&str> = body.split('-').map(str::trim).collect();
    let parsed: Vec<u32> = if parts.len() > 1 && !parts.iter().all(|part| is_plain_number(part)) {
        parts.first().copied().and_then(leading_number).into_iter().collect()
    } else {
        parts.into_iter().filter_map(leading_number).collect()
    };

    let numbers: Vec<u32> = match plan_expansion(&parsed, street_is_even_odd) {
        Expansion::Literals => parsed,
        Expansion::StartOnly => vec![parsed[0]],
        Expansion::Interval { start, end } => {
            let step = if street_is_even_odd { 2 } else { 1 };
            (start..=end).step_by(step).collect()
        }
    };

    numbers
        .into_iter()
        .filter(|number| ranges.contains(*number))
        .map(|number| HouseNumber::new(format!("{number}{suffix}"), source))
        .collect()
}

fn is_plain_number(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the integer formed by the leading digits, if any.
fn leading_number(part: &str) -> Option<u32> {
    let part = part.trim_start();
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}
