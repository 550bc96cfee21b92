//! Completion statistics and report tables.
//!
//! Rendering a table is left to the caller; cells are plain strings, with
//! street names HTML-escaped and house number lists carrying `<br />` and
//! `<span>` markup.

use std::collections::BTreeSet;

use gimmisn_types::{split_house_number, HouseNumber};

use crate::i18n::Translations;
use crate::reconcile::StreetNumbers;

/// Header cells of the missing house numbers table, before translation.
pub const HOUSENUMBER_TABLE_HEADER: [&str; 3] = ["Street name", "Missing count", "House numbers"];

/// Summary of the house number comparison of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseNumberReport {
    /// Streets with at least one missing house number.
    pub todo_street_count: usize,
    /// Missing house numbers, counted as distinct raw ranges.
    pub todo_count: usize,
    /// Matched house numbers, counted as distinct raw ranges.
    pub done_count: usize,
    /// `done / (done + todo)` as a percentage with two decimals.
    pub percent: String,
    /// Header row followed by one row per street with missing numbers.
    pub table: Vec<Vec<String>>,
}

/// Summary of the street comparison of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetReport {
    /// Streets only in the reference.
    pub todo_count: usize,
    /// Streets in both datasets.
    pub done_count: usize,
    /// `done / (done + todo)` as a percentage with two decimals.
    pub percent: String,
    /// Names of the streets only in the reference.
    pub streets: Vec<String>,
}

/// Formats a completion percentage; no data at all counts as complete.
pub fn percent(done_count: usize, todo_count: usize) -> String {
    let total = done_count + todo_count;
    if total == 0 {
        return "100.00".to_string();
    }
    format!("{:.2}", done_count as f64 / total as f64 * 100.0)
}

/// Returns the distinct raw ranges the given house numbers came from,
/// ordered numerically.
pub fn get_housenumber_ranges(house_numbers: &[HouseNumber]) -> Vec<String> {
    let ranges: BTreeSet<&str> = house_numbers.iter().map(HouseNumber::source).collect();
    let mut ranges: Vec<String> = ranges.into_iter().map(str::to_string).collect();
    ranges.sort_by(|a, b| split_house_number(a).cmp(&split_house_number(b)));
    ranges
}

/// Escapes text for use inside an HTML element.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Highlights numbers known only to a supplementary reference source.
pub fn color_house_number(house_number: &str) -> String {
    match house_number.strip_suffix('*') {
        Some(number) => format!("<span style=\"color: blue;\">{}</span>", number),
        None => house_number.to_string(),
    }
}

/// Splits numbers into `(odd, even)` groups, each ordered numerically.
pub fn split_even_odd(house_numbers: &[String]) -> (Vec<String>, Vec<String>) {
    let mut sorted: Vec<&String> = house_numbers.iter().collect();
    sorted.sort_by(|a, b| split_house_number(a).cmp(&split_house_number(b)));

    let (even, odd): (Vec<&String>, Vec<&String>) = sorted
        .into_iter()
        .partition(|i| split_house_number(i).0 % 2 == 0);
    (
        odd.into_iter().cloned().collect(),
        even.into_iter().cloned().collect(),
    )
}

/// Formats numbers of an even/odd street: odd ones, a line break, even ones.
pub fn format_even_odd(house_numbers: &[String]) -> String {
    let (odd, even) = split_even_odd(house_numbers);
    let join = |group: Vec<String>| {
        group
            .iter()
            .map(|i| color_house_number(i))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut elements = Vec::new();
    if !odd.is_empty() {
        elements.push(join(odd));
    }
    if !even.is_empty() {
        elements.push(join(even));
    }
    elements.join("<br />")
}

fn format_all(house_numbers: &[String]) -> String {
    let mut sorted: Vec<&String> = house_numbers.iter().collect();
    sorted.sort_by(|a, b| split_house_number(a).cmp(&split_house_number(b)));
    sorted
        .into_iter()
        .map(|i| color_house_number(i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the house number report from reconciler output.
///
/// `street_is_even_odd` decides the layout of each street's number list.
pub fn housenumber_report<F>(
    ongoing: &[StreetNumbers],
    done: &[StreetNumbers],
    street_is_even_odd: F,
    translations: &Translations,
) -> HouseNumberReport
where
    F: Fn(&str) -> bool,
{
    let header = HOUSENUMBER_TABLE_HEADER
        .iter()
        .map(|cell| translations.translate(cell))
        .collect();
    let mut table = vec![header];

    let mut todo_count = 0;
    for (street, missing) in ongoing {
        let ranges = get_housenumber_ranges(missing);
        todo_count += ranges.len();
        let numbers = if street_is_even_odd(street) {
            format_even_odd(&ranges)
        } else {
            format_all(&ranges)
        };
        table.push(vec![html_escape(street), ranges.len().to_string(), numbers]);
    }

    let done_count = done
        .iter()
        .map(|(_, matched)| get_housenumber_ranges(matched).len())
        .sum();

    HouseNumberReport {
        todo_street_count: ongoing.len(),
        todo_count,
        done_count,
        percent: percent(done_count, todo_count),
        table,
    }
}

/// Builds the street report from reconciler output.
pub fn street_report(only_in_reference: Vec<String>, in_both: &[String]) -> StreetReport {
    let todo_count = only_in_reference.len();
    let done_count = in_both.len();
    StreetReport {
        todo_count,
        done_count,
        percent: percent(done_count, todo_count),
        streets: only_in_reference,
    }
}
