//! Stable ordering of Overpass extracts.
//!
//! Extracts are stored sorted so that re-fetching unchanged data rewrites
//! byte-identical files. The header row stays first; a trailing newline is
//! preserved.

use gimmisn_types::split_house_number;

fn nth<'a>(fields: &[&'a str], n: usize) -> &'a str {
    fields.get(n).copied().unwrap_or("")
}

/// Sort key of a street row: `@id, name, highway, service`.
///
/// Unnamed rows go last, then rows order by name, highway type, service
/// type and finally numeric id.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct StreetKey<'a> {
    missing_name: bool,
    name: &'a str,
    highway: &'a str,
    service: &'a str,
    id: (u64, &'a str),
}

impl<'a> StreetKey<'a> {
    fn new(line: &'a str) -> Self {
        let fields: Vec<&str> = line.split('\t').collect();
        let name = nth(&fields, 1);
        Self {
            missing_name: name.is_empty(),
            name,
            highway: nth(&fields, 2),
            service: nth(&fields, 3),
            id: split_house_number(nth(&fields, 0)),
        }
    }
}

/// Sort key of a house number row: `@id, addr:street, addr:housenumber,
/// addr:postcode, addr:housename, addr:conscriptionnumber, ...`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HouseNumberKey<'a> {
    postcode: &'a str,
    have_houseid: bool,
    have_housenumber: bool,
    street: &'a str,
    housenumber: (u64, &'a str),
    housename: &'a str,
    conscriptionnumber: (u64, &'a str),
    tail: Vec<&'a str>,
    id: (u64, &'a str),
}

impl<'a> HouseNumberKey<'a> {
    fn new(line: &'a str) -> Self {
        let fields: Vec<&str> = line.split('\t').collect();
        let housenumber = nth(&fields, 2);
        let housename = nth(&fields, 4);
        let conscriptionnumber = nth(&fields, 5);
        let have_housenumber = !housenumber.is_empty();
        Self {
            postcode: nth(&fields, 3),
            have_houseid: have_housenumber
                || !housename.is_empty()
                || !conscriptionnumber.is_empty(),
            have_housenumber,
            street: nth(&fields, 1),
            housenumber: split_house_number(housenumber),
            housename,
            conscriptionnumber: split_house_number(conscriptionnumber),
            tail: fields.get(6..).map(<[&str]>::to_vec).unwrap_or_default(),
            id: split_house_number(nth(&fields, 0)),
        }
    }
}

/// Sorts the body rows of a street extract.
pub fn sort_streets<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut sorted = lines.to_vec();
    sorted.sort_by_cached_key(|line| StreetKey::new(*line));
    sorted
}

/// Sorts the body rows of a house number extract.
pub fn sort_housenumbers<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut sorted = lines.to_vec();
    sorted.sort_by_cached_key(|line| HouseNumberKey::new(*line));
    sorted
}

/// Sorts a whole street extract, header kept first.
pub fn sort_streets_csv(data: &str) -> String {
    process_csv_body(sort_streets, data)
}

/// Sorts a whole house number extract, header kept first.
pub fn sort_housenumbers_csv(data: &str) -> String {
    process_csv_body(sort_housenumbers, data)
}

fn process_csv_body<F>(sort: F, data: &str) -> String
where
    F: for<'a> Fn(&[&'a str]) -> Vec<&'a str>,
{
    if data.is_empty() {
        return String::new();
    }

    let (content, trailer) = match data.strip_suffix('\n') {
        Some(content) => (content, "\n"),
        None => (data, ""),
    };
    let mut lines = content.split('\n');
    let header = lines.next().unwrap_or("");
    let body: Vec<&str> = lines.collect();

    let mut result = vec![header];
    result.extend(sort(&body));
    result.join("\n") + trailer
}
