//! Overpass extract records.
//!
//! Parses the tab-separated street and house number extracts stored per
//! relation in the workdir.

use csv::StringRecord;

use crate::parser::{parse, TsvRecord};
use crate::types::GimmisnResult;

/// Expected columns in a street extract.
const STREET_COLUMNS: &[&str] = &["@id", "name"];

/// Expected columns in a house number extract.
const HOUSENUMBER_COLUMNS: &[&str] = &["@id", "addr:street", "addr:housenumber"];

/// A named street from the OSM street extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmStreet {
    /// OSM way id.
    pub id: u64,
    /// Value of the `name` tag.
    pub name: String,
}

impl TsvRecord for OsmStreet {
    const EXPECTED_COLUMNS: &'static [&'static str] = STREET_COLUMNS;

    fn from_record(record: &StringRecord) -> GimmisnResult<Self> {
        Ok(OsmStreet {
            id: parse::osm_id(record.get(0).unwrap_or(""))?,
            name: parse::text(record.get(1)),
        })
    }

    fn passes_filter(&self) -> bool {
        !self.name.is_empty()
    }
}

/// An address from the OSM house number extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmHouseNumber {
    /// OSM object id.
    pub id: u64,
    /// Value of the `addr:street` tag.
    pub street: String,
    /// Raw value of the `addr:housenumber` tag.
    pub housenumber: String,
}

impl TsvRecord for OsmHouseNumber {
    const EXPECTED_COLUMNS: &'static [&'static str] = HOUSENUMBER_COLUMNS;

    fn from_record(record: &StringRecord) -> GimmisnResult<Self> {
        Ok(OsmHouseNumber {
            id: parse::osm_id(record.get(0).unwrap_or(""))?,
            street: parse::text(record.get(1)),
            housenumber: parse::text(record.get(2)),
        })
    }

    fn passes_filter(&self) -> bool {
        !self.street.is_empty() && !self.housenumber.is_empty()
    }
}
