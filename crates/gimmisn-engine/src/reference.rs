//! Reference registry caches.
//!
//! The reference house number registry is a large TSV with one row per
//! `(refmegye, reftelepules, street, housenumber)`; the street registry has
//! one row per `(refmegye, reftelepules, street)`. Both are indexed into
//! nested maps once and the result is stored as a JSON sidecar next to the
//! TSV, which is reused for as long as it is not older than the TSV.
//!
//! Lookups of unknown county or locality codes return empty slices.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::parser::{parse, TsvRecord};
#[cfg(feature = "parallel")]
use crate::parser::read_lines_skip_header;
#[cfg(not(feature = "parallel"))]
use crate::parser::TsvParser;
use crate::types::GimmisnResult;

/// Extension appended to a reference TSV path to name its cache.
const CACHE_EXTENSION: &str = "cache.json";

/// One row of the reference house number registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHouseNumberRow {
    /// County code.
    pub refmegye: String,
    /// Locality code within the county.
    pub reftelepules: String,
    /// Reference street name.
    pub street: String,
    /// Raw house number token.
    pub housenumber: String,
}

impl TsvRecord for ReferenceHouseNumberRow {
    // Registry exports name their columns inconsistently; only the order matters.
    const EXPECTED_COLUMNS: &'static [&'static str] = &[];

    fn from_record(record: &StringRecord) -> GimmisnResult<Self> {
        Ok(ReferenceHouseNumberRow {
            refmegye: parse::text(record.get(0)),
            reftelepules: parse::text(record.get(1)),
            street: parse::text(record.get(2)),
            housenumber: parse::text(record.get(3)),
        })
    }

    fn passes_filter(&self) -> bool {
        !self.street.is_empty() && !self.housenumber.is_empty()
    }
}

/// One row of the reference street registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStreetRow {
    /// County code.
    pub refmegye: String,
    /// Locality code within the county.
    pub reftelepules: String,
    /// Reference street name.
    pub street: String,
}

impl TsvRecord for ReferenceStreetRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[];

    fn from_record(record: &StringRecord) -> GimmisnResult<Self> {
        Ok(ReferenceStreetRow {
            refmegye: parse::text(record.get(0)),
            reftelepules: parse::text(record.get(1)),
            street: parse::text(record.get(2)),
        })
    }

    fn passes_filter(&self) -> bool {
        !self.street.is_empty()
    }
}

/// Reference house numbers indexed by county, locality and street.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseNumberReference {
    data: HashMap<String, HashMap<String, HashMap<String, Vec<String>>>>,
}

impl HouseNumberReference {
    /// Builds the index from rows, keeping file order per street.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ReferenceHouseNumberRow>,
    {
        let mut data: HashMap<String, HashMap<String, HashMap<String, Vec<String>>>> =
            HashMap::new();
        for row in rows {
            data.entry(row.refmegye)
                .or_default()
                .entry(row.reftelepules)
                .or_default()
                .entry(row.street)
                .or_default()
                .push(row.housenumber);
        }
        Self { data }
    }

    /// Returns the raw house numbers of a street, or an empty slice.
    pub fn housenumbers(&self, refmegye: &str, reftelepules: &str, street: &str) -> &[String] {
        self.data
            .get(refmegye)
            .and_then(|telepulesek| telepulesek.get(reftelepules))
            .and_then(|streets| streets.get(street))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reference street names indexed by county and locality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetReference {
    data: HashMap<String, HashMap<String, Vec<String>>>,
}

impl StreetReference {
    /// Builds the index from rows, keeping file order per locality.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ReferenceStreetRow>,
    {
        let mut data: HashMap<String, HashMap<String, Vec<String>>> = HashMap::new();
        for row in rows {
            data.entry(row.refmegye)
                .or_default()
                .entry(row.reftelepules)
                .or_default()
                .push(row.street);
        }
        Self { data }
    }

    /// Returns the street names of a locality, or an empty slice.
    pub fn streets(&self, refmegye: &str, reftelepules: &str) -> &[String] {
        self.data
            .get(refmegye)
            .and_then(|telepulesek| telepulesek.get(reftelepules))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Returns the suffix marking numbers of the `index`-th reference source.
///
/// The first source is authoritative; numbers only found in supplementary
/// sources get a `*`.
pub fn reference_suffix(index: usize) -> &'static str {
    if index == 0 {
        ""
    } else {
        "*"
    }
}

/// Loads the house number reference from `path`, via its cache if fresh.
pub fn build_reference_cache<P: AsRef<Path>>(path: P) -> GimmisnResult<HouseNumberReference> {
    let path = path.as_ref();
    load_or_build(path, || {
        let rows = read_housenumber_rows(path)?;
        tracing::info!("indexed {} reference house numbers from {}", rows.len(), path.display());
        Ok(HouseNumberReference::from_rows(rows))
    })
}

/// Loads several house number references, primary source first.
#[cfg(feature = "parallel")]
pub fn build_reference_caches<P>(paths: &[P]) -> GimmisnResult<Vec<HouseNumberReference>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| build_reference_cache(path))
        .collect()
}

/// Loads several house number references, primary source first.
#[cfg(not(feature = "parallel"))]
pub fn build_reference_caches<P>(paths: &[P]) -> GimmisnResult<Vec<HouseNumberReference>>
where
    P: AsRef<Path> + Sync,
{
    paths.iter().map(|path| build_reference_cache(path)).collect()
}

/// Loads the street reference from `path`, via its cache if fresh.
pub fn build_street_reference_cache<P: AsRef<Path>>(path: P) -> GimmisnResult<StreetReference> {
    let path = path.as_ref();
    load_or_build(path, || {
        let rows = read_street_rows(path)?;
        tracing::info!("indexed {} reference streets from {}", rows.len(), path.display());
        Ok(StreetReference::from_rows(rows))
    })
}

/// Returns the cache sidecar path for a reference TSV.
pub fn cache_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(CACHE_EXTENSION);
    PathBuf::from(name)
}

fn load_or_build<T, F>(path: &Path, build: F) -> GimmisnResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> GimmisnResult<T>,
{
    let cache = cache_path(path);
    if is_fresh(&cache, path) {
        let content = fs::read_to_string(&cache)?;
        match serde_json::from_str(&content) {
            Ok(value) => {
                tracing::debug!("using reference cache {}", cache.display());
                return Ok(value);
            }
            Err(e) => tracing::warn!("ignoring corrupt cache {}: {}", cache.display(), e),
        }
    }

    let value = build()?;
    match serde_json::to_string(&value) {
        Ok(json) => {
            if let Err(e) = fs::write(&cache, json) {
                tracing::warn!("could not write cache {}: {}", cache.display(), e);
            }
        }
        Err(e) => tracing::warn!("could not serialize cache {}: {}", cache.display(), e),
    }
    Ok(value)
}

fn is_fresh(cache: &Path, source: &Path) -> bool {
    let cache_time = fs::metadata(cache).and_then(|m| m.modified());
    let source_time = fs::metadata(source).and_then(|m| m.modified());
    match (cache_time, source_time) {
        (Ok(cache_time), Ok(source_time)) => cache_time >= source_time,
        _ => false,
    }
}

#[cfg(feature = "parallel")]
fn read_housenumber_rows(path: &Path) -> GimmisnResult<Vec<ReferenceHouseNumberRow>> {
    let lines = read_lines_skip_header(path)?;
    Ok(lines
        .par_iter()
        .filter_map(|line| parse_housenumber_line(line))
        .collect())
}

#[cfg(not(feature = "parallel"))]
fn read_housenumber_rows(path: &Path) -> GimmisnResult<Vec<ReferenceHouseNumberRow>> {
    TsvParser::<_, ReferenceHouseNumberRow>::from_path(path)?.parse_all()
}

#[cfg(feature = "parallel")]
fn read_street_rows(path: &Path) -> GimmisnResult<Vec<ReferenceStreetRow>> {
    let lines = read_lines_skip_header(path)?;
    Ok(lines
        .par_iter()
        .filter_map(|line| parse_street_line(line))
        .collect())
}

#[cfg(not(feature = "parallel"))]
fn read_street_rows(path: &Path) -> GimmisnResult<Vec<ReferenceStreetRow>> {
    TsvParser::<_, ReferenceStreetRow>::from_path(path)?.parse_all()
}

/// Parses a single reference house number line.
#[cfg(feature = "parallel")]
fn parse_housenumber_line(line: &str) -> Option<ReferenceHouseNumberRow> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 4 {
        return None;
    }

    let row = ReferenceHouseNumberRow {
        refmegye: fields[0].trim().to_string(),
        reftelepules: fields[1].trim().to_string(),
        street: fields[2].trim().to_string(),
        housenumber: fields[3].trim().to_string(),
    };
    row.passes_filter().then_some(row)
}

/// Parses a single reference street line.
#[cfg(feature = "parallel")]
fn parse_street_line(line: &str) -> Option<ReferenceStreetRow> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return None;
    }

    let row = ReferenceStreetRow {
        refmegye: fields[0].trim().to_string(),
        reftelepules: fields[1].trim().to_string(),
        street: fields[2].trim().to_string(),
    };
    row.passes_filter().then_some(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSENUMBERS: &str = "megye\ttelepules\tutca\thazszam\n\
        01\t011\tTörökugrató utca\t1\n\
        01\t011\tTörökugrató utca\t10\n\
        01\t011\tTűzkő utca\t1\n\
        01\t012\tTörökugrató utca\t3\n";

    #[test]
    fn test_build_reference_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hazszamok.tsv");
        fs::write(&path, HOUSENUMBERS).unwrap();

        let cache = build_reference_cache(&path).unwrap();
        assert_eq!(cache.housenumbers("01", "011", "Törökugrató utca"), ["1", "10"]);
        assert_eq!(cache.housenumbers("01", "012", "Törökugrató utca"), ["3"]);
        assert!(cache.housenumbers("99", "011", "Törökugrató utca").is_empty());
        assert!(cache.housenumbers("01", "99", "Törökugrató utca").is_empty());
        assert!(cache.housenumbers("01", "011", "No such utca").is_empty());
        assert!(cache_path(&path).exists());
    }

    #[test]
    fn test_cache_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hazszamok.tsv");
        fs::write(&path, HOUSENUMBERS).unwrap();
        let first = build_reference_cache(&path).unwrap();

        // A fresh sidecar wins over the TSV.
        let other = HouseNumberReference::from_rows(vec![ReferenceHouseNumberRow {
            refmegye: "02".to_string(),
            reftelepules: "021".to_string(),
            street: "Fő utca".to_string(),
            housenumber: "5".to_string(),
        }]);
        fs::write(cache_path(&path), serde_json::to_string(&other).unwrap()).unwrap();
        let second = build_reference_cache(&path).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.housenumbers("02", "021", "Fő utca"), ["5"]);
    }

    #[test]
    fn test_build_street_reference_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utcak.tsv");
        fs::write(
            &path,
            "megye\ttelepules\tutca\n01\t011\tTűzkő utca\n01\t011\tRef Name 1\n02\t021\tFő utca\n",
        )
        .unwrap();

        let cache = build_street_reference_cache(&path).unwrap();
        assert_eq!(cache.streets("01", "011"), ["Tűzkő utca", "Ref Name 1"]);
        assert!(cache.streets("01", "012").is_empty());
    }

    #[test]
    fn test_reference_suffix() {
        assert_eq!(reference_suffix(0), "");
        assert_eq!(reference_suffix(1), "*");
        assert_eq!(reference_suffix(2), "*");
    }
}
