//! Generic TSV extract parser.
//!
//! Provides a streaming parser for the tab-delimited files this engine
//! consumes: Overpass street and house number extracts and the reference
//! house number and street registries.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{GimmisnError, GimmisnResult};

/// Trait for types that can be parsed from TSV records.
pub trait TsvRecord: Sized {
    /// Expected leading column names for this record type.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Parse a record from a CSV StringRecord.
    fn from_record(record: &StringRecord) -> GimmisnResult<Self>;

    /// Returns true if this record carries usable data.
    fn passes_filter(&self) -> bool {
        true
    }
}

/// A streaming parser for TSV extracts.
///
/// Rows may carry more columns than [`TsvRecord::EXPECTED_COLUMNS`] names;
/// Overpass appends optional tags as extra columns. Quotes are not special.
pub struct TsvParser<R: Read, T: TsvRecord> {
    reader: Reader<R>,
    records_read: usize,
    _marker: PhantomData<T>,
}

impl<T: TsvRecord> TsvParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P) -> GimmisnResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(GimmisnError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }
}

impl<R: Read, T: TsvRecord> TsvParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R) -> GimmisnResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            records_read: 0,
            _marker: PhantomData,
        })
    }

    /// Validates that the file starts with the expected column headers.
    fn validate_headers(reader: &mut Reader<R>) -> GimmisnResult<()> {
        let headers = reader.headers()?;
        let expected = T::EXPECTED_COLUMNS;

        if headers.len() < expected.len() {
            return Err(GimmisnError::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in expected.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // Handle UTF-8 BOM at start of file
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(GimmisnError::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Parses all records into a Vec, skipping (and logging) malformed rows.
    pub fn parse_all(mut self) -> GimmisnResult<Vec<T>> {
        let mut results = Vec::new();
        for record in self.by_ref() {
            match record {
                Ok(record) => results.push(record),
                Err(GimmisnError::Csv(e)) => return Err(GimmisnError::Csv(e)),
                Err(e) => tracing::warn!("skipping malformed row: {}", e),
            }
        }
        Ok(results)
    }
}

impl<R: Read, T: TsvRecord> Iterator for TsvParser<R, T> {
    type Item = GimmisnResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    // Skip empty records
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    match T::from_record(&record) {
                        Ok(parsed) => {
                            if parsed.passes_filter() {
                                return Some(Ok(parsed));
                            }
                            continue;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Reads all non-empty lines of a file after its header row.
pub fn read_lines_skip_header<P: AsRef<Path>>(path: P) -> GimmisnResult<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader
        .lines()
        .skip(1) // Skip header
        .filter_map(Result::ok)
        .filter(|line| !line.is_empty())
        .collect();
    Ok(lines)
}

/// Helper functions for parsing TSV field values.
pub mod parse {
    use super::{GimmisnError, GimmisnResult};

    /// Parses an OSM object id.
    pub fn osm_id(value: &str) -> GimmisnResult<u64> {
        integer(value.trim())
    }

    /// Parses an integer value.
    pub fn integer<T: std::str::FromStr>(value: &str) -> GimmisnResult<T> {
        value.parse::<T>().map_err(|_| GimmisnError::InvalidInteger {
            value: value.to_string(),
        })
    }

    /// Returns a trimmed owned copy of an optional field.
    pub fn text(value: Option<&str>) -> String {
        value.unwrap_or("").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        key: String,
        value: String,
    }

    impl TsvRecord for Pair {
        const EXPECTED_COLUMNS: &'static [&'static str] = &["key", "value"];

        fn from_record(record: &StringRecord) -> GimmisnResult<Self> {
            Ok(Pair {
                key: parse::text(record.get(0)),
                value: parse::text(record.get(1)),
            })
        }

        fn passes_filter(&self) -> bool {
            !self.value.is_empty()
        }
    }

    #[test]
    fn test_parse_osm_id() {
        assert_eq!(parse::osm_id("2713748").unwrap(), 2713748u64);
        assert!(parse::osm_id("x").is_err());
        assert!(parse::osm_id("").is_err());
    }

    #[test]
    fn test_parser_reads_rows() {
        let data = "\u{feff}key\tvalue\textra\na\t1\nb\t\n\nc\t\"3\"\tmore\n";
        let parser = TsvParser::<_, Pair>::from_reader(data.as_bytes()).unwrap();
        let rows = parser.parse_all().unwrap();
        let keys: Vec<&str> = rows.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(rows[1].value, "\"3\"");
    }

    #[test]
    fn test_records_read_counts_filtered_rows() {
        let data = "key\tvalue\na\t1\nb\t\nc\t3\n";
        let mut parser = TsvParser::<_, Pair>::from_reader(data.as_bytes()).unwrap();
        assert_eq!(parser.by_ref().count(), 2);
        assert_eq!(parser.records_read(), 3);
    }

    #[test]
    fn test_parser_rejects_wrong_header() {
        let data = "key\tnev\na\t1\n";
        let err = TsvParser::<_, Pair>::from_reader(data.as_bytes()).err().unwrap();
        assert!(matches!(err, GimmisnError::UnexpectedColumn { position: 1, .. }));

        let data = "key\na\n";
        let err = TsvParser::<_, Pair>::from_reader(data.as_bytes()).err().unwrap();
        assert!(matches!(err, GimmisnError::InvalidHeader { expected: 2, found: 1 }));
    }

    #[test]
    fn test_read_lines_skip_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.tsv");
        std::fs::write(&path, "head\n1\n\n2\n").unwrap();
        assert_eq!(read_lines_skip_header(&path).unwrap(), vec!["1", "2"]);
    }
}
