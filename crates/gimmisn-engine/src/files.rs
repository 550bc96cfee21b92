//! Per-relation flat files in the workdir.
//!
//! Every file is read and written wholesale. Extracts that have not been
//! fetched yet read as empty.

use std::fs;
use std::path::{Path, PathBuf};

use crate::osm::{OsmHouseNumber, OsmStreet};
use crate::parser::TsvParser;
use crate::sort::{sort_housenumbers_csv, sort_streets_csv};
use crate::types::GimmisnResult;

/// Paths and I/O for the files of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationFiles {
    workdir: PathBuf,
    name: String,
}

impl RelationFiles {
    /// Creates the file set of relation `name` under `workdir`.
    pub fn new(workdir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            name: name.into(),
        }
    }

    /// Overpass street extract.
    pub fn osm_streets_path(&self) -> PathBuf {
        self.workdir.join(format!("streets-{}.csv", self.name))
    }

    /// Overpass house number extract.
    pub fn osm_housenumbers_path(&self) -> PathBuf {
        self.workdir
            .join(format!("street-housenumbers-{}.csv", self.name))
    }

    /// Reference street list, one name per line.
    pub fn ref_streets_path(&self) -> PathBuf {
        self.workdir
            .join(format!("streets-reference-{}.lst", self.name))
    }

    /// Reference house number list, `street\thousenumber` per line.
    pub fn ref_housenumbers_path(&self) -> PathBuf {
        self.workdir
            .join(format!("street-housenumbers-reference-{}.lst", self.name))
    }

    /// House number completion percentage.
    pub fn housenumbers_percent_path(&self) -> PathBuf {
        self.workdir.join(format!("{}.percent", self.name))
    }

    /// Street completion percentage.
    pub fn streets_percent_path(&self) -> PathBuf {
        self.workdir.join(format!("{}-streets.percent", self.name))
    }

    /// Stores a street extract, sorted.
    pub fn write_osm_streets(&self, overpass_result: &str) -> GimmisnResult<()> {
        write_content(&self.osm_streets_path(), &sort_streets_csv(overpass_result))
    }

    /// Stores a house number extract, sorted.
    pub fn write_osm_housenumbers(&self, overpass_result: &str) -> GimmisnResult<()> {
        write_content(
            &self.osm_housenumbers_path(),
            &sort_housenumbers_csv(overpass_result),
        )
    }

    /// Reads the named streets of the street extract.
    pub fn read_osm_streets(&self) -> GimmisnResult<Vec<OsmStreet>> {
        let path = self.osm_streets_path();
        if !path.exists() {
            tracing::warn!("no street extract at {}", path.display());
            return Ok(Vec::new());
        }
        TsvParser::<_, OsmStreet>::from_path(&path)?.parse_all()
    }

    /// Reads the addresses of the house number extract.
    pub fn read_osm_housenumbers(&self) -> GimmisnResult<Vec<OsmHouseNumber>> {
        let path = self.osm_housenumbers_path();
        if !path.exists() {
            tracing::warn!("no house number extract at {}", path.display());
            return Ok(Vec::new());
        }
        TsvParser::<_, OsmHouseNumber>::from_path(&path)?.parse_all()
    }

    /// Reads the reference street list.
    pub fn read_ref_streets(&self) -> GimmisnResult<Vec<String>> {
        Ok(read_optional(&self.ref_streets_path())?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Stores the reference street list.
    pub fn write_ref_streets(&self, lines: &[String]) -> GimmisnResult<()> {
        write_lines(&self.ref_streets_path(), lines)
    }

    /// Reads the reference house number list as `(street, housenumber)` pairs.
    ///
    /// Lines without a tab are skipped.
    pub fn read_ref_housenumbers(&self) -> GimmisnResult<Vec<(String, String)>> {
        Ok(read_optional(&self.ref_housenumbers_path())?
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .map(|(street, number)| (street.to_string(), number.to_string()))
            .collect())
    }

    /// Stores the reference house number list.
    pub fn write_ref_housenumbers(&self, lines: &[String]) -> GimmisnResult<()> {
        write_lines(&self.ref_housenumbers_path(), lines)
    }

    /// Reads the stored house number percentage, if any.
    pub fn read_housenumbers_percent(&self) -> GimmisnResult<Option<String>> {
        read_percent(&self.housenumbers_percent_path())
    }

    /// Stores the house number percentage.
    pub fn write_housenumbers_percent(&self, percent: &str) -> GimmisnResult<()> {
        write_content(&self.housenumbers_percent_path(), percent)
    }

    /// Reads the stored street percentage, if any.
    pub fn read_streets_percent(&self) -> GimmisnResult<Option<String>> {
        read_percent(&self.streets_percent_path())
    }

    /// Stores the street percentage.
    pub fn write_streets_percent(&self, percent: &str) -> GimmisnResult<()> {
        write_content(&self.streets_percent_path(), percent)
    }
}

fn read_optional(path: &Path) -> GimmisnResult<String> {
    if !path.exists() {
        tracing::debug!("{} does not exist yet", path.display());
        return Ok(String::new());
    }
    Ok(fs::read_to_string(path)?)
}

fn read_percent(path: &Path) -> GimmisnResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?.trim_end().to_string()))
}

fn write_lines(path: &Path, lines: &[String]) -> GimmisnResult<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    write_content(path, &content)
}

fn write_content(path: &Path, content: &str) -> GimmisnResult<()> {
    fs::write(path, content)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let files = RelationFiles::new("/work", "gazdagret");
        assert_eq!(files.osm_streets_path(), Path::new("/work/streets-gazdagret.csv"));
        assert_eq!(
            files.osm_housenumbers_path(),
            Path::new("/work/street-housenumbers-gazdagret.csv")
        );
        assert_eq!(
            files.ref_streets_path(),
            Path::new("/work/streets-reference-gazdagret.lst")
        );
        assert_eq!(
            files.ref_housenumbers_path(),
            Path::new("/work/street-housenumbers-reference-gazdagret.lst")
        );
        assert_eq!(files.housenumbers_percent_path(), Path::new("/work/gazdagret.percent"));
        assert_eq!(
            files.streets_percent_path(),
            Path::new("/work/gazdagret-streets.percent")
        );
    }

    #[test]
    fn test_missing_files_read_empty() {
        let dir = TempDir::new().unwrap();
        let files = RelationFiles::new(dir.path(), "nosuchrelation");
        assert!(files.read_osm_streets().unwrap().is_empty());
        assert!(files.read_osm_housenumbers().unwrap().is_empty());
        assert!(files.read_ref_streets().unwrap().is_empty());
        assert!(files.read_ref_housenumbers().unwrap().is_empty());
        assert_eq!(files.read_housenumbers_percent().unwrap(), None);
    }

    #[test]
    fn test_write_osm_streets_sorts() {
        let dir = TempDir::new().unwrap();
        let files = RelationFiles::new(dir.path(), "test");
        files
            .write_osm_streets("@id\tname\n2\tB\n1\tA\n3\t\n")
            .unwrap();
        let content = fs::read_to_string(files.osm_streets_path()).unwrap();
        assert_eq!(content, "@id\tname\n1\tA\n2\tB\n3\t\n");

        let streets = files.read_osm_streets().unwrap();
        let names: Vec<&str> = streets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let files = RelationFiles::new(dir.path(), "test");
        let extract = "@id\taddr:street\taddr:housenumber\n2\tA\t10\n1\tA\t9\n";
        files.write_osm_housenumbers(extract).unwrap();
        let first = fs::read_to_string(files.osm_housenumbers_path()).unwrap();
        files.write_osm_housenumbers(&first).unwrap();
        let second = fs::read_to_string(files.osm_housenumbers_path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "@id\taddr:street\taddr:housenumber\n1\tA\t9\n2\tA\t10\n");
    }

    #[test]
    fn test_ref_housenumbers_round_trip() {
        let dir = TempDir::new().unwrap();
        let files = RelationFiles::new(dir.path(), "test");
        files
            .write_ref_housenumbers(&["Tűzkő utca\t1".to_string(), "Tűzkő utca\t2".to_string()])
            .unwrap();
        assert_eq!(
            files.read_ref_housenumbers().unwrap(),
            vec![
                ("Tűzkő utca".to_string(), "1".to_string()),
                ("Tűzkő utca".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_percent_round_trip() {
        let dir = TempDir::new().unwrap();
        let files = RelationFiles::new(dir.path(), "test");
        files.write_streets_percent("80.00").unwrap();
        assert_eq!(files.read_streets_percent().unwrap().as_deref(), Some("80.00"));
    }
}
