//! Application settings.
//!
//! Settings are read from a TOML file. Relative paths are resolved against
//! the directory containing that file.
//!
//! ```toml
//! workdir = "workdir"
//! datadir = "data"
//! reference_housenumbers = ["refdir/hazszamok_20190511.tsv", "refdir/hazszamok_kieg_20190808.tsv"]
//! reference_streets = "refdir/utcak_20190514.tsv"
//! locale = "locale/hu.toml"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{GimmisnError, GimmisnResult};

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory holding extracts, reference lists and percent files.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
    /// Directory holding relation configuration and query templates.
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,
    /// Reference house number TSVs, primary source first.
    #[serde(default)]
    pub reference_housenumbers: Vec<PathBuf>,
    /// Reference street TSV.
    pub reference_streets: Option<PathBuf>,
    /// Translation file for report headers.
    pub locale: Option<PathBuf>,
}

fn default_workdir() -> PathBuf {
    PathBuf::from("workdir")
}

fn default_datadir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            datadir: default_datadir(),
            reference_housenumbers: Vec::new(),
            reference_streets: None,
            locale: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text without resolving paths.
    pub fn from_toml(content: &str) -> GimmisnResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a file, resolving relative paths against its directory.
    pub fn load<P: AsRef<Path>>(path: P) -> GimmisnResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GimmisnError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let settings = Self::from_toml(&fs::read_to_string(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(settings.resolved_against(base))
    }

    /// Makes every relative path absolute with respect to `base`.
    pub fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            workdir: resolve(self.workdir),
            datadir: resolve(self.datadir),
            reference_housenumbers: self
                .reference_housenumbers
                .into_iter()
                .map(resolve)
                .collect(),
            reference_streets: self.reference_streets.map(resolve),
            locale: self.locale.map(resolve),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workdir() {
        let settings = Settings::from_toml("workdir = \"/path/to/workdir\"").unwrap();
        assert_eq!(settings.workdir, PathBuf::from("/path/to/workdir"));
        assert_eq!(settings.datadir, PathBuf::from("data"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gimmisn.toml");
        fs::write(
            &path,
            "workdir = \"/abs/workdir\"\nreference_housenumbers = [\"refdir/a.tsv\"]\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.workdir, PathBuf::from("/abs/workdir"));
        assert_eq!(settings.datadir, dir.path().join("data"));
        assert_eq!(settings.reference_housenumbers, vec![dir.path().join("refdir/a.tsv")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/gimmisn.toml").unwrap_err();
        assert!(matches!(err, GimmisnError::FileNotFound { .. }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Settings::from_toml("wokdir = \"x\"").is_err());
    }
}
