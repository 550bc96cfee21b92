//! The relation registry.
//!
//! `datadir/relations.toml` lists every relation by name:
//!
//! ```toml
//! [gazdagret]
//! osmrelation = 2713748
//! refmegye = "01"
//! reftelepules = "011"
//! ```
//!
//! `datadir/refcodes.toml` names the reference codes:
//!
//! ```toml
//! [refmegye]
//! "01" = "Budapest"
//!
//! [reftelepules."01"]
//! "011" = "Újbuda"
//! ```

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::RelationDocument;
use crate::relation::Relation;
use crate::types::{GimmisnError, GimmisnResult};

const RELATIONS_FILE: &str = "relations.toml";
const REFCODES_FILE: &str = "refcodes.toml";

/// Human-readable names of reference codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct RefCodes {
    #[serde(default)]
    refmegye: BTreeMap<String, String>,
    #[serde(default)]
    reftelepules: BTreeMap<String, BTreeMap<String, String>>,
}

/// Registry of all relations of a data directory.
///
/// Relations are loaded on first lookup and cached for the registry's
/// lifetime. Names missing from `relations.toml` can still be looked up;
/// they get an empty configuration.
#[derive(Debug)]
pub struct Relations {
    datadir: PathBuf,
    workdir: PathBuf,
    registry: BTreeMap<String, RelationDocument>,
    refcodes: RefCodes,
    activate_all: bool,
    relations: BTreeMap<String, Relation>,
}

impl Relations {
    /// Opens the registry of `datadir`, with relation files under `workdir`.
    ///
    /// # Errors
    /// Returns an error if `datadir` does not exist or a registry file is
    /// malformed.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(datadir: P, workdir: Q) -> GimmisnResult<Self> {
        let datadir = datadir.as_ref();
        if !datadir.is_dir() {
            return Err(GimmisnError::DirectoryNotFound {
                path: datadir.display().to_string(),
            });
        }

        let registry: BTreeMap<String, RelationDocument> =
            read_optional_toml(&datadir.join(RELATIONS_FILE))?;
        let refcodes: RefCodes = read_optional_toml(&datadir.join(REFCODES_FILE))?;
        tracing::debug!("{} relations registered in {}", registry.len(), datadir.display());

        Ok(Self {
            datadir: datadir.to_path_buf(),
            workdir: workdir.as_ref().to_path_buf(),
            registry,
            refcodes,
            activate_all: false,
            relations: BTreeMap::new(),
        })
    }

    /// Returns the data directory.
    pub fn datadir(&self) -> &Path {
        &self.datadir
    }

    /// Returns the work directory.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Returns the registered relation names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }

    /// Returns the names of active relations, or of all of them if
    /// [`Relations::activate_all`] is set.
    pub fn active_names(&mut self) -> GimmisnResult<Vec<String>> {
        let mut active = Vec::new();
        for name in self.names() {
            if self.activate_all || self.get_relation(&name)?.config().is_active() {
                active.push(name);
            }
        }
        Ok(active)
    }

    /// Treats every relation as active, or restores the configured flags.
    pub fn activate_all(&mut self, activate_all: bool) {
        self.activate_all = activate_all;
    }

    /// Returns relation `name`, loading it on first use.
    pub fn get_relation(&mut self, name: &str) -> GimmisnResult<&Relation> {
        Ok(&*self.get_relation_mut(name)?)
    }

    /// Returns relation `name` mutably, loading it on first use.
    pub fn get_relation_mut(&mut self, name: &str) -> GimmisnResult<&mut Relation> {
        match self.relations.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let parent = self.registry.get(name).cloned().unwrap_or_default();
                let relation = Relation::new(name, parent, &self.datadir, &self.workdir)?;
                Ok(entry.insert(relation))
            }
        }
    }

    /// Returns every active relation, sorted by name.
    pub fn relations(&mut self) -> GimmisnResult<Vec<&Relation>> {
        let names = self.active_names()?;
        for name in &names {
            self.get_relation(name)?;
        }
        Ok(names
            .iter()
            .filter_map(|name| self.relations.get(name))
            .collect())
    }

    /// Returns the name of a county code, or an empty string.
    pub fn refmegye_get_name(&self, refmegye: &str) -> String {
        self.refcodes
            .refmegye
            .get(refmegye)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the locality codes of a county, sorted.
    pub fn refmegye_get_reftelepules_ids(&self, refmegye: &str) -> Vec<String> {
        self.refcodes
            .reftelepules
            .get(refmegye)
            .map(|codes| codes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the name of a locality code, or an empty string.
    pub fn reftelepules_get_name(&self, refmegye: &str, reftelepules: &str) -> String {
        self.refcodes
            .reftelepules
            .get(refmegye)
            .and_then(|codes| codes.get(reftelepules))
            .cloned()
            .unwrap_or_default()
    }
}

fn read_optional_toml<T>(path: &Path) -> GimmisnResult<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    if !path.exists() {
        tracing::warn!("{} not found, using an empty table", path.display());
        return Ok(T::default());
    }
    Ok(toml::from_str(&fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
[alpha]
osmrelation = 1
refmegye = "01"
reftelepules = "011"

[beta]
osmrelation = 2
refmegye = "01"
reftelepules = "012"
inactive = true
"#;

    fn registry() -> (TempDir, Relations) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RELATIONS_FILE), REGISTRY).unwrap();
        fs::write(
            dir.path().join(REFCODES_FILE),
            "[refmegye]\n\"01\" = \"Budapest\"\n[reftelepules.\"01\"]\n\"011\" = \"Újbuda\"\n",
        )
        .unwrap();
        let relations = Relations::new(dir.path(), dir.path()).unwrap();
        (dir, relations)
    }

    #[test]
    fn test_missing_datadir() {
        let dir = TempDir::new().unwrap();
        let result = Relations::new(dir.path().join("nope"), dir.path());
        assert!(matches!(result, Err(GimmisnError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_names() {
        let (_dir, mut relations) = registry();
        assert_eq!(relations.names(), vec!["alpha", "beta"]);
        assert_eq!(relations.active_names().unwrap(), vec!["alpha"]);
        relations.activate_all(true);
        assert_eq!(relations.active_names().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_unknown_relation_is_not_an_error() {
        let (_dir, mut relations) = registry();
        let relation = relations.get_relation("nosuchrelation").unwrap();
        assert_eq!(relation.config().osmrelation(), 0);
        assert!(relation.config().is_active());
    }

    #[test]
    fn test_refcodes() {
        let (_dir, relations) = registry();
        assert_eq!(relations.refmegye_get_name("01"), "Budapest");
        assert_eq!(relations.refmegye_get_name("99"), "");
        assert_eq!(relations.refmegye_get_reftelepules_ids("01"), vec!["011"]);
        assert!(relations.refmegye_get_reftelepules_ids("99").is_empty());
        assert_eq!(relations.reftelepules_get_name("01", "011"), "Újbuda");
        assert_eq!(relations.reftelepules_get_name("01", "99"), "");
        assert_eq!(relations.reftelepules_get_name("99", "011"), "");
    }
}
