//! A single relation: its configuration, files and reconciliation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use gimmisn_types::{sort_numerically, HouseNumber, Ranges};

use crate::config::{RelationConfig, RelationDocument};
use crate::files::RelationFiles;
use crate::i18n::Translations;
use crate::normalize;
use crate::query;
use crate::reconcile::{self, StreetNumbers};
use crate::reference::{
    build_reference_caches, build_street_reference_cache, reference_suffix, HouseNumberReference,
    StreetReference,
};
use crate::report::{self, HouseNumberReport, StreetReport};
use crate::types::GimmisnResult;

const STREETS_TEMPLATE: &str = "streets-template.txt";
const HOUSENUMBERS_TEMPLATE: &str = "street-housenumbers-template.txt";

/// One area whose OSM data is compared against the reference.
///
/// The configuration and the range sets derived from it form a snapshot
/// taken when the relation is loaded; call [`Relation::reload`] to pick up
/// edited configuration files. Extract and reference files are read on
/// every call.
#[derive(Debug, Clone)]
pub struct Relation {
    name: String,
    datadir: PathBuf,
    parent: RelationDocument,
    config: RelationConfig,
    street_ranges: HashMap<String, Ranges>,
    files: RelationFiles,
}

impl Relation {
    /// Loads relation `name`.
    ///
    /// `parent` holds the relation's registry entry; keys of
    /// `datadir/relation-<name>.toml` override it. Neither has to exist.
    pub fn new(
        name: &str,
        parent: RelationDocument,
        datadir: &Path,
        workdir: &Path,
    ) -> GimmisnResult<Self> {
        let config = load_config(name, &parent, datadir)?;
        let street_ranges = config.street_ranges();
        Ok(Self {
            name: name.to_string(),
            datadir: datadir.to_path_buf(),
            parent,
            config,
            street_ranges,
            files: RelationFiles::new(workdir, name),
        })
    }

    /// Re-reads the relation document and rebuilds the snapshot.
    pub fn reload(&mut self) -> GimmisnResult<()> {
        self.config = load_config(&self.name, &self.parent, &self.datadir)?;
        self.street_ranges = self.config.street_ranges();
        Ok(())
    }

    /// Returns the relation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &RelationConfig {
        &self.config
    }

    /// Returns the relation's workdir files.
    pub fn files(&self) -> &RelationFiles {
        &self.files
    }

    /// Returns the configured range sets by street.
    pub fn street_ranges(&self) -> &HashMap<String, Ranges> {
        &self.street_ranges
    }

    /// Maps an OSM street name to its reference name.
    pub fn ref_street_from_osm_street(&self, osm_street: &str) -> String {
        self.config.ref_street_from_osm_street(osm_street)
    }

    /// Normalizes a raw house number found on an OSM street.
    pub fn normalize(&self, raw: &str, street: &str) -> Vec<HouseNumber> {
        normalize::normalize(
            raw,
            street,
            &self.street_ranges,
            self.config.street_is_even_odd(street),
        )
    }

    /// Returns the distinct OSM street names, sorted.
    ///
    /// Streets only known from addresses count as well.
    pub fn osm_streets(&self) -> GimmisnResult<Vec<String>> {
        let mut streets: BTreeSet<String> = self
            .files
            .read_osm_streets()?
            .into_iter()
            .map(|street| street.name)
            .collect();
        streets.extend(
            self.files
                .read_osm_housenumbers()?
                .into_iter()
                .map(|address| address.street),
        );
        Ok(streets.into_iter().collect())
    }

    /// Returns the normalized OSM house numbers of every street.
    pub fn osm_housenumbers_by_street(&self) -> GimmisnResult<BTreeMap<String, Vec<HouseNumber>>> {
        let mut raw: BTreeMap<String, Vec<HouseNumber>> = BTreeMap::new();
        for address in self.files.read_osm_housenumbers()? {
            let numbers = self.normalize(&address.housenumber, &address.street);
            raw.entry(address.street).or_default().extend(numbers);
        }
        Ok(raw
            .into_iter()
            .map(|(street, numbers)| (street, dedup_sorted(numbers)))
            .collect())
    }

    /// Returns the normalized OSM house numbers of one street.
    pub fn osm_housenumbers(&self, street: &str) -> GimmisnResult<Vec<HouseNumber>> {
        Ok(self
            .osm_housenumbers_by_street()?
            .remove(street)
            .unwrap_or_default())
    }

    /// Returns the stored reference street names, distinct and sorted.
    pub fn ref_streets(&self) -> GimmisnResult<Vec<String>> {
        let streets: BTreeSet<String> = self.files.read_ref_streets()?.into_iter().collect();
        let mut streets: Vec<String> = streets.into_iter().collect();
        reconcile::sort_street_names(&mut streets);
        Ok(streets)
    }

    /// Returns the normalized reference house numbers of every OSM street.
    ///
    /// Numbers listed as invalid for a street are dropped before
    /// normalization.
    pub fn ref_housenumbers(&self) -> GimmisnResult<BTreeMap<String, Vec<HouseNumber>>> {
        let mut by_ref_street: HashMap<String, Vec<String>> = HashMap::new();
        for (street, number) in self.files.read_ref_housenumbers()? {
            by_ref_street.entry(street).or_default().push(number);
        }

        let mut result = BTreeMap::new();
        for street in self.osm_streets()? {
            let ref_street = self.ref_street_from_osm_street(&street);
            let invalid = self.config.street_invalid(&street);
            let numbers: Vec<HouseNumber> = by_ref_street
                .get(&ref_street)
                .into_iter()
                .flatten()
                .filter(|raw| !HouseNumber::is_invalid(raw, invalid))
                .flat_map(|raw| self.normalize(raw, &street))
                .collect();
            result.insert(street, dedup_sorted(numbers));
        }
        Ok(result)
    }

    /// Compares house numbers street by street.
    ///
    /// Returns `(ongoing, done)`, see [`reconcile::missing_housenumbers`].
    pub fn missing_housenumbers(&self) -> GimmisnResult<(Vec<StreetNumbers>, Vec<StreetNumbers>)> {
        let mut osm = self.osm_housenumbers_by_street()?;
        let mut reference = self.ref_housenumbers()?;
        let streets = self.osm_streets()?;
        tracing::debug!("{}: comparing house numbers of {} streets", self.name, streets.len());

        let rows: Vec<_> = streets
            .into_iter()
            .map(|street| {
                let ref_numbers = reference.remove(&street).unwrap_or_default();
                let osm_numbers = osm.remove(&street).unwrap_or_default();
                (street, ref_numbers, osm_numbers)
            })
            .collect();
        Ok(reconcile::missing_housenumbers(rows))
    }

    /// Compares street names.
    ///
    /// Returns `(only_in_reference, in_both)`, both sorted.
    pub fn missing_streets(&self) -> GimmisnResult<(Vec<String>, Vec<String>)> {
        let osm: Vec<String> = self
            .osm_streets()?
            .iter()
            .map(|street| self.ref_street_from_osm_street(street))
            .collect();
        let reference = self.ref_streets()?;
        Ok(reconcile::missing_streets(
            &osm,
            &reference,
            self.config.street_filters(),
        ))
    }

    /// Builds the house number report and stores its percentage.
    pub fn write_missing_housenumbers(
        &self,
        translations: &Translations,
    ) -> GimmisnResult<HouseNumberReport> {
        let (ongoing, done) = self.missing_housenumbers()?;
        let report = report::housenumber_report(
            &ongoing,
            &done,
            |street| self.config.street_is_even_odd(street),
            translations,
        );
        self.files.write_housenumbers_percent(&report.percent)?;
        Ok(report)
    }

    /// Builds the street report and stores its percentage.
    pub fn write_missing_streets(&self) -> GimmisnResult<StreetReport> {
        let (only_in_reference, in_both) = self.missing_streets()?;
        let report = report::street_report(only_in_reference, &in_both);
        self.files.write_streets_percent(&report.percent)?;
        Ok(report)
    }

    /// Returns the reference lines of one OSM street, as
    /// `ref street\thousenumber<suffix>`.
    ///
    /// Every locality code associated with the street is consulted; unknown
    /// codes contribute nothing.
    pub fn build_ref_housenumbers(
        &self,
        reference: &HouseNumberReference,
        street: &str,
        suffix: &str,
    ) -> Vec<String> {
        let ref_street = self.ref_street_from_osm_street(street);
        let mut lines = Vec::new();
        for reftelepules in self.config.street_reftelepules(street) {
            let numbers = reference.housenumbers(self.config.refmegye(), &reftelepules, &ref_street);
            lines.extend(
                numbers
                    .iter()
                    .map(|number| format!("{}\t{}{}", ref_street, number, suffix)),
            );
        }
        lines
    }

    /// Writes the reference house number list from the given registries,
    /// primary source first.
    pub fn write_ref_housenumbers<P>(&self, references: &[P]) -> GimmisnResult<()>
    where
        P: AsRef<Path> + Sync,
    {
        let references = build_reference_caches(references)?;
        for (index, reference) in references.iter().enumerate() {
            if reference.is_empty() {
                tracing::warn!("{}: reference source #{} has no rows", self.name, index);
            }
        }
        let streets = self.osm_streets()?;

        let mut lines = BTreeSet::new();
        for street in &streets {
            for (index, reference) in references.iter().enumerate() {
                lines.extend(self.build_ref_housenumbers(reference, street, reference_suffix(index)));
            }
        }
        tracing::debug!("{}: {} reference house numbers", self.name, lines.len());
        let lines: Vec<String> = lines.into_iter().collect();
        self.files.write_ref_housenumbers(&lines)
    }

    /// Returns the reference street names of the relation's locality.
    pub fn build_ref_streets(&self, reference: &StreetReference) -> Vec<String> {
        reference
            .streets(self.config.refmegye(), self.config.reftelepules())
            .to_vec()
    }

    /// Writes the reference street list from the given registry.
    pub fn write_ref_streets<P: AsRef<Path>>(&self, reference: P) -> GimmisnResult<()> {
        let reference = build_street_reference_cache(reference)?;
        let streets: BTreeSet<String> = self.build_ref_streets(&reference).into_iter().collect();
        let streets: Vec<String> = streets.into_iter().collect();
        self.files.write_ref_streets(&streets)
    }

    /// Returns the Overpass query fetching the relation's streets.
    pub fn streets_query(&self) -> GimmisnResult<String> {
        self.render_query(STREETS_TEMPLATE)
    }

    /// Returns the Overpass query fetching the relation's addresses.
    pub fn housenumbers_query(&self) -> GimmisnResult<String> {
        self.render_query(HOUSENUMBERS_TEMPLATE)
    }

    /// Returns an overpass turbo query for the streets only in the reference.
    pub fn turbo_query(&self) -> GimmisnResult<String> {
        let (only_in_reference, _) = self.missing_streets()?;
        Ok(query::make_turbo_query_for_streets(
            self.config.osmrelation(),
            &only_in_reference,
        ))
    }

    fn render_query(&self, template: &str) -> GimmisnResult<String> {
        let content = fs::read_to_string(self.datadir.join(template))?;
        Ok(query::render_template(&content, self.config.osmrelation()))
    }
}

fn load_config(
    name: &str,
    parent: &RelationDocument,
    datadir: &Path,
) -> GimmisnResult<RelationConfig> {
    let path = datadir.join(format!("relation-{}.toml", name));
    let own = RelationDocument::from_path(&path)?;
    Ok(RelationConfig::from_document(own.merged_over(parent)))
}

/// Sorts numerically and drops repeated numbers, keeping the first.
fn dedup_sorted(numbers: Vec<HouseNumber>) -> Vec<HouseNumber> {
    let mut sorted = sort_numerically(numbers);
    sorted.dedup();
    sorted
}
