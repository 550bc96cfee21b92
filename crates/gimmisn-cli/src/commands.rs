//! Subcommand implementations.

use std::io::Write;

use gimmisn_engine::report::get_housenumber_ranges;
use gimmisn_engine::{GimmisnError, GimmisnResult, Relations, Settings, Translations};

use crate::{Cli, Command};

/// Runs the parsed command, printing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> GimmisnResult<()> {
    let settings = load_settings(cli)?;
    let mut relations = Relations::new(&settings.datadir, &settings.workdir)?;

    match &cli.command {
        Command::MissingHousenumbers { relation } => {
            let relation = relations.get_relation(relation)?;
            let (ongoing, _) = relation.missing_housenumbers()?;
            for (street, missing) in &ongoing {
                let ranges = get_housenumber_ranges(missing);
                writeln!(out, "{}\t{}", street, ranges.len())?;
                writeln!(out, "{}", ranges.join(", "))?;
            }
        }
        Command::MissingStreets { relation } => {
            let relation = relations.get_relation(relation)?;
            let (only_in_reference, _) = relation.missing_streets()?;
            for street in &only_in_reference {
                writeln!(out, "{}", street)?;
            }
        }
        Command::ReferenceHousenumbers { relation } => {
            let references = reference_housenumbers(&settings)?;
            let relation = relations.get_relation(relation)?;
            relation.write_ref_housenumbers(references)?;
            writeln!(out, "{}", relation.files().ref_housenumbers_path().display())?;
        }
        Command::ReferenceStreets { relation } => {
            let reference = reference_streets(&settings)?;
            let relation = relations.get_relation(relation)?;
            relation.write_ref_streets(reference)?;
            writeln!(out, "{}", relation.files().ref_streets_path().display())?;
        }
        Command::Update { all } => {
            relations.activate_all(*all);
            update(&settings, &mut relations, out)?;
        }
        Command::Turbo { relation } => {
            let relation = relations.get_relation(relation)?;
            writeln!(out, "{}", relation.turbo_query()?)?;
        }
    }
    Ok(())
}

/// Loads settings and applies command-line overrides.
///
/// A missing settings file means defaults relative to the current directory.
pub fn load_settings(cli: &Cli) -> GimmisnResult<Settings> {
    let mut settings = if cli.config.exists() {
        Settings::load(&cli.config)?
    } else {
        tracing::warn!("{} not found, using default settings", cli.config.display());
        Settings::default()
    };
    if let Some(workdir) = &cli.workdir {
        settings.workdir = workdir.clone();
    }
    if let Some(datadir) = &cli.datadir {
        settings.datadir = datadir.clone();
    }
    Ok(settings)
}

fn translations(settings: &Settings) -> GimmisnResult<Translations> {
    match &settings.locale {
        Some(path) => Translations::load(path),
        None => Ok(Translations::identity()),
    }
}

fn reference_housenumbers(settings: &Settings) -> GimmisnResult<&[std::path::PathBuf]> {
    if settings.reference_housenumbers.is_empty() {
        return Err(GimmisnError::MissingSetting(
            "reference_housenumbers".to_string(),
        ));
    }
    Ok(&settings.reference_housenumbers)
}

fn reference_streets(settings: &Settings) -> GimmisnResult<&std::path::Path> {
    settings
        .reference_streets
        .as_deref()
        .ok_or_else(|| GimmisnError::MissingSetting("reference_streets".to_string()))
}

/// Refreshes every active relation, printing `name\thouse number %\tstreet %`.
///
/// The relation's missing-streets policy picks the reports: `no` skips the
/// street report, `only` skips the house number report.
fn update<W: Write>(settings: &Settings, relations: &mut Relations, out: &mut W) -> GimmisnResult<()> {
    let translations = translations(settings)?;

    for name in relations.active_names()? {
        let relation = relations.get_relation(&name)?;
        let policy = relation.config().should_check_missing_streets();
        tracing::info!("updating {} (missing-streets = {})", name, policy);

        let mut housenumbers_percent = "-".to_string();
        if policy.checks_housenumbers() {
            if !settings.reference_housenumbers.is_empty() {
                relation.write_ref_housenumbers(&settings.reference_housenumbers)?;
            }
            housenumbers_percent = relation.write_missing_housenumbers(&translations)?.percent;
        }

        let mut streets_percent = "-".to_string();
        if policy.checks_streets() {
            if let Some(reference) = &settings.reference_streets {
                relation.write_ref_streets(reference)?;
            }
            streets_percent = relation.write_missing_streets()?.percent;
        }

        writeln!(out, "{}\t{}\t{}", name, housenumbers_percent, streets_percent)?;
    }
    Ok(())
}
