//! # gimmisn-cli
//!
//! Command-line front end of the reconciliation engine. Commands print
//! plain text to the writer they are given, so they can be driven from
//! tests as well as from the `gimmisn` binary.

#![warn(missing_docs)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "gimmisn")]
#[command(about = "Find streets and house numbers missing from OpenStreetMap")]
#[command(version)]
pub struct Cli {
    /// Settings file
    #[arg(long, env = "GIMMISN_CONFIG", default_value = "gimmisn.toml", global = true)]
    pub config: PathBuf,

    /// Override the work directory from the settings file
    #[arg(long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Override the data directory from the settings file
    #[arg(long, global = true)]
    pub datadir: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the house numbers of a relation that are only in the reference
    MissingHousenumbers {
        /// Relation name
        relation: String,
    },

    /// Print the streets of a relation that are only in the reference
    MissingStreets {
        /// Relation name
        relation: String,
    },

    /// Extract the reference house numbers of a relation
    ReferenceHousenumbers {
        /// Relation name
        relation: String,
    },

    /// Extract the reference streets of a relation
    ReferenceStreets {
        /// Relation name
        relation: String,
    },

    /// Refresh reference lists and completion percentages of active relations
    Update {
        /// Include inactive relations
        #[arg(long)]
        all: bool,
    },

    /// Print an overpass turbo query for the streets only in the reference
    Turbo {
        /// Relation name
        relation: String,
    },
}
