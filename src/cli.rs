use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::FieldCategory;

/// Detects job application fields in saved pages and fills them from your profile.
#[derive(Parser)]
#[command(name = "job-form-filler")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fill the detected fields of an HTML page with the stored profile
    Fill {
        /// HTML file to load
        page: PathBuf,

        /// Where to write the filled page (default: <page>.filled.html)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Address the page was saved from
        #[arg(long)]
        url: Option<String>,
    },

    /// List the fields that would be filled, without changing anything
    Scan {
        /// HTML file to load
        page: PathBuf,

        /// Address the page was saved from
        #[arg(long)]
        url: Option<String>,
    },

    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the stored profile
    Show,

    /// Set one field, e.g. `set currentCompany "Acme"`
    Set {
        field: FieldCategory,
        value: String,
    },

    /// Update name, email and phone in one go
    Quick {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Import profile data from a JSON file
    Import { file: PathBuf },

    /// Export the profile as JSON
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete all stored profile data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}
