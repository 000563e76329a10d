//! Argument definitions

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pm_core::traits::Id;
use pm_export::ExportSlice;
use pm_models::{MilestoneStatus, Priority};
use pm_queries::Criterion;

#[derive(Debug, Parser)]
#[command(name = "pm")]
#[command(about = "Project dashboard backed by a local key-value store")]
#[command(version)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List projects, optionally filtered
    List {
        /// Case-insensitive text matched against name and description
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Criterion,
        #[arg(long, default_value = "all")]
        priority: Criterion<Priority>,
        #[arg(long, default_value = "all")]
        category: Criterion,
        #[arg(long, default_value = "all")]
        tag: Criterion,
        /// Also print the values available for each filter
        #[arg(long, default_value_t = false)]
        facets: bool,
    },
    /// Show one project in full
    Show { id: Id },
    /// Create a project from the blank template
    New {
        name: String,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Set a project's progress percentage
    Progress {
        id: Id,
        #[arg(value_parser = clap::value_parser!(i32).range(0..=100))]
        value: i32,
    },
    /// Log a progress note on a project
    Note {
        id: Id,
        text: String,
        #[arg(long)]
        author: Option<String>,
    },
    /// Change a milestone's status
    Milestone {
        id: Id,
        /// prd, techReview, development, integration, testing or launch
        key: String,
        status: MilestoneStatus,
        /// Actual date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Add a requirement to a project
    AddRequirement {
        id: Id,
        title: String,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Record a risk on a project
    AddRisk {
        id: Id,
        level: Priority,
        text: String,
    },
    /// Remove a risk by its position in `show` output (0-based)
    RemoveRisk { id: Id, index: usize },
    /// Delete a project
    Delete { id: Id },
    /// List the team roster
    Team {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        department: Criterion,
        #[arg(long, default_value = "all")]
        role: Criterion,
    },
    /// Dashboard and roster figures
    Stats,
    /// Write an export file
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Slices to include (comma separated); everything when omitted
        #[arg(long, value_delimiter = ',')]
        only: Vec<ExportSlice>,
        /// Output directory; defaults to PM_EXPORT_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace collections from a JSON snapshot file
    Import { file: PathBuf },
    /// Remove every stored collection
    Reset {
        /// Required confirmation
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}
