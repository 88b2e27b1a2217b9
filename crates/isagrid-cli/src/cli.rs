//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "isagrid",
    version,
    about = "Inspect sample sheet grids",
    long_about = "Build the column layout and row records of a study or assay sheet,\n\
                  validate cell edits, and check row deletion rules offline."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the column layout of a sheet.
    Columns(ColumnsArgs),

    /// Print or export the rows of a sheet.
    Rows(RowsArgs),

    /// Validate a cell edit against the sheet's edit configuration.
    Validate(ValidateArgs),

    /// Report the delete verdict of every study row.
    CanDelete(CanDeleteArgs),
}

/// Sheet input shared by all commands.
#[derive(Args)]
pub struct SheetArgs {
    /// Sheet JSON (`topHeader`, `fieldHeader`, `tableData`, optional configs).
    #[arg(value_name = "SHEET")]
    pub sheet: PathBuf,

    /// Study UUID the configuration documents are keyed by.
    #[arg(long = "study", default_value = "study")]
    pub study: String,

    /// Treat the sheet as the table of this assay.
    #[arg(long = "assay", value_name = "UUID")]
    pub assay: Option<String>,

    /// Grid settings TOML file.
    #[arg(long = "settings", value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Display configuration JSON overriding the one in the sheet.
    #[arg(long = "display", value_name = "PATH")]
    pub display: Option<PathBuf>,

    /// Protocol list JSON (`[{"uuid": .., "name": ..}]`).
    #[arg(long = "protocols", value_name = "PATH")]
    pub protocols: Option<PathBuf>,

    /// Build the grid in edit mode using the sheet's edit configuration.
    #[arg(long = "edit")]
    pub edit: bool,
}

#[derive(Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Print the layout as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct RowsArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Write visible columns as CSV to this file instead of printing.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Print the row records as JSON.
    #[arg(long = "json", conflicts_with = "csv")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Row index (0-based).
    #[arg(long = "row")]
    pub row: usize,

    /// Schema column index (0-based).
    #[arg(long = "col")]
    pub col: usize,

    /// Proposed value; `;` separates list elements.
    #[arg(long = "value")]
    pub value: String,

    /// Unit for UNIT columns.
    #[arg(long = "unit")]
    pub unit: Option<String>,
}

#[derive(Args)]
pub struct CanDeleteArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Assay sheet linked to the study, as `UUID=PATH`. Repeatable.
    #[arg(long = "assay-sheet", value_name = "UUID=PATH")]
    pub assay_sheets: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
