//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// deepdup - Generate T-SQL procedures that deep-copy a rooted subtree of rows
#[derive(Parser, Debug)]
#[command(name = "deepdup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate copy procedures
    Generate(GenerateArgs),

    /// Show how a rooted copy treats each table and foreign key
    Plan(PlanArgs),

    /// List catalog tables and their foreign keys
    Ls(LsArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Root table for a one-off procedure (default: every configured procedure)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Procedure name, optionally schema-qualified (requires --root)
    #[arg(short, long, requires = "root")]
    pub name: Option<String>,

    /// Input parameter holding the root row's primary key (requires --root)
    #[arg(long, requires = "root")]
    pub id: Option<String>,

    /// Output parameter receiving the copied root's primary key (requires --root)
    #[arg(long, requires = "root")]
    pub output_param: Option<String>,

    /// Column override as Table.Column=parameter (repeatable, requires --root)
    #[arg(long = "set", value_name = "TABLE.COLUMN=PARAM", requires = "root")]
    pub overrides: Vec<String>,

    /// Emit only the procedure body (requires --root)
    #[arg(long, requires = "root")]
    pub body_only: bool,

    /// Write procedures here instead of the project's target directory.
    /// A one-off procedure is printed to stdout unless this is set.
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Root table of the copy
    #[arg(short, long)]
    pub root: String,

    /// Plan as if the root's new identity were captured
    #[arg(long)]
    pub output_param: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats for inspection commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
