//! tf-instana cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; tf-instana ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with match expressions
    #[command(alias = "expression")]
    Expr(ExprCommand),

    /// Show the API payloads of the instana resources in terraform files
    ///
    /// Reads terraform from stdin unless any other source is provided (via --input-*)
    Plan(PlanCommand),

    /// Show the attributes of the supported resource types
    Schema(SchemaCommand),
}

#[derive(Parser, Debug)]
pub struct ExprCommand {
    #[command(subcommand)]
    pub command: ExprSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExprSubCommand {
    /// Print the canonical form of a match expression
    Normalize {
        /// Match expression
        expression: String,
    },

    /// Print the API model of a match expression
    ToApi {
        #[clap(flatten)]
        output: OutputArgs,

        /// Match expression
        expression: String,
    },

    /// Read an API match expression (json) from stdin and print its canonical form
    FromApi,
}

#[derive(Parser, Debug)]
pub struct PlanCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub config: ConfigArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct SchemaCommand {
    /// Only show this resource type
    pub resource_type: Option<String>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Load .tf files from work directory
    #[clap(short = 'w', long = "input-workdir")]
    pub workdir: bool,

    /// Load a file
    #[clap(short = 'f', long = "input-file")]
    pub files: Vec<PathBuf>,

    /// Load .tf files from given directory
    #[clap(short = 'd', long = "input-dir")]
    pub directories: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Provider configuration (yaml)
    ///
    /// Values of the provider block of the loaded files take precedence.
    #[clap(long = "config")]
    pub config_file: Option<PathBuf>,

    /// Prefix of the names of managed objects, overrides any other configuration
    #[clap(long = "name-prefix")]
    pub name_prefix: Option<String>,

    /// Suffix of the names of managed objects, overrides any other configuration
    #[clap(long = "name-suffix")]
    pub name_suffix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
