use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "raspa",
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "RASPA Client CLI - Submit RASPA2 adsorption simulations to a remote service, follow their progress and download the results.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options shared by every command that talks to the service.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to a configuration file in TOML format.
    /// Defaults to the per-user configuration file, if it exists.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the simulation service, overriding the configuration file.
    #[arg(short, long, global = true, value_name = "URL")]
    pub server: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload the input files and start a simulation; prints the task ID.
    Submit(SubmitArgs),
    /// Show the current status and recent log lines of a task.
    Status(StatusArgs),
    /// Download the result archive of a completed task.
    Fetch(FetchArgs),
    /// Submit a simulation, wait for it to finish and download the results.
    Run(RunArgs),
    /// Manage the per-user configuration file.
    Config(ConfigArgs),
}

/// The five input files of a simulation. Each one may instead come from the `[inputs]`
/// section of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Force-field mixing rules (e.g., force_field_mixing_rules.def).
    #[arg(long, value_name = "PATH")]
    pub mixing_rules: Option<PathBuf>,

    /// Pseudo-atom definitions (e.g., pseudo_atoms.def).
    #[arg(long, value_name = "PATH")]
    pub pseudo_atoms: Option<PathBuf>,

    /// Framework structure in CIF format (e.g., example_mof.cif).
    #[arg(long, value_name = "PATH")]
    pub framework: Option<PathBuf>,

    /// Adsorbate molecule definition (e.g., CO2.def).
    #[arg(long, value_name = "PATH")]
    pub adsorbate: Option<PathBuf>,

    /// RASPA simulation input (e.g., simulation.input).
    #[arg(long, value_name = "PATH")]
    pub simulation_input: Option<PathBuf>,
}

/// Arguments for the `submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Number of MPI processes the service should use.
    #[arg(short, long, value_name = "NUM", value_parser = clap::value_parser!(u32).range(1..))]
    pub nproc: Option<u32>,
}

/// Arguments for the `status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Task ID returned by `submit`.
    #[arg(required = true)]
    pub task_id: String,

    /// Print the raw status document as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Task ID returned by `submit`.
    #[arg(required = true)]
    pub task_id: String,

    /// Where to write the result archive (default: results.zip).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Number of MPI processes the service should use.
    #[arg(short, long, value_name = "NUM", value_parser = clap::value_parser!(u32).range(1..))]
    pub nproc: Option<u32>,

    /// Seconds to wait between two status checks.
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Where to write the result archive (default: results.zip).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Available commands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the path of the configuration file in use.
    Path,
    /// Print the configuration file in use.
    Show,
    /// Store the base URL of the simulation service.
    SetServer {
        /// The service URL, e.g. http://raspa.example.org:8000
        #[arg(required = true)]
        url: String,
    },
    /// Delete the configuration file.
    Reset,
}
