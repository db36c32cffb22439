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
    version,
    about = "cellpair - pairwise potentials with cell-list neighbor search: energies, gradients, Hessians and pair distributions of particle configurations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the energy (and optionally gradient and Hessian) of every frame in an XYZ file.
    Eval(EvalArgs),
    /// Compute the radial distribution function g(r) of frames in a periodic box.
    Rdf(RdfArgs),
}

/// Arguments for the `eval` subcommand.
#[derive(Args, Debug)]
pub struct EvalArgs {
    // --- Core Arguments ---
    /// Path to the configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the input coordinates (multi-frame XYZ).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    // --- Output ---
    /// Write the gradient of every frame to this XYZ file.
    #[arg(long, value_name = "PATH")]
    pub gradient_output: Option<PathBuf>,

    /// Compare analytic gradients with central finite differences.
    #[arg(long)]
    pub check_gradient: bool,

    /// Also compute the Hessian and report its lowest eigenvalue.
    #[arg(long)]
    pub hessian: bool,

    // --- Overrides ---
    /// Override the box edge lengths from the config file.
    #[arg(long = "box", value_name = "L,L[,L]", value_delimiter = ',')]
    pub box_lengths: Option<Vec<f64>>,

    /// Override the cell edge subdivision factor.
    #[arg(long, value_name = "FLOAT")]
    pub cell_scale: Option<f64>,

    /// Evaluate on a single thread, overriding the config file.
    #[arg(long)]
    pub no_parallel: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S evaluation.strategy=cell-list
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `rdf` subcommand.
#[derive(Args, Debug)]
pub struct RdfArgs {
    /// Path to the input coordinates (multi-frame XYZ).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Periodic box edge lengths; their count sets the dimension.
    #[arg(
        long = "box",
        required = true,
        value_name = "L,L[,L]",
        value_delimiter = ','
    )]
    pub box_lengths: Vec<f64>,

    /// Number of histogram bins between zero and half the shortest box edge.
    #[arg(long, default_value_t = 100, value_name = "INT")]
    pub bins: usize,

    /// Write the `r,g` table here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
