use clap::{Args, Parser, Subcommand, ValueEnum};
use initsys::engine::config::ResidueMapPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "initsys developers",
    version,
    about = "initsys - build initial configurations for molecular simulations from molecule templates and a force field.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a system from a recipe, apply a force field and write the result as TOML.
    Build(BuildArgs),
    /// Compute box edge lengths (nm) for a total mass at a target density.
    #[command(name = "box")]
    BoxSize(BoxArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    // --- Core Arguments ---
    /// Path to the build recipe in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub recipe: PathBuf,

    /// Path for the output TOML file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    // --- Force Field Overrides ---
    /// Override the force field definition (TOML).
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    /// Override the non-bonded parameter table (CSV).
    #[arg(long, value_name = "PATH")]
    pub nonbonded: Option<PathBuf>,

    /// Strip hydrogens, folding their mass and charge into bonded heavy atoms.
    #[arg(long)]
    pub remove_hydrogens: bool,

    /// Set every partial charge to zero.
    #[arg(long)]
    pub remove_charges: bool,

    /// Shift partial charges so the system is neutral.
    #[arg(long)]
    pub charge_neutral: bool,

    /// Keep parameters in real units instead of reducing them.
    #[arg(long)]
    pub no_scale: bool,

    /// Override how residue typing assignments are reused.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub residue_map: Option<ResidueMapArg>,

    // --- System Overrides ---
    /// Override the target density in g/cm³.
    #[arg(short, long, value_name = "FLOAT")]
    pub density: Option<f64>,

    /// Override the interaction cutoff.
    #[arg(long, value_name = "FLOAT")]
    pub r_cut: Option<f64>,

    /// Override the lattice spacing (nm) used to place molecules.
    #[arg(long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    // --- Target Box Overrides ---
    /// Hold the target box x edge fixed at this length (nm).
    #[arg(long, value_name = "NM")]
    pub target_x: Option<f64>,

    /// Hold the target box y edge fixed at this length (nm).
    #[arg(long, value_name = "NM")]
    pub target_y: Option<f64>,

    /// Hold the target box z edge fixed at this length (nm).
    #[arg(long, value_name = "NM")]
    pub target_z: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueMapArg {
    Auto,
    Always,
    Never,
}

impl From<ResidueMapArg> for ResidueMapPolicy {
    fn from(arg: ResidueMapArg) -> Self {
        match arg {
            ResidueMapArg::Auto => ResidueMapPolicy::Auto,
            ResidueMapArg::Always => ResidueMapPolicy::Always,
            ResidueMapArg::Never => ResidueMapPolicy::Never,
        }
    }
}

/// Arguments for the `box` subcommand.
#[derive(Args, Debug)]
pub struct BoxArgs {
    /// Total mass in amu.
    #[arg(short, long, required = true, value_name = "AMU")]
    pub mass: f64,

    /// Target density in g/cm³.
    #[arg(short, long, required = true, value_name = "FLOAT")]
    pub density: f64,

    /// Fixed x edge (nm).
    #[arg(long, value_name = "NM")]
    pub x: Option<f64>,

    /// Fixed y edge (nm).
    #[arg(long, value_name = "NM")]
    pub y: Option<f64>,

    /// Fixed z edge (nm).
    #[arg(long, value_name = "NM")]
    pub z: Option<f64>,
}
