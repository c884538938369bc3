use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Zone analysis CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "zoneatlas", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a point against every layer and print the recommendation
    Inspect(InspectArgs),

    /// Export the composite opportunity layer as GeoJSON
    Score(ExportArgs),

    /// Export the flood layer enriched with derived risk rings as GeoJSON
    Rings(ExportArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory holding the per-layer GeoJSON datasets
    #[arg(value_hint = ValueHint::DirPath)]
    pub data: PathBuf,

    /// Longitude of the query point
    pub lng: f64,

    /// Latitude of the query point
    pub lat: f64,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory holding the per-layer GeoJSON datasets
    #[arg(value_hint = ValueHint::DirPath)]
    pub data: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}
