use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bioplot",
    version,
    about = "Genome QC summaries and biodiversity occurrence records as figures"
)]
pub struct Cli {
    /// Raise diagnostic verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plot a BUSCO short summary as a horizontal stacked bar
    Busco(BuscoArgs),
    /// Map GBIF occurrence records as a hex-binned choropleth
    GbifMap(GbifMapArgs),
}

#[derive(Parser)]
pub struct BuscoArgs {
    /// Path to the BUSCO short summary file to be plotted
    pub in_short_summary: PathBuf,

    /// Path where the figure should be written
    #[arg(short, long, alias = "out_dir", default_value = "./")]
    pub out_dir: PathBuf,
}

#[derive(Parser)]
pub struct GbifMapArgs {
    /// Path to a .zip Darwin Core Archive downloaded from GBIF
    pub records: PathBuf,

    /// Path to a GeoJSON map layer the occurrences are drawn over
    pub map: PathBuf,

    /// Path where output files should be written
    pub out_dir: PathBuf,
}
