use crate::cli::args::{BuscoArgs, Cli, Commands, GbifMapArgs};
use crate::core::busco::{self, BuscoSummary};
use crate::core::dwca::{self, DwcArchive};
use crate::core::geo::Basemap;
use crate::core::sites;
use crate::render;
use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::path::PathBuf;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();

    let min_log_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .target(Target::Stderr)
        .filter(None, min_log_level)
        .init();

    match cli.command {
        Commands::Busco(args) => run_busco(&BuscoConfig::from_args(args)),
        Commands::GbifMap(args) => run_gbif_map(&GbifMapConfig::from_args(args)),
    }
}

pub struct BuscoConfig {
    pub in_short_summary: PathBuf,
    pub out_dir: PathBuf,
}

impl BuscoConfig {
    fn from_args(args: BuscoArgs) -> Self {
        Self {
            in_short_summary: args.in_short_summary,
            out_dir: args.out_dir,
        }
    }
}

pub fn run_busco(cfg: &BuscoConfig) -> Result<()> {
    if !cfg.in_short_summary.is_file() {
        bail!("input file not found: {}", cfg.in_short_summary.display());
    }

    let summary = BuscoSummary::from_file(&cfg.in_short_summary)?;
    let percentages = summary.percentages();
    log::info!(
        "counts {:?} from {}",
        summary.counts,
        cfg.in_short_summary.display()
    );

    let input_name = cfg.in_short_summary.to_string_lossy();
    let row_label = busco::dot_stem(&input_name)
        .with_context(|| format!("bad input name {}", cfg.in_short_summary.display()))?;
    print!("{}", busco::render_table(row_label, &percentages));

    let file_name = cfg
        .in_short_summary
        .file_name()
        .and_then(|s| s.to_str())
        .context("failed to determine input filename")?;
    let stem = busco::dot_stem(file_name)?;
    let out_path = cfg.out_dir.join(format!("{stem}.pdf"));

    let svg = render::busco_bar::figure(&percentages, &summary.label)?;
    println!("{}", out_path.display());
    render::pdf::write_pdf(&out_path, &svg)?;
    Ok(())
}

pub struct GbifMapConfig {
    pub records: PathBuf,
    pub map: PathBuf,
    pub out_dir: PathBuf,
}

impl GbifMapConfig {
    fn from_args(args: GbifMapArgs) -> Self {
        Self {
            records: args.records,
            map: args.map,
            out_dir: args.out_dir,
        }
    }
}

/// Fixed plot filename, kept for compatibility with downstream pipelines.
pub const MAP_FILE_NAME: &str = "gbif_occurences_plot.pdf";

pub fn run_gbif_map(cfg: &GbifMapConfig) -> Result<()> {
    println!("{}", cfg.records.display());
    println!("{}", cfg.map.display());
    println!("{}", cfg.out_dir.display());

    let mut archive = DwcArchive::open(&cfg.records)?;
    println!("Core data file is: {}", archive.core_name());
    let table = archive.read_core()?;
    let records = dwca::extract_records(&table)?;
    log::info!("{} usable occurrence rows", records.len());

    println!("Counting records...");
    let sites = sites::first_year_per_site(&records);
    log::info!("{} unique sites", sites.len());

    println!("Plotting map...");
    let basemap = Basemap::from_file(&cfg.map)?;
    log::info!("{} basemap polygons", basemap.polygons.len());

    let cells = sites::bin_sites(&sites, sites::HEX_RESOLUTION)?;
    println!("hexes made");
    log::info!(
        "{} occupied cells at resolution {:?}",
        cells.len(),
        sites::HEX_RESOLUTION
    );

    let svg = render::gbif_map::figure(&basemap, &cells)?;
    let out_path = cfg.out_dir.join(MAP_FILE_NAME);
    render::pdf::write_pdf(&out_path, &svg)?;
    Ok(())
}
