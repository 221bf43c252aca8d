//! mietkarte - Prepare plot data for the Berlin listings report
//!
//! A command line tool that reads exported model outputs and listing
//! records and writes plot-ready JSON: coefficient tables, significance
//! filtered random effects joined to zip zones, listing distributions and
//! mean predicted prices per room category.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use mietkarte_core::coeftable::{CoefficientComparison, read_coefficient_table};
use mietkarte_core::config::AnalysisConfig;
use mietkarte_core::effects::RandomEffects;
use mietkarte_core::geo::ZipZones;
use mietkarte_core::model::{CoefficientRow, ListingRecord, Rooms};
use mietkarte_core::stats::{
    Histogram, PredictionCell, RoomCount, histogram, mean_prediction_by_rooms, room_distribution,
    size_cutoff, split_by_market, trim_by_size,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prepare plot data for the Berlin listings report.
#[derive(Parser, Debug)]
#[command(name = "mietkarte")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue, global = true)]
    debug: bool,

    /// JSON file with analysis parameters (missing keys use defaults)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a LaTeX coefficient table, optionally comparing it to another
    Coef(CoefArgs),
    /// Filter random intercepts by significance and join them to zip zones
    Ranef(RanefArgs),
    /// Size cutoff, room distribution and price histogram per market
    Listings(ListingsArgs),
    /// Mean predicted price per room category and object type
    Predictions(PredictionsArgs),
}

#[derive(clap::Args, Debug)]
struct CoefArgs {
    /// LaTeX summary table
    table: PathBuf,

    /// Second table to compare against, joined by coefficient name
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Number of header lines before the coefficient rows
    #[arg(long)]
    header: Option<usize>,

    /// Number of footer lines after the coefficient rows
    #[arg(long)]
    footer: Option<usize>,

    /// Also list coefficients with p-value below this level
    #[arg(long)]
    alpha: Option<f64>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(clap::Args, Debug)]
struct RanefArgs {
    /// JSON array of {zip, pointestimate, err} records
    effects: PathBuf,

    /// Standard-error multiplier of the significance interval
    #[arg(short = 'z', long)]
    z: Option<f64>,

    /// GeoJSON file with zip-code polygons
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Zip code to measure distances from (requires --zones)
    #[arg(long, requires = "zones")]
    reference: Option<String>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(clap::Args, Debug)]
struct ListingsArgs {
    /// JSON array of listing records
    listings: PathBuf,

    /// Size quantile above which listings are dropped
    #[arg(short = 'q', long)]
    quantile: Option<f64>,

    /// Number of price histogram bins
    #[arg(short = 'b', long)]
    bins: Option<usize>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(clap::Args, Debug)]
struct PredictionsArgs {
    /// JSON array of listing records
    listings: PathBuf,

    /// JSON array of predicted prices, one per listing (null for none)
    predictions: PathBuf,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(Serialize)]
struct CoefReport<'a> {
    rows: Vec<&'a CoefficientRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    significant: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Vec<ComparisonRow>>,
}

#[derive(Serialize)]
struct ComparisonRow {
    #[serde(flatten)]
    comparison: CoefficientComparison,
    coef_delta: Option<f64>,
}

#[derive(Serialize)]
struct MarketSummary {
    listings: usize,
    size_cutoff: f64,
    kept: usize,
    rooms: Vec<RoomCount>,
    price: Histogram,
}

#[derive(Serialize)]
struct ListingsReport {
    rentals: Option<MarketSummary>,
    sales: Option<MarketSummary>,
}

#[derive(Serialize)]
struct PredictionReport {
    cells: Vec<PredictionCell>,
    /// Non-empty cells of the largest room count, where the line labels sit.
    labels: Vec<PredictionCell>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

/// Load the config file if given and check it.
fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    Ok(config)
}

/// Open the output file, or stdout for "-".
fn open_output(config: &AnalysisConfig, outfile: &str) -> Result<Box<dyn Write>> {
    if outfile == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let path = config.output_path(outfile);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    info!(path = %path.display(), "writing output");
    Ok(Box::new(BufWriter::new(file)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(config: &AnalysisConfig, outfile: &str, value: &T) -> Result<()> {
    let mut output = open_output(config, outfile)?;
    serde_json::to_writer_pretty(&mut output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn run_coef(mut config: AnalysisConfig, args: &CoefArgs) -> Result<()> {
    if let Some(header) = args.header {
        config.table_layout.header_lines = header;
    }
    if let Some(footer) = args.footer {
        config.table_layout.footer_lines = footer;
    }

    let table = read_coefficient_table(&args.table, &config.table_layout, &config.renames)
        .with_context(|| format!("failed to parse {}", args.table.display()))?;
    info!(rows = table.len(), "parsed {}", args.table.display());

    let other = match &args.compare {
        Some(path) => Some(
            read_coefficient_table(path, &config.table_layout, &config.renames)
                .with_context(|| format!("failed to parse {}", path.display()))?,
        ),
        None => None,
    };

    let report = CoefReport {
        rows: table.iter().collect(),
        significant: args
            .alpha
            .map(|alpha| table.significant(alpha).into_iter().map(|row| row.name.as_str()).collect()),
        comparison: other.as_ref().map(|other| {
            table
                .compare(other)
                .into_iter()
                .map(|comparison| ComparisonRow {
                    coef_delta: comparison.coef_delta(),
                    comparison,
                })
                .collect()
        }),
    };
    write_json(&config, &args.outfile, &report)
}

fn run_ranef(mut config: AnalysisConfig, args: &RanefArgs) -> Result<()> {
    if let Some(z) = args.z {
        config.significance_z = z;
    }
    let filter = config.significance_filter()?;

    let effects = RandomEffects::from_json_file(&args.effects)
        .with_context(|| format!("failed to load random effects {}", args.effects.display()))?;
    let annotated = effects.annotate(&filter);
    let significant = annotated.iter().filter(|e| e.significant.is_some()).count();
    info!(
        total = annotated.len(),
        significant,
        z = filter.z(),
        "filtered random effects"
    );

    match &args.zones {
        Some(path) => {
            let zones = ZipZones::from_geojson_file(path, &config.zip_property)
                .with_context(|| format!("failed to load zones {}", path.display()))?;
            let summary = zones.summarize(&annotated, args.reference.as_deref())?;
            write_json(&config, &args.outfile, &summary)
        }
        None => write_json(&config, &args.outfile, &annotated),
    }
}

fn summarize_market(
    name: &str,
    listings: &[ListingRecord],
    config: &AnalysisConfig,
) -> Result<Option<MarketSummary>> {
    if listings.is_empty() {
        warn!(market = name, "no listings");
        return Ok(None);
    }
    let cutoff = size_cutoff(listings, config.size_quantile)?;
    let kept = trim_by_size(listings, config.size_quantile)?;
    let prices: Vec<f64> = kept.iter().map(|l| l.price).collect();
    Ok(Some(MarketSummary {
        listings: listings.len(),
        size_cutoff: cutoff,
        kept: kept.len(),
        rooms: room_distribution(&kept),
        price: histogram(&prices, config.histogram_bins)?,
    }))
}

fn run_listings(mut config: AnalysisConfig, args: &ListingsArgs) -> Result<()> {
    if let Some(q) = args.quantile {
        config.size_quantile = q;
    }
    if let Some(bins) = args.bins {
        config.histogram_bins = bins;
    }
    config.validate()?;

    let listings: Vec<ListingRecord> = read_json(&args.listings)?;
    if listings.is_empty() {
        bail!("{} contains no listings", args.listings.display());
    }

    let (rentals, sales) = split_by_market(&listings);
    let report = ListingsReport {
        rentals: summarize_market("rentals", &rentals, &config)?,
        sales: summarize_market("sales", &sales, &config)?,
    };
    write_json(&config, &args.outfile, &report)
}

fn run_predictions(config: AnalysisConfig, args: &PredictionsArgs) -> Result<()> {
    let listings: Vec<ListingRecord> = read_json(&args.listings)?;
    let predictions: Vec<Option<f64>> = read_json(&args.predictions)?;
    let predictions: Vec<f64> = predictions
        .into_iter()
        .map(|p| p.unwrap_or(f64::NAN))
        .collect();

    let cells = mean_prediction_by_rooms(&listings, &predictions)?;
    let labels = cells
        .iter()
        .filter(|cell| cell.rooms == Rooms::Count(5) && cell.mean.is_some())
        .copied()
        .collect();
    info!(listings = listings.len(), "averaged predictions");
    write_json(&config, &args.outfile, &PredictionReport { cells, labels })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = load_config(args.config.as_deref())?;
    match &args.command {
        Command::Coef(coef) => run_coef(config, coef),
        Command::Ranef(ranef) => run_ranef(config, ranef),
        Command::Listings(listings) => run_listings(config, listings),
        Command::Predictions(predictions) => run_predictions(config, predictions),
    }
}
