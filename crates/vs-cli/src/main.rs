//! vanstat CLI

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use vs_geo::{DEFAULT_QUANTILES, IncidentFilter};
use vs_viz_render::config::VizConfig;
use vs_viz_render::output::ImageFormat;

mod config;
mod diagnostics;
mod map;
mod report;

use config::PipelineConfig;
use diagnostics::{DEFAULT_FEATURES, DEFAULT_NAME, DEFAULT_TARGET, DiagnosticsPlan};
use map::{CrimeSource, MapPlan};

#[derive(Parser)]
#[command(name = "vanstat")]
#[command(about = "vanstat - neighbourhood crime regression diagnostics and maps")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Pipeline config (YAML). Command-line flags take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regression plots and report for every feature against the crime rate
    Diagnostics {
        /// Input table (CSV, TSV, or GeoJSON FeatureCollection)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for plots and reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Target column [default: crime_rate]
        #[arg(long)]
        target: Option<String>,

        /// Feature columns, comma-separated [default: the ten census ratios]
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Dataset tag used in summary plot names [default: van]
        #[arg(long)]
        name: Option<String>,

        /// Image format: svg, or png when built with the `png` feature [default: svg]
        #[arg(long)]
        format: Option<String>,

        /// Threads for the fitting stage (0 = auto) [default: 1]
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Choropleth of crime counts per neighbourhood (Leaflet HTML)
    #[command(group(ArgGroup::new("source").required(true).args(["counts", "incidents"])))]
    Map {
        /// Boundary polygons (GeoJSON FeatureCollection)
        #[arg(long)]
        boundaries: PathBuf,

        /// Pre-aggregated counts CSV
        #[arg(long, conflicts_with = "incidents")]
        counts: Option<PathBuf>,

        /// Raw incident CSV, counted per neighbourhood
        #[arg(long)]
        incidents: Option<PathBuf>,

        /// Output HTML file [default: vancouver_crime_map.html]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Boundary property holding the unit id [default: name]
        #[arg(long)]
        id_property: Option<String>,

        /// Unit id column [default: unit_id for counts, NEIGHBOURHOOD for incidents]
        #[arg(long)]
        unit_column: Option<String>,

        /// Count column of the counts CSV [default: crime_count]
        #[arg(long)]
        count_column: Option<String>,

        /// Incident year to keep [default: 2021]
        #[arg(long, conflicts_with = "all_years", requires = "incidents")]
        year: Option<i64>,

        /// Keep incidents from every year
        #[arg(long, requires = "incidents")]
        all_years: bool,

        /// Page title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let cfg = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Diagnostics { input, output_dir, target, features, name, format, threads } => {
            let d = &cfg.diagnostics;
            let viz = cfg.viz_config()?;
            let format =
                format.or_else(|| d.format.clone()).unwrap_or_else(|| viz.output.format.clone());
            let plan = DiagnosticsPlan {
                input,
                output_dir: output_dir.unwrap_or_else(|| PathBuf::from("initial_plots")),
                target: target
                    .or_else(|| d.target.clone())
                    .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
                features: features.or_else(|| d.features.clone()).unwrap_or_else(|| {
                    DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect()
                }),
                name: name.or_else(|| d.name.clone()).unwrap_or_else(|| DEFAULT_NAME.to_string()),
                format: ImageFormat::parse(&format)
                    .with_context(|| format!("unsupported image format '{format}'"))?,
                threads: threads.or(d.threads).unwrap_or(1),
            };
            cmd_diagnostics(&plan, &viz)
        }
        Commands::Map {
            boundaries,
            counts,
            incidents,
            output,
            id_property,
            unit_column,
            count_column,
            year,
            all_years,
            title,
        } => {
            let m = &cfg.map;
            let source = match (counts, incidents) {
                (Some(path), _) => CrimeSource::Counts {
                    path,
                    unit_column: unit_column
                        .or_else(|| m.unit_column.clone())
                        .unwrap_or_else(|| map::DEFAULT_UNIT_COLUMN.to_string()),
                    count_column: count_column
                        .or_else(|| m.count_column.clone())
                        .unwrap_or_else(|| map::DEFAULT_COUNT_COLUMN.to_string()),
                },
                (None, Some(path)) => {
                    let base = IncidentFilter::default();
                    let all_years = all_years || m.all_years.unwrap_or(false);
                    CrimeSource::Incidents {
                        path,
                        filter: IncidentFilter {
                            unit_column: unit_column
                                .or_else(|| m.incident_unit_column.clone())
                                .unwrap_or(base.unit_column),
                            year_column: m.year_column.clone().unwrap_or(base.year_column),
                            year: if all_years { None } else { year.or(m.year).or(base.year) },
                            aliases: m.aliases.clone().unwrap_or(base.aliases),
                            exclude: m.exclude.clone().unwrap_or(base.exclude),
                        },
                    }
                }
                (None, None) => anyhow::bail!("one of --counts or --incidents is required"),
            };
            let plan = MapPlan {
                boundaries,
                source,
                id_property: id_property
                    .or_else(|| m.id_property.clone())
                    .unwrap_or_else(|| map::DEFAULT_ID_PROPERTY.to_string()),
                output: output.unwrap_or_else(|| PathBuf::from(map::DEFAULT_OUTPUT)),
                title: title
                    .or_else(|| m.title.clone())
                    .unwrap_or_else(|| map::DEFAULT_TITLE.to_string()),
                quantiles: m.quantiles.clone().unwrap_or_else(|| DEFAULT_QUANTILES.to_vec()),
            };
            cmd_map(&plan, &cfg.viz_config()?)
        }
        Commands::Version => {
            println!("vanstat {}", vs_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_diagnostics(plan: &DiagnosticsPlan, viz: &VizConfig) -> Result<()> {
    let outcome = diagnostics::run_diagnostics(plan, viz)?;
    println!(
        "{} fitted, {} skipped, {} plot(s) written to {}",
        outcome.fits.len(),
        outcome.skipped.len(),
        outcome.plots.len(),
        plan.output_dir.display()
    );
    for path in &outcome.reports {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_map(plan: &MapPlan, viz: &VizConfig) -> Result<()> {
    let artifact = map::run_map(plan, viz)?;
    println!(
        "{} unit(s) mapped, {} without data, {} unmapped -> {}",
        artifact.units.len(),
        artifact.no_data().count(),
        artifact.unmatched.len(),
        plan.output.display()
    );
    Ok(())
}
