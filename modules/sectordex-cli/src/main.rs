use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sectordex_cli::config::{self, FileConfig, Overrides, Settings};
use sectordex_cli::query::{PlanetSpec, QuerySpec};
use sectordex_cli::report;
use sectordex_ingest::Session;
use sectordex_query::rank_by_distance;

#[derive(Parser)]
#[command(
    name = "sectordex",
    about = "Search a Starsector campaign save for star systems"
)]
struct Cli {
    /// Path to the campaign save (campaign.xml)
    save: PathBuf,

    /// Game installation directory; defaults to three levels above the save
    #[arg(long)]
    game_dir: Option<PathBuf>,

    /// Path to config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Query TOML file; the flags below add to it
    #[arg(long)]
    query: Option<PathBuf>,

    /// Maximum distance from the sector center, in light years
    #[arg(long)]
    max_distance: Option<f64>,

    /// Minimum number of planets
    #[arg(long)]
    min_planets: Option<usize>,

    /// Only systems without any population
    #[arg(long)]
    uninhabited: bool,

    /// Required system theme
    #[arg(long)]
    theme: Option<String>,

    /// Planet requirement, e.g. "types=terran;resources=farmland_rich;max-hazard=1.5"
    #[arg(long = "planet", value_name = "SPEC")]
    planets: Vec<String>,

    /// Maximum number of systems to print
    #[arg(long)]
    limit: Option<usize>,

    /// Print planets, stations and salvage for each system
    #[arg(long)]
    details: bool,

    /// Log as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("sectordex=info"))?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

fn query_spec(cli: &Cli) -> Result<QuerySpec> {
    let mut spec = match &cli.query {
        Some(path) => QuerySpec::from_file(path)
            .with_context(|| format!("Failed to load query file: {}", path.display()))?,
        None => QuerySpec::default(),
    };
    spec.max_distance = cli.max_distance.or(spec.max_distance);
    spec.min_planets = cli.min_planets.or(spec.min_planets);
    spec.uninhabited |= cli.uninhabited;
    if cli.theme.is_some() {
        spec.theme = cli.theme.clone();
    }
    for raw in &cli.planets {
        let planet: PlanetSpec = raw
            .parse()
            .with_context(|| format!("Invalid --planet value: {raw}"))?;
        spec.planets.push(planet);
    }
    Ok(spec)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json)?;

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::from_env(
        file_config,
        Overrides {
            game_dir: cli.game_dir.clone(),
            limit: cli.limit,
            details: cli.details,
        },
    );
    let spec = query_spec(&cli)?;

    let mut session = Session::new();
    if let Some(dir) = &settings.game_dir {
        info!(game_dir = %dir.display(), "Using configured game directory");
        session = session.with_game_dir(dir.clone());
    }

    let sector = session
        .load(&cli.save)
        .with_context(|| format!("Failed to load save: {}", cli.save.display()))?;
    print!("{}", report::SectorSummary(&sector));

    let requirement = spec.build(&sector).context("Failed to build query")?;
    info!(requirement = %requirement, "Searching systems");

    let mut matches = sector.matching_systems(&requirement);
    rank_by_distance(&mut matches);
    println!();
    print!(
        "{}",
        report::SystemListing::new(&matches, settings.limit, settings.details)
    );
    Ok(())
}
