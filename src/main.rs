use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod api;
mod config;
mod domain;
mod geo;
mod store;

use api::{fetch_park_detail, fetch_parks, load_parks_file};
use config::FileConfig;
use domain::{Park, ParkDetail, best_time_to_go};
use geo::{
    Coordinate, DEFAULT_ORIGIN, IpLocationProvider, NearestPark, haversine_km, nearest,
    nearest_unvisited, request_location,
};
use store::VisitedStore;

/// Track visited US national parks and find the nearest one
///
/// Examples:
///   # List every park, visited ones marked
///   parktrack list
///
///   # Nearest park and nearest unvisited park from your location
///   parktrack nearest
///
///   # Same, from an explicit coordinate
///   parktrack nearest --lat 37.7749 --lon -122.4194
///
///   # Toggle a park's visited state
///   parktrack visit acad
///
///   # Full details for one park
///   parktrack show grca
#[derive(Parser, Debug)]
#[command(name = "parktrack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches parktrack.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Local JSON parks snapshot to use instead of the API
    #[arg(long)]
    parks_file: Option<PathBuf>,

    /// Visited-set file location (overrides config)
    #[arg(long)]
    visited_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all parks with their visited state
    List {
        /// Only show parks not yet visited
        #[arg(long)]
        unvisited: bool,
    },
    /// Show the nearest park and the nearest unvisited park
    Nearest {
        /// Origin latitude (use with --lon; skips geolocation)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Origin longitude (use with --lat)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Toggle a park's visited state
    Visit {
        /// Park id, e.g. "acad"
        id: String,
    },
    /// Clear the entire visited set
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Show details for one park
    Show {
        /// Park id, e.g. "grca"
        id: String,
        /// Your latitude, for the distance line (use with --lon)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Your longitude (use with --lat)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let api_base_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| file_config.api_base_url.clone());
    let parks_file = args
        .parks_file
        .clone()
        .or_else(|| file_config.parks_file.clone());
    let visited_path = args
        .visited_file
        .clone()
        .unwrap_or_else(|| file_config.visited_path());

    let mut visited = VisitedStore::load(&visited_path);

    match args.command {
        Command::List { unvisited } => {
            let parks = load_parks(&api_base_url, parks_file.as_deref(), &file_config)?;
            cmd_list(&parks, &visited, unvisited);
        }
        Command::Nearest { lat, lon } => {
            let parks = load_parks(&api_base_url, parks_file.as_deref(), &file_config)?;
            let origin = resolve_origin(lat, lon, &file_config)?;
            cmd_nearest(origin, &parks, &visited)?;
        }
        Command::Visit { id } => {
            let now_visited = visited
                .toggle(&id)
                .context("Failed to save the visited set")?;
            if now_visited {
                println!("Marked {} as visited", id);
            } else {
                println!("Unmarked {} (no longer visited)", id);
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("Refusing to reset the visited set without --yes");
            }
            visited.reset().context("Failed to save the visited set")?;
            println!("Visited set cleared");
        }
        Command::Show { id, lat, lon } => {
            let detail = fetch_detail(&api_base_url, &id, &file_config)?;
            let origin = explicit_origin(lat, lon)?.or_else(|| try_locate(&file_config));
            cmd_show(&detail, origin);
        }
    }

    Ok(())
}

fn load_parks(
    api_base_url: &str,
    parks_file: Option<&std::path::Path>,
    config: &FileConfig,
) -> Result<Vec<Park>> {
    if let Some(path) = parks_file {
        return load_parks_file(path);
    }

    let spinner = create_spinner("Fetching parks list...");
    let start = Instant::now();
    let parks = fetch_parks(api_base_url, config.timeout_secs)?;
    spinner.finish_with_message(format!(
        "Fetched {} parks [{:.1}s]",
        parks.len(),
        start.elapsed().as_secs_f32()
    ));
    Ok(parks)
}

fn fetch_detail(api_base_url: &str, id: &str, config: &FileConfig) -> Result<ParkDetail> {
    let spinner = create_spinner("Fetching park details...");
    let start = Instant::now();
    let detail = fetch_park_detail(api_base_url, id, config.timeout_secs)?;
    spinner.finish_with_message(format!(
        "Fetched details for {} [{:.1}s]",
        detail.park.name,
        start.elapsed().as_secs_f32()
    ));
    Ok(detail)
}

/// Turn explicit --lat/--lon flags into a coordinate, if given. Invalid
/// values are a hard error here, not a fallback case.
fn explicit_origin(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coordinate>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let coord = Coordinate::new(lat, lon).context("Invalid --lat/--lon")?;
            Ok(Some(coord))
        }
        _ => Ok(None),
    }
}

/// Single-shot geolocation with a timeout; None when unavailable.
fn try_locate(config: &FileConfig) -> Option<Coordinate> {
    let timeout = Duration::from_secs(config.location_timeout_secs);
    let rx = request_location(IpLocationProvider::new(timeout));
    match rx.recv_timeout(timeout) {
        Ok(Ok(coord)) => Some(coord),
        Ok(Err(e)) => {
            eprintln!("Note: {}", e);
            None
        }
        Err(_) => {
            eprintln!("Note: location lookup timed out");
            None
        }
    }
}

/// Origin for nearest-park queries: explicit flags, then geolocation, then
/// the fixed center-of-US fallback.
fn resolve_origin(lat: Option<f64>, lon: Option<f64>, config: &FileConfig) -> Result<Coordinate> {
    if let Some(coord) = explicit_origin(lat, lon)? {
        return Ok(coord);
    }

    if let Some(coord) = try_locate(config) {
        println!("Your location: {}", coord);
        return Ok(coord);
    }

    let (lat, lon) = DEFAULT_ORIGIN;
    let fallback = Coordinate::new(lat, lon).context("Default origin is malformed")?;
    println!("Using default origin (center of the contiguous US): {}", fallback);
    Ok(fallback)
}

fn cmd_list(parks: &[Park], visited: &VisitedStore, unvisited_only: bool) {
    if parks.is_empty() {
        println!("No parks found");
        return;
    }

    let mut shown = 0;
    for park in parks {
        let is_visited = visited.contains(&park.id);
        if unvisited_only && is_visited {
            continue;
        }
        let marker = if is_visited { "x" } else { " " };
        println!("[{}] {:<6} {} ({})", marker, park.id, park.name, park.state);
        shown += 1;
    }

    if unvisited_only {
        println!();
        println!("{} of {} parks not yet visited", shown, parks.len());
    } else {
        println!();
        println!("{} parks, {} visited", parks.len(), visited.len());
    }
}

fn cmd_nearest(origin: Coordinate, parks: &[Park], visited: &VisitedStore) -> Result<()> {
    let overall = nearest(origin, parks).context("Bad coordinate in parks data")?;
    let next_up =
        nearest_unvisited(origin, parks, visited.ids()).context("Bad coordinate in parks data")?;

    println!("Nearest park:      {}", format_nearest(overall.as_ref()));
    println!("Nearest unvisited: {}", format_nearest(next_up.as_ref()));
    Ok(())
}

fn format_nearest(hit: Option<&NearestPark<'_>>) -> String {
    match hit {
        Some(n) => format!("{} ({:.1} km)", n.park.name, n.distance_km),
        None => "—".to_string(),
    }
}

fn cmd_show(detail: &ParkDetail, origin: Option<Coordinate>) {
    let park = &detail.park;
    let title = detail
        .nps
        .as_ref()
        .and_then(|n| n.full_name.as_deref())
        .unwrap_or(&park.name);

    println!();
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!("State: {}", park.state);

    if let Some(ref nps) = detail.nps {
        if let Some(ref description) = nps.description {
            println!();
            println!("{}", description);
        }
        if let Some(ref directions) = nps.directions_info {
            println!();
            println!("Directions: {}", directions);
        }
        if let Some(ref url) = nps.url {
            println!("Official site: {}", url);
        }
        if !nps.images.is_empty() {
            println!();
            println!("Images:");
            for image in nps.images.iter().take(6) {
                let caption = image.caption();
                if caption.is_empty() {
                    println!("  {}", image.url);
                } else {
                    println!("  {} - {}", image.url, caption);
                }
            }
        }
    } else {
        println!();
        println!("No extended information available");
        if let Some(ref note) = detail.note {
            println!("({})", note);
        }
    }

    let best = detail
        .best_time_to_go
        .as_deref()
        .unwrap_or_else(|| best_time_to_go(park.lat));
    println!();
    println!("Best time to go: {}", best);

    match origin.and_then(|o| Coordinate::new(park.lat, park.lon).ok().map(|p| (o, p))) {
        Some((origin, location)) => {
            println!("Distance: {:.1} km", haversine_km(origin, location));
        }
        None => {
            println!("Distance: unknown (location unavailable)");
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
