use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use nearby_places::api::PlacesClient;
use nearby_places::cli::{create_spinner, format_coords, init_logging};
use nearby_places::config::{FileConfig, read_api_key};
use nearby_places::{CollectOptions, PlaceRecord, SearchRequest, collect_to_file};

/// Search a places API around a point and save the results as JSON
///
/// Every parameter is optional: values come from nearby-places.toml when
/// present, otherwise from built-in defaults.
///
/// Examples:
///   # Use nearby-places.toml (or defaults)
///   places-collect
///
///   # Restaurants within 1km of lower Manhattan
///   places-collect --lat 40.7128 --lon -74.0060 -r 1000 -t restaurant -o manhattan.json
#[derive(Parser, Debug)]
#[command(name = "places-collect")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches nearby-places.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude of the search center
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the search center
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search radius in meters
    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Place type filter (e.g. restaurant, store, gas_station)
    #[arg(short = 't', long = "type")]
    place_type: Option<String>,

    /// Keyword filter (e.g. pizza, coffee)
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// Minimum price level (0-4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    min_price: Option<u8>,

    /// Maximum price level (0-4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    max_price: Option<u8>,

    /// Only return places that are open now
    #[arg(long)]
    open_now: bool,

    /// File holding the API key
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Output JSON file (overwritten if it exists)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Follow next-page tokens up to this many pages (default 1: first page only)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Places API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config =
        FileConfig::resolve(args.config.as_deref()).context("Failed to load config")?;
    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let collect_config = file_config.collect;
    let api_config = file_config.api;

    let center = (
        args.lat.unwrap_or(collect_config.latitude),
        args.lon.unwrap_or(collect_config.longitude),
    );
    let radius = args.radius.unwrap_or(collect_config.radius_meters);
    let place_type = args.place_type.or(collect_config.place_type);
    let keyword = args.keyword.or(collect_config.keyword);
    let min_price = args.min_price.or(collect_config.min_price);
    let max_price = args.max_price.or(collect_config.max_price);
    let open_now = args.open_now || collect_config.open_now;
    let key_file = args.key_file.unwrap_or(collect_config.key_file);
    let output = args.output.unwrap_or(collect_config.output);
    let max_pages = args.max_pages.unwrap_or(collect_config.max_pages);
    let base_url = args.base_url.unwrap_or(api_config.base_url);

    if max_pages == 0 {
        bail!("max_pages must be at least 1");
    }

    println!("nearby-places - Places Collector");
    println!("================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Center: {}", format_coords(center));
        println!("  Radius: {}m", radius);
        println!("  Type: {}", place_type.as_deref().unwrap_or("any"));
        if let Some(ref k) = keyword {
            println!("  Keyword: {}", k);
        }
        println!("  Open now only: {}", if open_now { "yes" } else { "no" });
        println!("  Max pages: {}", max_pages);
        println!("  Key file: {}", key_file.display());
        println!("  Output: {}", output.display());
        println!();
    }

    let api_key = read_api_key(&key_file).context("Failed to load API key")?;

    let request = SearchRequest::new(center, radius, api_key)
        .context("Invalid search parameters")?
        .with_place_type(place_type)
        .with_keyword(keyword)
        .with_price_range(min_price, max_price)
        .with_open_now(open_now);
    request.validate().context("Invalid search parameters")?;

    let client = PlacesClient::new(base_url, Duration::from_secs(api_config.timeout_secs))?;
    let options = CollectOptions::default().with_max_pages(max_pages);

    let spinner = create_spinner(&format!(
        "Searching within {}m of ({}, {})...",
        radius, center.0, center.1
    ));
    let start = Instant::now();
    let results = match collect_to_file(&client, &request, &options, &output) {
        Ok(results) => results,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Failed to collect places");
        }
    };
    spinner.finish_with_message(format!(
        "Found {} places [{:.1}s]",
        results.len(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    for (i, place) in results
        .iter()
        .take(collect_config.preview_limit)
        .enumerate()
    {
        print_place(i + 1, place);
    }

    println!(
        "Done! Saved {} places to {} [{:.1}s]",
        results.len(),
        output.display(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn print_place(index: usize, place: &PlaceRecord) {
    println!("{}. {}", index, place.name);
    match place.rating {
        Some(r) => println!("   Rating: {} ({} reviews)", r, place.user_ratings_total()),
        None => println!("   Rating: N/A"),
    }
    println!("   Address: {}", place.address.as_deref().unwrap_or("N/A"));
    let types = place.types();
    if !types.is_empty() {
        println!(
            "   Types: {}",
            types.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        );
    }
    println!("   Coordinates: {}, {}", place.latitude, place.longitude);
    if let Some(open) = place.open_now() {
        println!("   Open now: {}", if open { "yes" } else { "no" });
    }
    println!();
}
