//! swap-locator entry point: CLI wiring and config-driven simulator construction.

use std::path::Path;
use std::process;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use swap_locator::config::ScenarioConfig;
use swap_locator::detail::{StationDetail, describe_station};
use swap_locator::geo::GeoPoint;
use swap_locator::io::export::export_csv;
use swap_locator::query::{RankQuery, lookup_address};
use swap_locator::ranking::{DistanceUnit, RankFilter, RankedStation, rank};
use swap_locator::sim::{StationSimulator, StationState};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    lat: Option<f64>,
    lng: Option<f64>,
    address: Option<String>,
    battery: Option<f64>,
    radius: Option<f64>,
    filter: RankFilter,
    unit: DistanceUnit,
    station: Option<String>,
    export: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("swap-locator: find and rank nearby battery-swap stations");
    eprintln!();
    eprintln!("Usage: swap-locator [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in roster (india, bengaluru)");
    eprintln!("  --seed <u64>             Override the drift-phase seed");
    eprintln!("  --lat <deg> --lng <deg>  Rider position");
    eprintln!("  --address <name>         Rider position from the demo address table");
    eprintln!("  --battery <pct>          Remaining charge, 0-100 (default: 50)");
    eprintln!("  --radius <km>            Search radius, min 0.5 (default: 10)");
    eprintln!("  --max-queue <n>          Hide stations with longer queues");
    eprintln!("  --min-reliability <pct>  Hide stations below this reliability");
    eprintln!("  --unit <km|mi>           Distance unit for the report (default: km)");
    eprintln!("  --station <id>           Show one station in detail");
    eprintln!("  --export <path>          Write ranked results to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without a position, the current state of every station is listed.");
}

/// Returns the value following flag `args[*i]`, advancing `i`, or exits.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

/// Parses the value following a flag, or exits with a message naming the flag.
fn parsed_value<T: std::str::FromStr>(args: &[String], i: &mut usize, what: &str) -> T {
    let flag = args[*i].clone();
    let raw = flag_value(args, i, what);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("error: {flag} value \"{raw}\" is not {what}");
        process::exit(1);
    })
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        lat: None,
        lng: None,
        address: None,
        battery: None,
        radius: None,
        filter: RankFilter::default(),
        unit: DistanceUnit::Km,
        station: None,
        export: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").to_string());
            }
            "--seed" => cli.seed_override = Some(parsed_value(&args, &mut i, "a valid u64")),
            "--lat" => cli.lat = Some(parsed_value(&args, &mut i, "a number")),
            "--lng" => cli.lng = Some(parsed_value(&args, &mut i, "a number")),
            "--address" => {
                cli.address = Some(flag_value(&args, &mut i, "an address name").to_string());
            }
            "--battery" => cli.battery = Some(parsed_value(&args, &mut i, "a number")),
            "--radius" => cli.radius = Some(parsed_value(&args, &mut i, "a number")),
            "--max-queue" => {
                cli.filter.max_queue = Some(parsed_value(&args, &mut i, "a valid u32"));
            }
            "--min-reliability" => {
                cli.filter.min_reliability_pct = Some(parsed_value(&args, &mut i, "a valid u32"));
            }
            "--unit" => {
                let raw = flag_value(&args, &mut i, "km or mi");
                cli.unit = DistanceUnit::parse(raw).unwrap_or_else(|| {
                    eprintln!("error: --unit value \"{raw}\" is not km or mi");
                    process::exit(1);
                });
            }
            "--station" => {
                cli.station = Some(flag_value(&args, &mut i, "a station id").to_string());
            }
            "--export" => {
                cli.export = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => cli.port = parsed_value(&args, &mut i, "a valid u16"),
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }
    if cli.address.is_some() && (cli.lat.is_some() || cli.lng.is_some()) {
        eprintln!("error: --address cannot be combined with --lat/--lng");
        process::exit(1);
    }

    cli
}

/// Resolves the rider position from `--address` or `--lat/--lng`.
fn rider_origin(cli: &CliArgs) -> Option<GeoPoint> {
    if let Some(ref name) = cli.address {
        return match lookup_address(name) {
            Ok(p) => Some(p),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
    }
    match (cli.lat, cli.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        (None, None) => None,
        _ => {
            eprintln!("error: --lat and --lng must be given together");
            process::exit(1);
        }
    }
}

fn print_snapshot(stations: &[StationState]) {
    println!("{:<8} {:<26} {:>5} {:>11}", "id", "name", "queue", "reliability");
    for s in stations {
        println!(
            "{:<8} {:<26} {:>5} {:>10.1}%",
            s.id,
            s.name,
            s.queue_length,
            s.reliability * 100.0
        );
    }
}

fn print_ranked(query: &RankQuery, ranked: &[RankedStation], unit: DistanceUnit) {
    println!(
        "Stations within {} of {} at {:.0}% battery:",
        unit.format(query.radius_km),
        query.origin,
        query.battery_pct
    );
    if ranked.is_empty() {
        println!("  (none)");
        return;
    }
    for (i, r) in ranked.iter().enumerate() {
        println!(
            "{:>2}. {:<26} {:>9}  drive {:>3} min  wait {:>3} min  queue {:>2}  reliability {:.1}%",
            i + 1,
            r.station.name,
            unit.format(r.distance_km),
            r.travel_eta_min,
            r.est_wait_min,
            r.station.queue_length,
            r.station.reliability * 100.0
        );
    }
}

fn print_detail(d: &StationDetail, unit: DistanceUnit) {
    let s = &d.station;
    println!("{} ({})", s.name, s.id);
    println!("  location:    {}", s.location());
    println!("  queue:       {} (est. wait {} min)", s.queue_length, d.est_wait_min);
    println!("  reliability: {:.1}%", s.reliability * 100.0);
    match (d.distance_km, d.travel_eta_min) {
        (Some(km), Some(eta)) => println!("  distance:    {} (drive {eta} min)", unit.format(km)),
        _ => println!("  distance:    unknown (no position given)"),
    }
    let trend: Vec<String> = d
        .reliability_history
        .iter()
        .map(|p| format!("{:.3}", p.reliability))
        .collect();
    println!("  history:     {}", trend.join(" "));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then the india default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::india()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = Some(seed);
    }

    let simulator = match StationSimulator::from_config(&scenario, Instant::now()) {
        Ok(sim) => sim,
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
    };
    info!(stations = simulator.len(), "station fleet initialized");

    let origin = rider_origin(&cli);

    if let Some(ref id) = cli.station {
        let station = match simulator.get_station(id) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        let detail_origin = swap_locator::query::detail_origin(
            origin.map(|p| p.lat),
            origin.map(|p| p.lng),
            cli.battery,
        );
        let params = simulator.params();
        let detail = describe_station(
            station,
            detail_origin,
            (params.min_reliability, params.max_reliability),
            &mut rand::rng(),
        );
        print_detail(&detail, cli.unit);
    } else if let Some(origin) = origin {
        let query = match RankQuery::parse(Some(origin.lat), Some(origin.lng), cli.radius, cli.battery)
        {
            Ok(q) => q,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        let snapshot = simulator.list_stations();
        let ranked = cli
            .filter
            .apply(rank(query.origin, query.battery_pct, query.radius_km, &snapshot));
        print_ranked(&query, &ranked, cli.unit);

        if let Some(ref path) = cli.export {
            if let Err(e) = export_csv(&ranked, Path::new(path)) {
                eprintln!("error: failed to write CSV: {e}");
                process::exit(1);
            }
            info!(path = %path, rows = ranked.len(), "ranked stations exported");
        }
    } else {
        if cli.export.is_some() {
            eprintln!("error: --export needs a position (--lat/--lng or --address)");
            process::exit(1);
        }
        print_snapshot(&simulator.list_stations());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(swap_locator::api::AppState { simulator });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(swap_locator::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
