use clap::{Parser, Subcommand};
use std::process::ExitCode;

use iss_tracker::geo::{trajectory_to_geojson, FeatureCollection};
use iss_tracker::predict::{Observer, Pass};
use iss_tracker::{Config, Tracker};

#[derive(Parser)]
#[command(name = "iss-tracker")]
#[command(about = "ISS pass predictions and ground tracks")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// List upcoming passes over an observer
    Passes {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        alt_km: f64,
        /// Print every pass instead of the two headline ones
        #[arg(long)]
        all: bool,
    },
    /// Print the ground track around now as JSON
    Trajectory {
        /// Emit a GeoJSON FeatureCollection instead
        #[arg(long)]
        geojson: bool,
    },
    /// Print the current sub-satellite point
    Position,
    /// Force a fetch of fresh orbital elements
    Refresh,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let tracker = match Tracker::from_config(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to set up tracker: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Serve => serve(&config, tracker).await,
        Commands::Passes {
            lat,
            lon,
            alt_km,
            all,
        } => passes(&config, &tracker, lat, lon, alt_km, all).await,
        Commands::Trajectory { geojson } => trajectory(&tracker, geojson).await,
        Commands::Position => position(&tracker).await,
        Commands::Refresh => refresh(&tracker).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

async fn serve(config: &Config, tracker: Tracker) -> CliResult {
    let default_observer = config.observer()?;
    if let Some(label) = config.observer_label() {
        log::info!("Default observer: {}", label);
    }
    iss_tracker::web::run_server(&config.web.bind, tracker, default_observer).await?;
    Ok(())
}

async fn passes(
    config: &Config,
    tracker: &Tracker,
    lat: Option<f64>,
    lon: Option<f64>,
    alt_km: f64,
    all: bool,
) -> CliResult {
    let (observer, label) = match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let observer = Observer::new(lat, lon, alt_km)?;
            let label = format!("{:.4}, {:.4}", observer.latitude_deg, observer.longitude_deg);
            (observer, label)
        }
        (None, None) => {
            let observer = config
                .observer()?
                .ok_or("no observer: pass --lat/--lon or configure one")?;
            (observer, config.observer_label().unwrap_or_default())
        }
        _ => return Err("--lat and --lon go together".into()),
    };

    let bundle = tracker.compute_pass_bundle(observer).await?;
    println!("Observer {} ({} passes found)", label, bundle.passes.len());

    if all {
        for (i, pass) in bundle.passes.iter().enumerate() {
            println!("  {}: {}", i + 1, describe(pass));
        }
        return Ok(());
    }

    match &bundle.next_pass {
        Some(pass) => println!("Next pass:         {}", describe(pass)),
        None => println!("Next pass:         none in lookahead window"),
    }
    match &bundle.next_visible_pass {
        Some(pass) => println!("Next visible pass: {}", describe(pass)),
        None => println!("Next visible pass: none in lookahead window"),
    }
    Ok(())
}

fn describe(pass: &Pass) -> String {
    let mut line = format!(
        "{} -> {} max {:.1}\u{b0} ({}s)",
        pass.aos.format("%Y-%m-%d %H:%M:%S"),
        pass.los.format("%H:%M:%S"),
        pass.max_elevation_deg,
        pass.duration_seconds
    );
    if pass.truncated {
        line.push_str(" [open at window end]");
    }
    line
}

async fn trajectory(tracker: &Tracker, geojson: bool) -> CliResult {
    let trajectory = tracker
        .calculate_trajectory(tracker.settings().trajectory)
        .await?;
    let out = if geojson {
        let collection = FeatureCollection::new(vec![
            trajectory_to_geojson(&trajectory.past).with_property("kind", "past"),
            trajectory_to_geojson(&trajectory.future).with_property("kind", "future"),
        ]);
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string_pretty(&trajectory)?
    };
    println!("{}", out);
    Ok(())
}

async fn position(tracker: &Tracker) -> CliResult {
    let point = tracker.current_position().await?;
    println!(
        "{}: lat {:.4}, lon {:.4}, alt {:.1} km",
        point.at.to_rfc3339(),
        point.latitude_deg,
        point.longitude_deg,
        point.altitude_km
    );
    Ok(())
}

async fn refresh(tracker: &Tracker) -> CliResult {
    let elements = tracker.elements(true).await?;
    if elements.stale {
        println!("Refresh failed, serving cached elements from {}", elements.fetched_at);
    } else {
        println!("Fetched elements at {}", elements.fetched_at);
    }
    println!("{}\n{}", elements.line1, elements.line2);
    Ok(())
}
