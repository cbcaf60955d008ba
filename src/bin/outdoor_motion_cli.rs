use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use outdoor_motion::logging::init_logging;
use outdoor_motion::sim::SimVehicle;
use outdoor_motion::{
    GeoPoint, ListPlanStatusesRequest, MotionParameters, NavigationRequest, OutdoorMotionService,
    PlanState, ServiceConfig, StopPlanRequest,
};
use tokio::time;
use tracing::info;

/// Drive a simulated vehicle to a waypoint with the outdoor motion service
#[derive(Debug, Parser)]
#[command(name = "outdoor_motion_cli")]
struct Cli {
    /// Config file with an [outdoor-motion] section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print an example config and exit
    #[arg(long)]
    print_config: bool,

    /// Destination latitude
    #[arg(long, allow_hyphen_values = true, default_value_t = 40.975156)]
    lat: f64,

    /// Destination longitude
    #[arg(long, allow_hyphen_values = true, default_value_t = -73.660606)]
    lng: f64,

    /// Start latitude of the simulated vehicle
    #[arg(long, allow_hyphen_values = true, default_value_t = 40.977310)]
    start_lat: f64,

    /// Start longitude of the simulated vehicle
    #[arg(long, allow_hyphen_values = true, default_value_t = -73.659143)]
    start_lng: f64,

    /// Start compass heading of the simulated vehicle
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    heading: f64,

    /// Forward speed override (m/s)
    #[arg(long)]
    speed: Option<f64>,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let cfg = match &cli.config {
        Some(path) => ServiceConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServiceConfig {
            speed_kmh: 18.0,
            speed_degrees_per_second: 45.0,
            tick_interval_ms: 200,
            ..ServiceConfig::new("sim-base", "sim-gps")
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ServiceConfig::example_toml());
        return Ok(());
    }

    let cfg = load_config(&cli)?;
    let level = if cli.debug {
        Some("debug")
    } else {
        cfg.log_level.as_deref()
    };
    init_logging(level);

    let vehicle = SimVehicle::new(GeoPoint::new(cli.start_lat, cli.start_lng), cli.heading);
    let service = OutdoorMotionService::new(
        "outdoor-motion",
        cfg.clone(),
        Arc::new(vehicle.base(&cfg.base)),
        Arc::new(vehicle.movement_sensor(&cfg.movement_sensor)),
    )
    .await?;

    let destination = GeoPoint::new(cli.lat, cli.lng);
    let mut req = NavigationRequest::new(&cfg.base, &cfg.movement_sensor, destination);
    if let Some(speed) = cli.speed {
        req = req.with_parameters(MotionParameters {
            linear_m_per_sec: speed,
            ..MotionParameters::default()
        });
    }
    let execution_id = service.move_on_globe(req)?;
    info!("driving to {} as plan {}", destination, execution_id);

    let deadline = time::Instant::now() + Duration::from_secs(cli.timeout_secs);
    let mut poll = time::interval(cfg.tick_interval());
    let outcome = loop {
        poll.tick().await;
        let statuses = service.list_plan_statuses(ListPlanStatusesRequest::default())?;
        let Some(status) = statuses.into_iter().next() else {
            continue;
        };
        info!(
            "{:?} at {} heading {:.1}: {}",
            status.state,
            vehicle.position(),
            vehicle.heading(),
            status.reason.as_deref().unwrap_or("-")
        );
        if status.state != PlanState::InProgress {
            break status.state;
        }
        if time::Instant::now() >= deadline {
            service.stop_plan(StopPlanRequest::new(&cfg.base)).await?;
            break PlanState::Stopped;
        }
    };

    service.close().await?;

    match outcome {
        PlanState::Succeeded => {
            println!("arrived at {} (vehicle at {})", destination, vehicle.position());
            Ok(())
        }
        other => bail!("plan ended {:?} before reaching {}", other, destination),
    }
}
