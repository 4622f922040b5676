use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use abyss_app::core::config::VehicleConfig;
use abyss_app::core::events::SimEvent;
use abyss_app::error::AppError;
use abyss_app::game_loop::spawn_game_loop;
use abyss_app::scenario;
use abyss_app::state::{GameLoopCommand, LoopSettings};

#[derive(Parser, Debug)]
#[command(name = "abyss")]
#[command(about = "Headless submarine and guided torpedo simulation")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 400)]
    ticks: u64,
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Hold the nominal 20Hz tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Write the final world state to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,
    /// JSON vehicle config; missing fields take the tactical defaults
    #[arg(long)]
    vehicle_config: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Tally {
    fired: usize,
    rejected: usize,
    pings: usize,
    detonations: usize,
    hits: usize,
}

impl Tally {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::TorpedoFired { .. } => self.fired += 1,
            SimEvent::FireRejected { .. } => self.rejected += 1,
            SimEvent::SonarPing { .. } => self.pings += 1,
            SimEvent::Detonation { .. } => self.detonations += 1,
            SimEvent::EntityDamaged { .. } => self.hits += 1,
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "abyss failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.vehicle_config {
        Some(path) => serde_json::from_str::<VehicleConfig>(&std::fs::read_to_string(path)?)?,
        None => VehicleConfig::tactical(),
    };

    let sortie = scenario::setup(args.seed, config)?;
    let vehicle = sortie.vehicle;
    let (snap_tx, snap_rx) = mpsc::channel();
    let (cmd_tx, handle) = spawn_game_loop(
        sortie.engine,
        LoopSettings {
            max_ticks: args.ticks,
            realtime: args.realtime,
        },
        snap_tx,
        scenario::script(vehicle),
    )?;

    let mut tally = Tally::default();
    for snapshot in &snap_rx {
        for event in &snapshot.events {
            debug!(tick = snapshot.time.tick, ?event, "sim event");
            tally.record(event);
        }
        if snapshot.time.tick >= args.ticks {
            break;
        }
    }
    let _ = cmd_tx.send(GameLoopCommand::Shutdown);
    let engine = handle.join().map_err(|_| AppError::GameLoopPanicked)?;

    info!(
        ticks = engine.time().tick,
        fired = tally.fired,
        rejected = tally.rejected,
        pings = tally.pings,
        detonations = tally.detonations,
        hits = tally.hits,
        "sortie complete"
    );
    if let Some(view) = engine.vehicle_view(vehicle) {
        info!(
            position = ?view.position,
            health = view.health,
            power_percent = view.power_percent,
            torpedoes = view.torpedo_count,
            depth = view.depth,
            "final vehicle state"
        );
    }

    if let Some(path) = &args.save {
        engine.save_to_file(path)?;
        info!(path = %path.display(), "world saved");
    }
    Ok(())
}
