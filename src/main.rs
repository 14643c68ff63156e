//! Virtual agent face demo driving a simulated animation host.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use virtual_agent_face::{
    agent::AgentSession,
    config::Config,
    expression::Expression,
    host::{RigDescription, SimulatedHost},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Rig description for the simulated host (YAML format)
    #[arg(long)]
    rig: Option<String>,

    /// Seconds to run before shutting down (runs until Ctrl-C when omitted)
    #[arg(long)]
    duration: Option<u64>,

    /// Expression to apply at startup (name or code 0-6)
    #[arg(short, long, default_value = "normal")]
    expression: Expression,

    /// Override the view width in pixels
    #[arg(long)]
    view_width: Option<u32>,

    /// Override the view height in pixels
    #[arg(long)]
    view_height: Option<u32>,

    /// Disable the simulated gaze
    #[arg(long)]
    no_gaze: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(args: &Args) -> Config {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(width) = args.view_width {
        config.view.width = width;
    }
    if let Some(height) = args.view_height {
        config.view.height = height;
    }
    if args.no_gaze {
        config.gaze.enabled = false;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = load_config(&args);
    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    info!("Virtual Agent Face");

    let host = match &args.rig {
        Some(path) => {
            let rig = RigDescription::from_file(path).with_context(|| format!("Failed to load rig '{path}'"))?;
            SimulatedHost::with_rig(&config.animation.resource_id, rig)
        }
        None => {
            let host = SimulatedHost::new();
            host.add_rig(&config.animation.resource_id, RigDescription::default());
            host
        }
    };
    let host = Arc::new(host);

    let frame_interval = config.view.frame_interval();
    let mut session = AgentSession::new(host.clone(), config)?;
    info!("Available inputs: {}", session.available_inputs().join(", "));

    session.start();
    if let Err(e) = session.select_expression(args.expression) {
        warn!("Initial expression not applied: {}", e);
    }
    info!("{}", session.expression_label());
    info!("{}", session.memory_status());

    let run_for = args.duration.map(Duration::from_secs);
    let deadline = async {
        match run_for {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(deadline, interrupted);

    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_memory = session.memory_status();
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                info!("Interrupted");
                break;
            }
            () = &mut deadline => break,
            _ = ticker.tick() => {
                session.tick();
                frames += 1;
            }
        }

        let memory = session.memory_status();
        if memory != last_memory {
            info!("{}", memory);
            last_memory = memory;
        }
    }

    session.shutdown().await;
    info!(
        "Rendered {} frames, {} pointer moves forwarded",
        frames,
        host.pointer_moves().len()
    );

    let view = session.view();
    info!("Final view {}x{} at ({}, {})", view.width, view.height, view.left, view.top);

    Ok(())
}
