mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use tracing_subscriber::EnvFilter;
use windtunnel::aero::{compute_coefficients, compute_forces};
use windtunnel::flow::ALL_FLOW_CLASSES;
use windtunnel::{Telemetry, TunnelParameters, TunnelSettings, WindTunnel};

use crate::app::WindTunnelApp;

#[derive(Parser, Debug)]
#[command(name = "windtunnel", version, about = "Interactive wind tunnel with aero telemetry")]
struct Cli {
    /// YAML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Overrides for the configured tunnel parameters.
#[derive(clap::Args, Debug)]
struct ParameterArgs {
    /// Wind speed in km/h
    #[arg(long)]
    wind_speed: Option<f64>,
    /// Angle of attack in degrees
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,
    /// Front wing setting in percent
    #[arg(long)]
    front_wing: Option<f64>,
    /// Rear wing setting in percent
    #[arg(long)]
    rear_wing: Option<f64>,
    /// Sidepod setting in percent
    #[arg(long)]
    sidepods: Option<f64>,
    /// Request DRS
    #[arg(long)]
    drs: bool,
}

impl ParameterArgs {
    fn apply(&self, params: &mut TunnelParameters) {
        if let Some(v) = self.wind_speed {
            params.wind_speed = v;
        }
        if let Some(v) = self.angle {
            params.angle_of_attack = v;
        }
        if let Some(v) = self.front_wing {
            params.front_wing = v;
        }
        if let Some(v) = self.rear_wing {
            params.rear_wing = v;
        }
        if let Some(v) = self.sidepods {
            params.sidepods = v;
        }
        if self.drs {
            params.drs.manual = true;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive window (default)
    Gui,
    /// Print coefficients, forces and telemetry for one configuration
    Forces {
        #[command(flatten)]
        params: ParameterArgs,
    },
    /// Run the flow simulation without a window and report statistics
    Run {
        /// Number of fixed ticks to run
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,
        #[command(flatten)]
        params: ParameterArgs,
    },
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<TunnelSettings> {
    match path {
        Some(path) => TunnelSettings::from_yaml_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(TunnelSettings::default()),
    }
}

fn overridden(settings: &TunnelSettings, args: &ParameterArgs) -> Result<TunnelParameters> {
    let mut params = settings.parameters;
    args.apply(&mut params);
    params.validate().context("invalid parameter override")?;
    Ok(params)
}

fn print_forces(settings: &TunnelSettings, args: &ParameterArgs) -> Result<()> {
    let params = overridden(settings, args)?;
    let coefficients = compute_coefficients(&params);
    let forces = compute_forces(coefficients, params.wind_speed);
    let telemetry = Telemetry::from_forces(&forces);

    println!("Wind speed:        {} km/h", params.wind_speed);
    println!("Angle of attack:   {}°", params.angle_of_attack);
    println!(
        "Wings / sidepods:  {}% / {}% / {}%",
        params.front_wing, params.rear_wing, params.sidepods
    );
    println!("Lift Coefficient (CL): {:.3}", coefficients.cl);
    println!("Drag Coefficient (CD): {:.4}", coefficients.cd);
    println!("Downforce:  {}", telemetry.downforce_label());
    println!("Drag:       {}", telemetry.drag_label());
    println!("Efficiency: {}", telemetry.efficiency_label());
    Ok(())
}

fn run_headless(settings: TunnelSettings, ticks: u64, args: &ParameterArgs) -> Result<()> {
    let params = overridden(&settings, args)?;
    let interval = settings.tick_interval();
    let mut tunnel = WindTunnel::new(TunnelSettings {
        parameters: params,
        ..settings
    })?;

    tunnel.start();
    let mut reseeded = 0;
    for _ in 0..ticks {
        reseeded += tunnel.step().reseeded;
    }

    let lines = tunnel.field().lines();
    println!(
        "Ran {} ticks ({:.1} s simulated) over {} flow lines",
        tunnel.ticks(),
        interval.as_secs_f64() * ticks as f64,
        lines.len()
    );
    println!("Line resets: {}", reseeded);
    for class in ALL_FLOW_CLASSES {
        let heads: Vec<_> = lines
            .iter()
            .filter(|l| l.class() == class)
            .map(|l| l.head())
            .collect();
        if heads.is_empty() {
            continue;
        }
        let mean_depth = heads.iter().map(|p| p.z).sum::<f64>() / heads.len() as f64;
        let mean_height = heads.iter().map(|p| p.y).sum::<f64>() / heads.len() as f64;
        println!(
            "  {:<15} {:>3} lines, mean head depth {:>7.2}, mean head height {:>5.2}",
            class.label(),
            heads.len(),
            mean_depth,
            mean_height
        );
    }

    let telemetry = tunnel.telemetry();
    println!(
        "Downforce {} / Drag {} / Efficiency {} / DRS {}",
        telemetry.downforce_label(),
        telemetry.drag_label(),
        telemetry.efficiency_label(),
        if tunnel.parameters().drs.engaged() { "open" } else { "closed" }
    );

    tunnel.shutdown();
    Ok(())
}

fn run_gui(settings: TunnelSettings) -> Result<()> {
    let tunnel = WindTunnel::new(settings)?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wind Tunnel",
        options,
        Box::new(move |cc| Box::new(WindTunnelApp::new(cc, tunnel))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = load_settings(cli.config.as_ref())?;

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => run_gui(settings),
        Command::Forces { params } => print_forces(&settings, &params),
        Command::Run { ticks, params } => run_headless(settings, ticks, &params),
    }
}
