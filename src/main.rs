use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{debug, info};
use std::path::{Path, PathBuf};

use lansim::config::LOG_LEVELS;
use lansim::config_loader;
use lansim::{Cell, JsonFileStore, NetworkService};

/// Grid-based IPv4 LAN simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to the simulator configuration YAML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the network state (overrides the config file)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        global = true,
        ignore_case = true,
        value_parser = clap::builder::PossibleValuesParser::new(LOG_LEVELS)
    )]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the current grid
    Show,

    /// Place a device into a cell, replacing any existing one
    Place {
        #[arg(short, long)]
        x: usize,
        #[arg(short, long)]
        y: usize,
        /// Device kind (host, router, ...)
        #[arg(short, long, default_value = "host")]
        kind: String,
        /// IPv4 address in dotted-quad form
        #[arg(short, long)]
        address: String,
        /// Prefix length of the subnet mask
        #[arg(short, long, default_value = "24")]
        prefix: u32,
    },

    /// Remove every device from the grid
    Clear,

    /// Send packets between two cells and print the route
    Send {
        /// Source cell as x,y
        #[arg(long)]
        from: Cell,
        /// Destination cell as x,y
        #[arg(long)]
        to: Cell,
        /// Number of packets to send
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the current grid under a name
    Save { name: String },

    /// Replace the current grid with a saved one
    Load { name: String },

    /// List saved topology names
    List,

    /// Delete a saved topology
    Delete { name: String },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // The config file may set the log level, so read it before the logger
    // exists and report on it afterwards
    let config_path = config_loader::resolve_config_path(args.config.as_deref(), Path::new("."));
    let mut config = config_loader::load_optional(config_path.as_deref())?;

    // Initialize logging
    let level = args
        .log_level
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match &config_path {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => debug!("No {} found, using default configuration", config_loader::DEFAULT_CONFIG_FILE),
    }

    if let Some(state_dir) = args.state_dir {
        config.state_dir = state_dir;
    }

    let store = JsonFileStore::new(&config.state_dir);
    let mut network = NetworkService::open(store, config.max_packets)
        .wrap_err_with(|| format!("Failed to load network state from {:?}", config.state_dir))?;
    info!(
        "State directory: {:?}, at most {} packets per send",
        network.store().dir(),
        network.max_packets()
    );

    match args.command {
        Command::Show => {
            let grid = network.topology();
            print!("{}", grid);
            for (cell, device) in grid.devices() {
                println!("{} {} (network {})", cell, device, device.network_prefix());
            }
        }
        Command::Place { x, y, kind, address, prefix } => {
            network
                .place_device(x, y, &kind, &address, prefix)
                .wrap_err("Failed to place device")?;
            println!("Device placed at ({}, {})", x, y);
        }
        Command::Clear => {
            network.clear().wrap_err("Failed to clear the network")?;
            println!("Network cleared");
        }
        Command::Send { from, to, count, json } => {
            let report = network
                .send_packets(from, to, count)
                .wrap_err_with(|| format!("Failed to send packets from {} to {}", from, to))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let path: Vec<String> = report.path.iter().map(|cell| cell.to_string()).collect();
                println!("Delivery: {}", report.delivery);
                println!("Path: {}", path.join(" -> "));
                println!("Packets: {}", report.packets.len());
            }
        }
        Command::Save { name } => {
            network
                .save_topology(&name)
                .wrap_err_with(|| format!("Failed to save topology '{}'", name))?;
            println!("Topology '{}' saved", name.trim());
        }
        Command::Load { name } => {
            let grid = network
                .load_topology(&name)
                .wrap_err_with(|| format!("Failed to load topology '{}'", name))?;
            print!("{}", grid);
        }
        Command::List => {
            for name in network.list_topologies() {
                println!("{}", name);
            }
        }
        Command::Delete { name } => {
            network
                .delete_topology(&name)
                .wrap_err_with(|| format!("Failed to delete topology '{}'", name))?;
            println!("Topology '{}' deleted", name.trim());
        }
    }

    Ok(())
}
