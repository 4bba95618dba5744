use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blescope::cli::{self, Commands};
use blescope::config;
use blescope::errors::BlescopeError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                BlescopeError::Config(_) => 2,
                BlescopeError::NoAdapter(_) | BlescopeError::Bluetooth(_) => 3,
                BlescopeError::Connection(_) | BlescopeError::Timeout(_) => 4,
                BlescopeError::DeviceNotFound(_) => 5,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), BlescopeError> {
    let config = config::load_config(cli.config.as_deref().map(Path::new)).await?;

    match cli.command {
        Commands::Scan(args) => cli::scan::handle_scan(args, &config).await,
        Commands::Connect(args) => cli::connect::handle_connect(args, &config).await,
        Commands::Write(args) => cli::write::handle_write(args, &config).await,
        Commands::Listen(args) => cli::listen::handle_listen(args, &config).await,
        Commands::Audit(args) => cli::audit::handle_audit(args, &config).await,
        Commands::Monitor(args) => cli::monitor::handle_monitor(args, &config).await,
        Commands::Serve(args) => cli::serve::handle_serve(args, &config).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn print_version() {
    println!("blescope v{}", env!("CARGO_PKG_VERSION"));
    println!("A versatile Bluetooth Low Energy (BLE) exploration and security auditing tool.");
    println!(
        "build: {} ({})",
        option_env!("GIT_HASH").unwrap_or("dev"),
        env!("BUILD_TIMESTAMP")
    );
}
