use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "blescope",
    version,
    about = "BLE exploration, monitoring and security auditing toolkit"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for BLE devices and select one to connect
    Scan(ScanArgs),
    /// Open an interactive GATT session with a device
    Connect(ConnectArgs),
    /// Write a message to a characteristic
    Write(WriteArgs),
    /// Listen for notifications on a characteristic
    Listen(ListenArgs),
    /// Run a security audit on a BLE device
    Audit(AuditArgs),
    /// Live RSSI signal monitor
    Monitor(MonitorArgs),
    /// Serve the web dashboard API
    Serve(ServeArgs),
    /// Show version information
    Version,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Scan duration in seconds (config default: 5)
    #[arg(short, long)]
    pub timeout: Option<f64>,
}

#[derive(Args, Clone)]
pub struct ConnectArgs {
    /// Device MAC address (or platform id on macOS)
    pub address: String,
}

#[derive(Args, Clone)]
pub struct WriteArgs {
    /// Device address
    pub address: String,

    /// Characteristic UUID (full or 16-bit hex)
    pub characteristic: String,

    /// UTF-8 message to write
    pub message: String,
}

#[derive(Args, Clone)]
pub struct ListenArgs {
    /// Device address
    pub address: String,

    /// Characteristic UUID (full or 16-bit hex)
    pub characteristic: String,
}

#[derive(Args, Clone)]
pub struct AuditArgs {
    /// Device address (omit to scan and pick interactively)
    pub address: Option<String>,

    /// Export the report to JSON under the log directory
    #[arg(long)]
    pub export: bool,

    /// Connection timeout in seconds (config default: 10)
    #[arg(long)]
    pub timeout: Option<f64>,
}

#[derive(Args, Clone)]
pub struct MonitorArgs {
    /// Monitor duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: f64,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port (config default: 8080)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen address (config default: 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,
}
