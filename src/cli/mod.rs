pub mod audit;
pub mod commands;
pub mod connect;
pub mod listen;
pub mod monitor;
pub mod scan;
pub mod serve;
pub mod write;

pub use commands::{Cli, Commands};

use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::ble::FoundDevice;
use crate::errors::BlescopeError;

/// Print a numbered device table.
pub(crate) fn print_device_list(devices: &[FoundDevice]) {
    for (i, device) in devices.iter().enumerate() {
        let name = device.name.as_deref().unwrap_or("<unknown>");
        let rssi = device
            .rssi
            .map(|r| format!("{r} dBm"))
            .unwrap_or_else(|| "--".into());
        println!(
            "  [{:2}] {:30} {:17} {}",
            i + 1,
            style(name).bold(),
            device.address,
            style(rssi).dim()
        );
    }
}

/// Ask the user to pick an entry from a numbered list. Returns `None` on an
/// empty line, Ctrl+C or EOF.
pub(crate) fn prompt_selection(count: usize) -> Result<Option<usize>, BlescopeError> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| BlescopeError::Internal(format!("readline init failed: {e}")))?;
    loop {
        let line = match editor.readline("Select a device (Enter to quit): ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(BlescopeError::Internal(format!("readline failed: {e}"))),
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => return Ok(Some(n - 1)),
            _ => println!("Enter a number between 1 and {count}"),
        }
    }
}
