//! Interactive GATT session against a connected device.
//!
//! Opens a connection, prints the attribute tree with resolved names, then
//! drops into a readline loop for read/write/listen operations. Every
//! operation goes through the packet logger; the connection is closed and
//! the logs flushed on every exit path.

pub mod banner;

use std::time::Duration;

use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::ble::{BleAdapter, BleConnection, CharProps, ServiceInfo};
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;
use crate::gatt::{resolve_characteristic, resolve_service};
use crate::packets::PacketLogger;

const DEFAULT_LISTEN_SECS: u64 = 30;

struct CharEntry {
    index: usize,
    uuid: String,
    properties: CharProps,
}

pub struct InteractiveSession {
    connection: Box<dyn BleConnection>,
    chars: Vec<CharEntry>,
    logger: PacketLogger,
}

/// Connect to `address` and run the interactive session until the user quits.
pub async fn run(
    adapter: &dyn BleAdapter,
    address: &str,
    config: &BlescopeConfig,
) -> Result<(), BlescopeError> {
    banner::show_banner();

    let mut logger = PacketLogger::new(address, &config.logging.log_dir)?;
    println!("Connecting to {}...", style(address).bold());
    let timeout = Duration::from_secs_f64(config.scan.connect_timeout_secs);
    let connection = match adapter.connect(address, timeout).await {
        Ok(c) => c,
        Err(e) => {
            let _ = logger.log_error("CONNECT", &e.to_string());
            let _ = logger.close();
            return Err(e);
        }
    };
    let _ = logger.log_connect(address);
    println!("{} Connected\n", style("✔").green());

    let services = match connection.enumerate().await {
        Ok(s) => s,
        Err(e) => {
            let _ = logger.log_error("SERVICES", &e.to_string());
            let _ = connection.disconnect().await;
            let _ = logger.close();
            return Err(e);
        }
    };
    let char_count: usize = services.iter().map(|s| s.characteristics.len()).sum();
    let _ = logger.log_services(services.len(), char_count);

    let chars = print_tree(address, &services);
    let mut session = InteractiveSession {
        connection,
        chars,
        logger,
    };

    let result = session.command_loop().await;

    if let Err(e) = session.connection.disconnect().await {
        debug!(error = %e, "Session disconnect failed");
    } else {
        let _ = session.logger.log_disconnect();
        println!("{} Disconnected", style("✔").yellow());
    }
    match session.logger.close() {
        Ok(summary) => {
            println!("{}", style(format!("Log saved: {}", summary.log_file.display())).dim());
            println!("{}", style(format!("JSON saved: {}", summary.json_file.display())).dim());
        }
        Err(e) => debug!(error = %e, "Failed to close packet log"),
    }
    result
}

/// Print the attribute tree and return the indexed characteristic list.
fn print_tree(address: &str, services: &[ServiceInfo]) -> Vec<CharEntry> {
    let mut chars = Vec::new();
    println!("{} ({address})", style("Device Properties").cyan().bold());
    for service in services {
        let svc_name = resolve_service(&service.uuid);
        let mut label = format!("{} {}", style("Service:").magenta().bold(), service.uuid);
        if svc_name != "Unknown Service" {
            label.push_str(&format!("  ({})", style(svc_name).bold()));
        }
        println!("├── {label}");
        for characteristic in &service.characteristics {
            let index = chars.len() + 1;
            let char_name = resolve_characteristic(&characteristic.uuid);
            let mut line = format!("[{index:2}] {}", style(&characteristic.uuid).green());
            if char_name != "Unknown" {
                line.push_str(&format!("  ({})", style(char_name).bold()));
            }
            println!("│   ├── {line}");
            let props = characteristic.properties.labels();
            let props = if props.is_empty() {
                "none".to_string()
            } else {
                props.join(", ")
            };
            println!("│   │     {} {props}", style("Properties:").yellow());
            chars.push(CharEntry {
                index,
                uuid: characteristic.uuid.clone(),
                properties: characteristic.properties,
            });
        }
    }
    println!();
    chars
}

fn print_help() {
    let commands: &[(&str, &str)] = &[
        ("services", "Reprint the characteristic list"),
        ("read <n|uuid>", "Read a characteristic"),
        ("write <n|uuid> <text>", "Write UTF-8 text to a characteristic"),
        ("listen <n|uuid> [secs]", "Stream notifications (default 30s)"),
        ("help", "Show this help"),
        ("quit", "Disconnect and exit"),
    ];
    for (cmd, desc) in commands {
        println!("  {:24} {}", style(cmd).cyan(), desc);
    }
}

impl InteractiveSession {
    fn resolve_target(&self, token: &str) -> Option<&CharEntry> {
        if let Ok(index) = token.parse::<usize>() {
            return self.chars.iter().find(|c| c.index == index);
        }
        self.chars
            .iter()
            .find(|c| c.uuid.eq_ignore_ascii_case(token))
    }

    async fn command_loop(&mut self) -> Result<(), BlescopeError> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| BlescopeError::Internal(format!("readline init failed: {e}")))?;
        print_help();
        println!();

        loop {
            let line = match editor.readline("blescope> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    debug!(error = %e, "Readline error");
                    break;
                }
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            let _ = editor.add_history_entry(&line);

            let mut parts = line.splitn(3, ' ');
            let command = parts.next().unwrap_or_default();
            let target = parts.next();
            let rest = parts.next();

            match command {
                "quit" | "exit" | "disconnect" => break,
                "help" => print_help(),
                "services" => {
                    for c in &self.chars {
                        println!(
                            "  [{:2}] {}  ({})",
                            c.index,
                            c.uuid,
                            resolve_characteristic(&c.uuid)
                        );
                    }
                }
                "read" => self.handle_read(target).await,
                "write" => self.handle_write(target, rest).await,
                "listen" => self.handle_listen(target, rest).await,
                other => {
                    println!("Unknown command: {other} (try 'help')");
                }
            }
        }
        Ok(())
    }

    async fn handle_read(&mut self, target: Option<&str>) {
        let Some((uuid, props)) = self.lookup(target, "read") else {
            return;
        };
        if !props.read {
            println!("{}", style("Characteristic is not readable").yellow());
            return;
        }
        match self.connection.read(&uuid).await {
            Ok(data) => {
                let _ = self.logger.log_read(&uuid, &data);
                let text = String::from_utf8_lossy(&data);
                println!(
                    "{} hex={}  text={}",
                    style("✔ Read:").green(),
                    data_encoding::HEXLOWER.encode(&data),
                    text
                );
            }
            Err(e) => {
                let _ = self.logger.log_error("READ", &e.to_string());
                println!("{} {e}", style("Read failed:").red());
            }
        }
    }

    async fn handle_write(&mut self, target: Option<&str>, payload: Option<&str>) {
        let Some((uuid, props)) = self.lookup(target, "write") else {
            return;
        };
        let Some(payload) = payload else {
            println!("Usage: write <n|uuid> <text>");
            return;
        };
        if !props.writable() {
            println!("{}", style("Characteristic is not writable").yellow());
            return;
        }
        match self.connection.write(&uuid, payload.as_bytes()).await {
            Ok(()) => {
                let _ = self.logger.log_write(&uuid, payload.as_bytes());
                println!("{}", style("✔ Write successful").green());
            }
            Err(e) => {
                let _ = self.logger.log_error("WRITE", &e.to_string());
                println!("{} {e}", style("Write failed:").red());
            }
        }
    }

    async fn handle_listen(&mut self, target: Option<&str>, secs: Option<&str>) {
        let Some((uuid, props)) = self.lookup(target, "listen") else {
            return;
        };
        if !props.subscribable() {
            println!("{}", style("Characteristic does not notify").yellow());
            return;
        }
        let secs = secs
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LISTEN_SECS);

        let mut rx = match self.connection.subscribe(&uuid).await {
            Ok(rx) => rx,
            Err(e) => {
                let _ = self.logger.log_error("LISTEN", &e.to_string());
                println!("{} {e}", style("Listen failed:").red());
                return;
            }
        };

        println!(
            "{}",
            style(format!("Listening on {uuid} for {secs}s (Ctrl+C to stop)...")).cyan()
        );
        let deadline = tokio::time::sleep(Duration::from_secs(secs));
        tokio::pin!(deadline);
        let mut count = 0usize;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = &mut deadline => break,
                value = rx.recv() => {
                    let Some(value) = value else { break };
                    count += 1;
                    let _ = self.logger.log_notify(&uuid, &value);
                    println!(
                        "{} #{count}  hex={}  text={}",
                        style("→").blue(),
                        data_encoding::HEXLOWER.encode(&value),
                        String::from_utf8_lossy(&value)
                    );
                }
            }
        }
        if let Err(e) = self.connection.unsubscribe(&uuid).await {
            debug!(error = %e, "Unsubscribe failed");
        }
        println!(
            "{}",
            style(format!("Stopped. Received {count} notification(s).")).yellow()
        );
    }

    fn lookup(&self, target: Option<&str>, usage: &str) -> Option<(String, CharProps)> {
        let Some(token) = target else {
            println!("Usage: {usage} <n|uuid> ...");
            return None;
        };
        match self.resolve_target(token) {
            Some(entry) => Some((entry.uuid.clone(), entry.properties)),
            None => {
                println!("{}", style(format!("No characteristic matches '{token}'")).yellow());
                None
            }
        }
    }
}
