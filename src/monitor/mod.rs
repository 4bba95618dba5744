//! Live RSSI monitor: real-time signal-strength waves in the terminal.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use console::{style, Term};
use tokio_util::sync::CancellationToken;

use crate::ble::{Advertisement, BleAdapter};
use crate::errors::BlescopeError;

const WAVE_WIDTH: usize = 40;
const HISTORY_SIZE: usize = 40;
const RSSI_MIN: f64 = -100.0;
const RSSI_MAX: f64 = -30.0;
const TOP_N: usize = 15;

const SIGNAL_EXCELLENT: i16 = -50;
const SIGNAL_GOOD: i16 = -65;
const SIGNAL_FAIR: i16 = -80;
const SIGNAL_WEAK: i16 = -90;

/// RSSI history for a single device.
pub struct DeviceTracker {
    pub name: String,
    pub address: String,
    history: VecDeque<i16>,
    last_seen: Instant,
    pub update_count: usize,
}

impl DeviceTracker {
    fn new(name: Option<&str>, address: &str) -> Self {
        Self {
            name: name.unwrap_or("<unknown>").to_string(),
            address: address.to_string(),
            history: VecDeque::with_capacity(HISTORY_SIZE),
            last_seen: Instant::now(),
            update_count: 0,
        }
    }

    fn update(&mut self, rssi: i16) {
        if self.history.len() == HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(rssi);
        self.last_seen = Instant::now();
        self.update_count += 1;
    }

    pub fn current_rssi(&self) -> Option<i16> {
        self.history.back().copied()
    }

    pub fn avg_rssi(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().map(|r| *r as f64).sum::<f64>() / self.history.len() as f64)
    }

    fn age(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

fn normalize(rssi: i16) -> f64 {
    ((rssi as f64 - RSSI_MIN) / (RSSI_MAX - RSSI_MIN)).clamp(0.0, 1.0)
}

fn quality(rssi: i16) -> (&'static str, console::Color) {
    use console::Color;
    if rssi >= SIGNAL_EXCELLENT {
        ("EXCELLENT", Color::Green)
    } else if rssi >= SIGNAL_GOOD {
        ("GOOD", Color::Green)
    } else if rssi >= SIGNAL_FAIR {
        ("FAIR", Color::Yellow)
    } else if rssi >= SIGNAL_WEAK {
        ("WEAK", Color::Red)
    } else {
        ("VERY WEAK", Color::Red)
    }
}

/// Render the RSSI history as a wave of block characters.
fn wave_line(history: &VecDeque<i16>) -> String {
    let mut wave = String::new();
    let samples: Vec<i16> = history
        .iter()
        .rev()
        .take(WAVE_WIDTH)
        .rev()
        .copied()
        .collect();
    for rssi in &samples {
        let n = normalize(*rssi);
        let (ch, color) = if n > 0.8 {
            ("▇", console::Color::Green)
        } else if n > 0.6 {
            ("▆", console::Color::Green)
        } else if n > 0.4 {
            ("▄", console::Color::Yellow)
        } else if n > 0.2 {
            ("▂", console::Color::Red)
        } else {
            ("▁", console::Color::Red)
        };
        wave.push_str(&style(ch).fg(color).to_string());
    }
    if samples.len() < WAVE_WIDTH {
        wave.push_str(&style("·".repeat(WAVE_WIDTH - samples.len())).dim().to_string());
    }
    wave
}

fn rssi_cell(rssi: i16) -> String {
    let (label, color) = quality(rssi);
    format!(
        "{} {}",
        style(format!("{rssi}dBm")).fg(color).bold(),
        style(format!("[{label}]")).fg(color).dim()
    )
}

pub struct RssiMonitor {
    devices: HashMap<String, DeviceTracker>,
    pub packet_count: usize,
    started: Instant,
}

impl Default for RssiMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl RssiMonitor {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            packet_count: 0,
            started: Instant::now(),
        }
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn handle(&mut self, ad: &Advertisement) {
        let Some(rssi) = ad.rssi else { return };
        let tracker = self
            .devices
            .entry(ad.address.clone())
            .or_insert_with(|| DeviceTracker::new(ad.name.as_deref(), &ad.address));
        if tracker.name == "<unknown>" {
            if let Some(name) = &ad.name {
                tracker.name = name.clone();
            }
        }
        tracker.update(rssi);
        self.packet_count += 1;
    }

    fn render(&self, term: &Term) {
        let _ = term.clear_screen();

        let mut rows: Vec<&DeviceTracker> = self.devices.values().collect();
        rows.sort_by_key(|t| -(t.current_rssi().unwrap_or(-999) as i32));
        rows.truncate(TOP_N);

        println!("{}", style("BLE Signal Monitor").cyan().bold());
        println!(
            "{:22} {:17} {:wave$} {:24} {:>7} {:>5}",
            "Device",
            "Address",
            "Signal Wave",
            "RSSI",
            "Avg",
            "Pkts",
            wave = WAVE_WIDTH
        );
        for tracker in rows {
            let mut name = tracker.name.clone();
            name.truncate(20);
            let name = if tracker.age() < Duration::from_secs(5) {
                style(format!("{name:22}")).bold().to_string()
            } else if tracker.age() > Duration::from_secs(15) {
                style(format!("{name:22}")).dim().to_string()
            } else {
                format!("{name:22}")
            };
            let rssi = tracker
                .current_rssi()
                .map(rssi_cell)
                .unwrap_or_else(|| style("--").dim().to_string());
            let avg = tracker
                .avg_rssi()
                .map(|a| format!("{a:.0}"))
                .unwrap_or_else(|| "--".into());
            println!(
                "{name} {:17} {} {rssi:24} {avg:>7} {:>5}",
                tracker.address,
                wave_line(&tracker.history),
                tracker.update_count,
            );
        }

        let elapsed = self.started.elapsed().as_secs();
        println!();
        println!(
            "{}",
            style(format!(
                "  {} devices  |  {} packets  |  {elapsed}s  |  Press Ctrl+C to stop",
                self.devices.len(),
                self.packet_count
            ))
            .dim()
        );
    }

    /// Run the monitor until `duration` elapses or `cancel` fires. The
    /// advertisement stream (and its scan) stops when the receiver drops.
    pub async fn run(
        &mut self,
        adapter: &dyn BleAdapter,
        duration: Duration,
        cancel: CancellationToken,
    ) -> Result<(), BlescopeError> {
        let mut rx = adapter.stream_advertisements().await?;
        let term = Term::stdout();
        let _ = term.hide_cursor();
        self.started = Instant::now();

        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);
        let mut redraw = tokio::time::interval(Duration::from_millis(500));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = &mut deadline => break,
                _ = redraw.tick() => self.render(&term),
                ad = rx.recv() => {
                    match ad {
                        Some(ad) => self.handle(&ad),
                        None => break,
                    }
                }
            }
        }

        let _ = term.show_cursor();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(address: &str, rssi: i16) -> Advertisement {
        Advertisement {
            address: address.into(),
            name: Some("beacon".into()),
            rssi: Some(rssi),
            tx_power: None,
            service_uuids: Vec::new(),
            manufacturer_ids: Vec::new(),
        }
    }

    #[test]
    fn tracker_keeps_bounded_history() {
        let mut monitor = RssiMonitor::new();
        for i in 0..60 {
            monitor.handle(&ad("AA:BB:CC:DD:EE:FF", -40 - (i % 10)));
        }
        assert_eq!(monitor.device_count(), 1);
        assert_eq!(monitor.packet_count, 60);
        let tracker = monitor.devices.values().next().unwrap();
        assert_eq!(tracker.history.len(), HISTORY_SIZE);
        assert!(tracker.current_rssi().is_some());
    }

    #[test]
    fn advertisements_without_rssi_are_skipped() {
        let mut monitor = RssiMonitor::new();
        let mut quiet = ad("AA:BB:CC:DD:EE:FF", 0);
        quiet.rssi = None;
        monitor.handle(&quiet);
        assert_eq!(monitor.device_count(), 0);
    }

    #[test]
    fn normalize_clamps_to_unit_range() {
        assert_eq!(normalize(-120), 0.0);
        assert_eq!(normalize(-10), 1.0);
        assert!(normalize(-65) > 0.0 && normalize(-65) < 1.0);
    }
}
