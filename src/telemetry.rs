use embassy_time::{Instant, Timer};
use heapless::String;
use serde::Serialize;
use serde_json_core::ser::to_string;

use crate::command::Command;
use crate::config::TELEMETRY_PERIOD;
use crate::ingestion::IngestionStats;
use crate::led_state::SharedLedState;
use crate::log::*;
use crate::subsystem::LedSubsystem;

#[derive(Debug, Clone, Serialize)]
pub struct Telemetry {
    pub uptime_s: u64,
    pub mode: &'static str,
    pub level: bool,
    pub delay_ms: u64,
    pub last_command: Command,
    pub decoded: u32,
    pub unknown: u32,
    pub dropped: u32,
    pub overflowed: u32,
}

impl Telemetry {
    /// Copies the LED state out under the lock, then reads the counters.
    pub fn capture(state: &SharedLedState, stats: &IngestionStats, uptime_s: u64) -> Self {
        let led = state.lock(|s| *s.borrow());
        let counts = stats.counts();
        Self {
            uptime_s,
            mode: led.mode().as_str(),
            level: led.level,
            delay_ms: led.delay.as_millis(),
            last_command: led.last_command,
            decoded: counts.decoded,
            unknown: counts.unknown,
            dropped: counts.dropped,
            overflowed: counts.overflowed,
        }
    }
}

pub fn to_json_heapless(telemetry: &Telemetry) -> Option<String<256>> {
    to_string(telemetry).ok()
}

#[embassy_executor::task]
pub async fn telemetry_task(subsystem: LedSubsystem) -> ! {
    info!("Starting telemetry");
    loop {
        Timer::after(TELEMETRY_PERIOD).await;
        let uptime_s = Instant::now().as_secs();
        let telemetry = Telemetry::capture(subsystem.state(), subsystem.stats(), uptime_s);
        match to_json_heapless(&telemetry) {
            Some(json) => info!("{}", json.as_str()),
            None => warn!("Telemetry snapshot did not fit the buffer"),
        }
    }
}
