#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(all(feature = "rp2040", feature = "std"))]
compile_error!("Features `rp2040` and `std` are mutually exclusive");

#[cfg(feature = "rp2040")]
pub mod inputs_rp2040;
#[cfg(feature = "rp2040")]
pub use inputs_rp2040 as inputs;

#[cfg(feature = "rp2040")]
pub use defmt as log;

#[cfg(not(feature = "rp2040"))]
pub use log;

#[cfg(feature = "std")]
pub mod inputs_std;
#[cfg(feature = "std")]
pub use inputs_std as inputs;

#[cfg(feature = "rp2040")]
pub mod outputs_rp2040;
#[cfg(feature = "rp2040")]
pub use outputs_rp2040 as outputs;

#[cfg(feature = "std")]
pub mod outputs_std;
#[cfg(feature = "std")]
pub use outputs_std as outputs;

#[cfg(feature = "std")]
pub mod serial_std;

#[cfg(feature = "rp2040")]
pub mod resources_rp2040;
#[cfg(feature = "rp2040")]
pub use resources_rp2040 as resources;
#[cfg(feature = "rp2040")]
pub use resources_rp2040::*;

pub mod command;
pub mod config;
pub mod ingestion;
pub mod led_controller;
pub mod led_state;
pub mod line_buffer;
pub mod schedule;
pub mod subsystem;
pub mod telemetry;

pub static VERSION: &str = "v0.1";

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

pub use command::Command;
pub use config::COMMAND_QUEUE_DEPTH;
pub use subsystem::{InitError, LedSubsystem};

/// Decoded commands on their way from ingestion to LED control.
pub type CommandChannel = Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;
pub type CommandSender<'a> = Sender<'a, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;
pub type CommandReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;
