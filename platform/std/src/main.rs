use clap::Parser;
use embassy_executor::Spawner;
use led_controller::config::DEFAULT_BAUD_RATE;
use led_controller::inputs::ingestion_task;
use led_controller::outputs::{led_task, SimulatedLed};
use led_controller::serial_std::StdSerial;
use led_controller::telemetry::telemetry_task;
use led_controller::LedSubsystem;
use log::*;

/// Serial-controlled LED, simulated on the host.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial device to read commands from (a tty or pty).
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    device: String,

    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(args.log_level)
        .format_timestamp_nanos()
        .init();

    info!("Starting LED controller {}", led_controller::VERSION);

    let serial = match StdSerial::open(&args.device, args.baud) {
        Ok(serial) => serial,
        Err(e) => {
            error!("Failed to open {}: {}", args.device, e);
            return;
        }
    };
    info!("Serial port {} open at {} baud", args.device, args.baud);

    let subsystem = match LedSubsystem::init() {
        Ok(subsystem) => subsystem,
        Err(e) => {
            error!("LED control not started: {}", e);
            return;
        }
    };

    // A single std executor has no priorities; the LED task is spawned first.
    spawner.spawn(
        led_task(
            SimulatedLed::default(),
            subsystem.state(),
            subsystem.receiver(),
        )
        .unwrap(),
    );
    spawner.spawn(ingestion_task(serial, subsystem.sender(), subsystem.stats()).unwrap());
    spawner.spawn(telemetry_task(subsystem).unwrap());
}
