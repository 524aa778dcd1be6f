use crate::ingestion::{CommandIngestor, IngestionStats};
use crate::serial_std::StdSerial;
use crate::CommandSender;

#[embassy_executor::task]
pub async fn ingestion_task(
    transport: StdSerial,
    commands: CommandSender<'static>,
    stats: &'static IngestionStats,
) -> ! {
    CommandIngestor::new(transport, commands, stats).run().await
}
