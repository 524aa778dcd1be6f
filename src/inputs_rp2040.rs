use embassy_rp::uart::{BufferedUartRx, Error};
use embedded_io_async::{ErrorType, Read};

use crate::ingestion::{CommandIngestor, IngestionStats, SerialTransport};
use crate::CommandSender;

/// Command transport on the interrupt-driven, buffered UART receiver.
pub struct UartTransport {
    rx: BufferedUartRx,
}

impl UartTransport {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl ErrorType for UartTransport {
    type Error = Error;
}

impl Read for UartTransport {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.rx.read(buf).await
    }
}

impl SerialTransport for UartTransport {}

#[embassy_executor::task]
pub async fn ingestion_task(
    transport: UartTransport,
    commands: CommandSender<'static>,
    stats: &'static IngestionStats,
) -> ! {
    CommandIngestor::new(transport, commands, stats).run().await
}
