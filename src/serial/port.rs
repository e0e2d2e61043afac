/// Serial transport to the sensor's virtual COM port
use std::io;
use std::time::Duration;

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Bytes requested per read while draining a response.
const READ_CHUNK_BYTES: usize = 256;

/// An open connection to the sensor. The port closes when the link is
/// dropped.
pub struct SerialLink {
    stream: SerialStream,
    idle_window: Duration,
}

impl SerialLink {
    /// Open a serial port with the sensor's fixed framing: 8 data bits,
    /// one stop bit, no parity, no flow control.
    ///
    /// # Arguments
    /// * `port` - Serial port path (e.g., "/dev/ttyACM0")
    /// * `baud_rate` - Baud rate of the virtual COM port
    /// * `idle_window` - How long a read waits for new bytes before the
    ///   response counts as complete
    pub async fn open(port: &str, baud_rate: u32, idle_window: Duration) -> io::Result<SerialLink> {
        debug!("Opening serial port: {}", port);

        let mut stream = tokio_serial::new(port, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()?;

        #[cfg(unix)]
        stream.set_exclusive(false)?;

        Ok(SerialLink {
            stream,
            idle_window,
        })
    }

    /// Write a request to the device and flush it out.
    pub async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        debug!("Sent {} byte(s)", bytes.len());
        Ok(())
    }

    /// Drain whatever the device is sending until it goes idle.
    ///
    /// Each read waits at most the idle window; the first window that
    /// passes without new bytes ends the drain, as does an EOF. Returns the
    /// accumulated raw bytes, which may be empty if the device stayed
    /// silent.
    pub async fn read_until_idle(&mut self) -> io::Result<Vec<u8>> {
        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_BYTES];

        loop {
            match timeout(self.idle_window, self.stream.read(&mut chunk)).await {
                // Port closed on the far side
                Ok(Ok(0)) => break,
                Ok(Ok(count)) => response.extend_from_slice(&chunk[..count]),
                Ok(Err(error)) => return Err(error),
                // Idle window passed with no new bytes
                Err(_) => break,
            }
        }

        debug!("Drained {} byte(s)", response.len());
        Ok(response)
    }
}
