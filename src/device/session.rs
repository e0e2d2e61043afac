/// Polling session driving the request, settle, drain, decode, publish cycle
use std::error::Error;

use log::{debug, info, warn};
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::command::{AccelerometerRange, AGGREGATE_REQUEST};
use crate::config::SensorConfig;
use crate::device::aggregate::decode_all;
use crate::models::{ReadingKind, Snapshot, VibrationAxis};
use crate::parse::{decode_reading, latin1_text};
use crate::serial::SerialLink;

/// An open polling session with the sensor.
pub struct Dlpth1c {
    link: SerialLink,
    config: SensorConfig,
}

impl Dlpth1c {
    /// Open the sensor on its configured serial port.
    pub async fn open(config: SensorConfig) -> Result<Self, Box<dyn Error>> {
        let link = SerialLink::open(&config.port, config.baud_rate, config.read_idle_window)
            .await
            .map_err(|e| format!("Failed to open serial port {}: {}", config.port, e))?;

        info!(
            "Connected to DLP-TH1C on {} at {} baud",
            config.port, config.baud_rate
        );
        Ok(Dlpth1c { link, config })
    }

    /// Poll one reading kind forever, publishing a one-entry snapshot per
    /// cycle.
    ///
    /// Single-kind reads are strict: a response that fails to decode means
    /// the cycle's data was lost or mangled, and the session ends with that
    /// error rather than republishing stale values. Returns cleanly once
    /// the consumer hangs up.
    pub async fn poll_single(
        &mut self,
        kind: ReadingKind,
        out: mpsc::Sender<Snapshot>,
    ) -> Result<(), Box<dyn Error>> {
        info!("Polling {} readings", kind);
        loop {
            self.link.write(&[kind.command()]).await?;
            let requested_at = OffsetDateTime::now_utc();

            // Give the device time to sample and answer before draining
            sleep(self.config.single_settle).await;

            let raw = self.link.read_until_idle().await?;
            let reading = decode_reading(kind, &latin1_text(&raw))?;
            debug!("Decoded {} from {} byte(s)", kind, raw.len());

            if out.send(Snapshot::single(requested_at, reading)).await.is_err() {
                return Ok(());
            }
        }
    }

    /// Poll one vibration axis forever.
    ///
    /// The command byte must be one of the three axis commands; anything
    /// else is rejected before the port is touched.
    pub async fn poll_vibration(
        &mut self,
        command: u8,
        out: mpsc::Sender<Snapshot>,
    ) -> Result<(), Box<dyn Error>> {
        let axis = VibrationAxis::from_command(command)?;
        self.poll_single(axis.kind(), out).await
    }

    /// Poll all ten readings forever with the batched request, publishing
    /// one merged snapshot per cycle.
    ///
    /// A response too short to hold all ten fields is dropped and the next
    /// cycle retried; decode failures inside individual fields are already
    /// absorbed by the merge. Only transport errors end the session.
    pub async fn poll_all(&mut self, out: mpsc::Sender<Snapshot>) -> Result<(), Box<dyn Error>> {
        info!("Polling all readings");
        loop {
            self.link.write(&AGGREGATE_REQUEST).await?;
            let requested_at = OffsetDateTime::now_utc();

            // The full batch takes far longer than any single reading
            sleep(self.config.aggregate_settle).await;

            let raw = self.link.read_until_idle().await?;
            match decode_all(&raw, requested_at).await {
                Ok(snapshot) => {
                    debug!(
                        "Decoded {} of {} readings from {} byte(s)",
                        snapshot.readings.len(),
                        ReadingKind::ALL.len(),
                        raw.len()
                    );
                    if out.send(snapshot).await.is_err() {
                        return Ok(());
                    }
                }
                Err(error) => {
                    warn!("Discarding aggregate cycle of {} byte(s): {}", raw.len(), error);
                }
            }
        }
    }

    /// Select the accelerometer's full-scale range for the vibration
    /// readings. The device acknowledges with a few unparseable bytes,
    /// which are drained and discarded.
    pub async fn set_accelerometer_range(
        &mut self,
        range: AccelerometerRange,
    ) -> Result<(), Box<dyn Error>> {
        self.link.write(&[range.command()]).await?;
        sleep(self.config.single_settle).await;

        let ack = self.link.read_until_idle().await?;
        debug!("Range selection acknowledged with {} byte(s)", ack.len());
        Ok(())
    }
}
