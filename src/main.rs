mod command;
mod config;
mod device;
mod error;
mod models;
mod parse;
mod serial;

use clap::Parser;
use log::{error, info};
use tokio::sync::mpsc;

use config::SensorConfig;
use device::Dlpth1c;
use models::{ReadingKind, Snapshot};

/// Queue depth between the polling session and the console consumer.
const SNAPSHOT_QUEUE_DEPTH: usize = 1;

/// Longest accepted letter combination: one letter per reading kind.
const MAX_COMMAND_LETTERS: usize = 10;

/// Continuous reader for the DLP-TH1C multi-sensor module
#[derive(Parser)]
#[command(name = "dlpth1c-reader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reading selection: "all", one command letter, or a combination of
    /// command letters
    command: Option<String>,
}

/// What the session polls and what the consumer prints.
#[derive(Debug, Clone, PartialEq)]
enum Mode {
    /// Batched polling, print every reading.
    All,
    /// Single-kind polling for one reading.
    Single(ReadingKind),
    /// Batched polling, print only the requested kinds in argument order.
    Subset(Vec<ReadingKind>),
}

/// Map the command argument to a polling mode, `None` when it is not
/// recognized.
fn parse_mode(argument: &str) -> Option<Mode> {
    if argument == "all" {
        return Some(Mode::All);
    }
    if argument.is_empty() || argument.len() > MAX_COMMAND_LETTERS {
        return None;
    }

    let mut kinds = Vec::new();
    for byte in argument.bytes() {
        kinds.push(ReadingKind::from_command(byte)?);
    }

    if kinds.len() == 1 {
        Some(Mode::Single(kinds[0]))
    } else {
        Some(Mode::Subset(kinds))
    }
}

/// Print the command table when the argument is missing or not recognized.
fn usage() {
    println!();
    println!("===============================================================");
    println!("USAGE: dlpth1c-reader COMMAND");
    println!();
    println!("all\t\tread every sensor together (one cycle takes 30 secs)");
    println!("t\t\tread temperature");
    println!("h\t\tread relative humidity");
    println!("p\t\tread pressure");
    println!("a\t\tread tilt");
    println!("x\t\tread X-axis vibration spectrum");
    println!("v\t\tread Y-axis vibration spectrum");
    println!("w\t\tread Z-axis vibration spectrum");
    println!("l\t\tread light level");
    println!("f\t\tread sound spectrum");
    println!("b\t\tread broadband sound level");
    println!();
    println!("Command letters combine into one argument, e.g. 'thp';");
    println!("combined reads also take 30 secs per cycle.");
    println!("===============================================================");
    println!();
}

/// Print every snapshot the session publishes.
///
/// With a filter, only the requested kinds are printed, in the order they
/// were requested; kinds a partial snapshot is missing are skipped.
async fn print_snapshots(
    mut snapshots: mpsc::Receiver<Snapshot>,
    filter: Option<Vec<ReadingKind>>,
) {
    while let Some(snapshot) = snapshots.recv().await {
        let kinds: &[ReadingKind] = match &filter {
            Some(kinds) => kinds,
            None => &ReadingKind::ALL,
        };
        for kind in kinds {
            if let Some(reading) = snapshot.readings.get(kind) {
                println!("{}", reading);
            }
        }
        println!("Time: {}\n", snapshot.formatted_time());
    }
}

async fn run(config: SensorConfig, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = Dlpth1c::open(config.clone()).await?;

    if let Some(range) = config.accel_range {
        device.set_accelerometer_range(range).await?;
        info!("Accelerometer range selected: {:?}", range);
    }

    let (tx, rx) = mpsc::channel(SNAPSHOT_QUEUE_DEPTH);
    let filter = match &mode {
        Mode::Subset(kinds) => Some(kinds.clone()),
        _ => None,
    };
    let consumer = tokio::spawn(print_snapshots(rx, filter));

    // Vibration requests go through the guarded axis path
    let result = match mode {
        Mode::All | Mode::Subset(_) => device.poll_all(tx).await,
        Mode::Single(kind) => match kind {
            ReadingKind::VibrationX | ReadingKind::VibrationY | ReadingKind::VibrationZ => {
                device.poll_vibration(kind.command(), tx).await
            }
            _ => device.poll_single(kind, tx).await,
        },
    };

    // The session dropped its sender, so the consumer drains and exits
    let _ = consumer.await;
    result
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let mode = match cli.command.as_deref().and_then(parse_mode) {
        Some(mode) => mode,
        None => {
            usage();
            return Ok(());
        }
    };

    // Load configuration
    let config = match SensorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run the polling session or wait for shutdown signal
    tokio::select! {
        result = run(config, mode) => {
            match result {
                Ok(_) => info!("Reader completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Reader terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_all() {
        assert_eq!(parse_mode("all"), Some(Mode::All));
    }

    #[test]
    fn test_parse_mode_single_letters() {
        assert_eq!(
            parse_mode("t"),
            Some(Mode::Single(ReadingKind::Temperature))
        );
        assert_eq!(parse_mode("f"), Some(Mode::Single(ReadingKind::Sound)));
        assert_eq!(
            parse_mode("w"),
            Some(Mode::Single(ReadingKind::VibrationZ))
        );
    }

    #[test]
    fn test_parse_mode_combination_keeps_argument_order() {
        assert_eq!(
            parse_mode("blt"),
            Some(Mode::Subset(vec![
                ReadingKind::Broadband,
                ReadingKind::Light,
                ReadingKind::Temperature,
            ]))
        );
    }

    #[test]
    fn test_parse_mode_accepts_all_ten_letters() {
        assert_eq!(
            parse_mode("thpaxvwlfb"),
            Some(Mode::Subset(ReadingKind::ALL.to_vec()))
        );
    }

    #[test]
    fn test_parse_mode_rejects_unknown_input() {
        assert_eq!(parse_mode(""), None);
        assert_eq!(parse_mode("q"), None);
        assert_eq!(parse_mode("tq"), None);
        // Range selection commands are not readings
        assert_eq!(parse_mode("m"), None);
        // Eleven letters is one too many
        assert_eq!(parse_mode("thpaxvwlfbt"), None);
    }
}
