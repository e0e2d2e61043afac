/// Concurrent decoding of the batched read-all response
use std::collections::HashMap;

use log::warn;
use time::OffsetDateTime;
use tokio::sync::mpsc;

use crate::error::DecodeError;
use crate::models::{ReadingKind, Snapshot};
use crate::parse::{decode_reading, latin1_text};

/// Lines one spectral reading occupies in the aggregate response: six band
/// lines plus the separator line the device injects ahead of them.
const SPECTRAL_GROUP_LINES: usize = 7;

/// Minimum line count of a complete aggregate response: one line for each
/// of the six single-line readings, seven for each of the four spectral
/// readings. Shorter responses cannot hold all ten fields.
pub const MIN_AGGREGATE_LINES: usize = 34;

/// Lines the given reading occupies in the aggregate response.
fn group_lines(kind: ReadingKind) -> usize {
    match kind {
        ReadingKind::VibrationX
        | ReadingKind::VibrationY
        | ReadingKind::VibrationZ
        | ReadingKind::Sound => SPECTRAL_GROUP_LINES,
        _ => 1,
    }
}

/// Decode one aggregate response into a snapshot.
///
/// The response is split on newlines and sliced into per-reading line groups
/// in wire order. Every group is decoded on its own task; the tasks report
/// through one channel back to this function, which is the only writer of
/// the snapshot map. A group that fails to decode is logged and left out of
/// the snapshot, so one mangled field does not cost the cycle the other
/// nine. Only a response too short to hold all ten groups fails the cycle
/// as a whole.
pub async fn decode_all(raw: &[u8], time: OffsetDateTime) -> Result<Snapshot, DecodeError> {
    let text = latin1_text(raw);
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < MIN_AGGREGATE_LINES {
        return Err(DecodeError::data_missing(&text));
    }

    // Fan the line groups out to one decode task each
    let (sender, mut receiver) = mpsc::channel(ReadingKind::ALL.len());
    let mut offset = 0;
    for kind in ReadingKind::ALL {
        let group = lines[offset..offset + group_lines(kind)].join("\n");
        offset += group_lines(kind);

        let sender = sender.clone();
        tokio::spawn(async move {
            // The receiver outlives every task, so the send cannot fail
            let _ = sender.send((kind, decode_reading(kind, &group))).await;
        });
    }
    drop(sender);

    // Merge task results; this loop is the only writer of the map and ends
    // once all ten tasks have reported
    let mut readings = HashMap::new();
    while let Some((kind, result)) = receiver.recv().await {
        match result {
            Ok(reading) => {
                readings.insert(kind, reading);
            }
            Err(error) => {
                warn!("Failed to decode {} from aggregate response: {}", kind, error);
            }
        }
    }

    Ok(Snapshot { time, readings })
}
