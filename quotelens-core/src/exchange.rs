// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Processed-quotes exchange format
//!
//! A single JSON array of records, each shaped
//! `{text, author, tags, compound, sentiment, scores}`. Decoding runs every
//! element through the [`RecordNormalizer`]; encoding writes the canonical
//! record shape back out.

use crate::classifier::SentimentClassifier;
use crate::error::{QuoteLensError, Result};
use crate::record::{PolarityScores, Record, RecordNormalizer};
use serde_json::Value;
use std::io::{Read, Write};
use tracing::{debug, info};

/// Decode a JSON array of raw records
///
/// Aborts on the first structurally invalid element; no partial batch is returned.
pub fn decode_records(json: &str, normalizer: &RecordNormalizer) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(json)?;
    decode_value(value, normalizer)
}

/// Decode records from a reader
pub fn read_records<R: Read>(reader: R, normalizer: &RecordNormalizer) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_reader(reader)?;
    decode_value(value, normalizer)
}

fn decode_value(value: Value, normalizer: &RecordNormalizer) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(QuoteLensError::structural(
                "records",
                "top-level value must be a JSON array",
            ))
        }
    };

    let records = normalizer.normalize_all(&items)?;
    info!("Loaded {} quotes", records.len());
    Ok(records)
}

/// Encode records as pretty-printed JSON, preserving non-ASCII text
pub fn encode_records(records: &[Record]) -> Result<String> {
    let json = serde_json::to_string_pretty(records)?;
    debug!("Encoded {} quotes ({} bytes)", records.len(), json.len());
    Ok(json)
}

/// Encode records to a writer
pub fn write_records<W: Write>(mut writer: W, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    debug!("Wrote {} quotes", records.len());
    Ok(())
}

/// Attach externally computed polarity scores and classify each record
///
/// `scores[i]` belongs to `records[i]`. Any label already on a record is
/// replaced by the classification of its new compound score.
pub fn annotate(
    records: Vec<Record>,
    scores: &[PolarityScores],
    classifier: &SentimentClassifier,
) -> Result<Vec<Record>> {
    if records.len() != scores.len() {
        return Err(QuoteLensError::structural(
            "scores",
            format!(
                "expected {} score entries, got {}",
                records.len(),
                scores.len()
            ),
        ));
    }

    let annotated: Vec<Record> = records
        .into_iter()
        .zip(scores)
        .map(|(mut record, score)| {
            record.polarity = Some(score.compound);
            record.scores = Some(*score);
            record.sentiment = classifier.classify(score.compound);
            record
        })
        .collect();

    info!("Analyzed sentiment for {} quotes", annotated.len());
    Ok(annotated)
}
