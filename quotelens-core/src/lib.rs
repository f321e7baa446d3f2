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

//! QuoteLens Core
//!
//! Quote records, the three-way sentiment classifier, and the normalizer
//! that turns loosely-typed input into canonical records.

pub mod classifier;
pub mod config;
pub mod error;
pub mod exchange;
pub mod record;
pub mod sentiment;

pub use classifier::{classify, SentimentClassifier};
pub use config::{
    AnalysisConfig, ClassifierConfig, NormalizerConfig, DEFAULT_AUTHOR,
    DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD,
};
pub use error::{QuoteLensError, Result};
pub use exchange::{annotate, decode_records, encode_records, read_records, write_records};
pub use record::{PolarityScores, Record, RecordNormalizer};
pub use sentiment::Sentiment;
