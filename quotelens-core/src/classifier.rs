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

//! Compound score classification

use crate::config::{ClassifierConfig, DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD};
use crate::error::Result;
use crate::sentiment::Sentiment;

/// Maps a compound polarity score onto the three sentiment bands
///
/// Total over every `f64`: NaN compares false against both bounds and lands
/// in Neutral, infinities land in the outer bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentClassifier {
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self {
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl SentimentClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
        })
    }

    pub fn classify(&self, compound: f64) -> Sentiment {
        if compound >= self.positive_threshold {
            Sentiment::Positive
        } else if compound <= self.negative_threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Classify an optional score, falling back when it is absent
    pub fn classify_or(&self, compound: Option<f64>, fallback: Sentiment) -> Sentiment {
        compound.map_or(fallback, |c| self.classify(c))
    }
}

/// Classify with the default ±0.05 thresholds
pub fn classify(compound: f64) -> Sentiment {
    SentimentClassifier::default().classify(compound)
}
