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

//! Sentiment labels
//!
//! The label set is closed. Variant declaration order is the semantic axis
//! order (Positive, Neutral, Negative) and `Ord` follows it, so any ordered
//! collection keyed by `Sentiment` iterates in chart order.

use crate::error::{QuoteLensError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Three-way sentiment classification of a quote
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Fixed display order shared by every chart axis
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Palette color used for this sentiment on every chart
    pub fn color(&self) -> &'static str {
        match self {
            Sentiment::Positive => "#2ecc71",
            Sentiment::Neutral => "#3498db",
            Sentiment::Negative => "#e74c3c",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = QuoteLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Positive" => Ok(Sentiment::Positive),
            "Neutral" => Ok(Sentiment::Neutral),
            "Negative" => Ok(Sentiment::Negative),
            other => Err(QuoteLensError::InvalidSentiment(other.to_string())),
        }
    }
}
