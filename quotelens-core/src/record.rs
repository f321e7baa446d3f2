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

//! Canonical quote records and the normalizer that produces them
//!
//! Raw records arrive as loosely-typed JSON objects. The normalizer is the
//! only place defaults are applied; everything downstream works on `Record`.

use crate::classifier::SentimentClassifier;
use crate::config::{AnalysisConfig, NormalizerConfig, DEFAULT_AUTHOR};
use crate::error::{QuoteLensError, Result};
use crate::sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-band polarity breakdown reported by the upstream analyzer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// One normalized quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Compound polarity in [-1.0, 1.0], when the upstream analyzer supplied one
    #[serde(rename = "compound", default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<f64>,
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<PolarityScores>,
}

impl Record {
    pub fn new(author: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: String::new(),
            author: author.into(),
            tags: Vec::new(),
            polarity: None,
            sentiment,
            scores: None,
        }
    }

    /// Set quote text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set compound polarity
    pub fn polarity(mut self, compound: f64) -> Self {
        self.polarity = Some(compound);
        self
    }
}

/// Turns raw JSON objects into canonical records
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    config: NormalizerConfig,
    classifier: SentimentClassifier,
}

impl RecordNormalizer {
    pub fn new(config: NormalizerConfig, classifier: SentimentClassifier) -> Self {
        Self { config, classifier }
    }

    /// Build a normalizer from an analysis config, validating it first
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let classifier = SentimentClassifier::new(&config.classifier)?;
        Ok(Self::new(config.normalizer.clone(), classifier))
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Normalize one raw record
    ///
    /// Absent or null fields take their defaults. A `sentiment` label that is
    /// already present wins over the polarity score; otherwise the score is
    /// classified, and with neither present the configured default applies.
    pub fn normalize(&self, raw: &Value) -> Result<Record> {
        let obj = raw
            .as_object()
            .ok_or_else(|| QuoteLensError::structural("record", "must be a JSON object"))?;

        let text = optional_str(obj, "text")?.unwrap_or_default().to_string();
        let author = self.author(optional_str(obj, "author")?);
        let tags = tags(obj)?;
        let scores = scores(obj)?;
        let polarity = match optional_f64(obj, "compound")? {
            Some(c) => Some(c),
            None => match optional_f64(obj, "polarity")? {
                Some(c) => Some(c),
                None => scores.map(|s| s.compound),
            },
        };

        let sentiment = match optional_str(obj, "sentiment")? {
            Some(label) => label.parse::<Sentiment>()?,
            None => self
                .classifier
                .classify_or(polarity, self.config.default_sentiment),
        };

        Ok(Record {
            text,
            author,
            tags,
            polarity,
            sentiment,
            scores,
        })
    }

    /// Normalize a batch, failing on the first structurally invalid element
    pub fn normalize_all(&self, raw: &[Value]) -> Result<Vec<Record>> {
        raw.iter()
            .enumerate()
            .map(|(i, value)| self.normalize(value).map_err(|e| e.at_index(i)))
            .collect()
    }

    fn author(&self, author: Option<&str>) -> String {
        let missing = match author {
            None => true,
            Some(a) => a.is_empty() || (self.config.blank_author_is_missing && a.trim().is_empty()),
        };
        match author {
            Some(a) if !missing => a.to_string(),
            _ if self.config.default_author.is_empty() => DEFAULT_AUTHOR.to_string(),
            _ => self.config.default_author.clone(),
        }
    }
}

fn optional_str<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(QuoteLensError::structural(field, "must be a string")),
    }
}

fn optional_f64(obj: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| QuoteLensError::structural(field, "must be a number")),
    }
}

fn tags(obj: &Map<String, Value>) -> Result<Vec<String>> {
    match obj.get("tags") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| QuoteLensError::structural("tags", "must be a list of strings"))
            })
            .collect(),
        Some(_) => Err(QuoteLensError::structural("tags", "must be a list of strings")),
    }
}

fn scores(obj: &Map<String, Value>) -> Result<Option<PolarityScores>> {
    match obj.get("scores") {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| QuoteLensError::structural("scores", e.to_string())),
        Some(_) => Err(QuoteLensError::structural("scores", "must be an object")),
    }
}
