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

//! Configuration for classification and record normalization
//!
//! All sections default to the standard compound-score cutoffs and field
//! defaults, so an empty TOML document is a valid configuration.

use crate::error::{QuoteLensError, Result};
use crate::sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compound score at or above which a quote is Positive
pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a quote is Negative
pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = -0.05;

/// Author assigned to records with no usable author
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Thresholds for the three-way compound score classification
///
/// Both bounds are inclusive: `score >= positive_threshold` is Positive,
/// `score <= negative_threshold` is Negative, everything between is Neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub positive_threshold: f64,
    pub negative_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl ClassifierConfig {
    /// Create a config with custom bounds
    pub fn custom(positive_threshold: f64, negative_threshold: f64) -> Self {
        Self {
            positive_threshold,
            negative_threshold,
        }
    }

    /// Thresholds must be finite and strictly ordered so the bands never overlap
    pub fn validate(&self) -> Result<()> {
        if !self.positive_threshold.is_finite() || !self.negative_threshold.is_finite() {
            return Err(QuoteLensError::Config(
                "classifier thresholds must be finite".into(),
            ));
        }
        if self.negative_threshold >= self.positive_threshold {
            return Err(QuoteLensError::Config(format!(
                "negative_threshold ({}) must be below positive_threshold ({})",
                self.negative_threshold, self.positive_threshold
            )));
        }
        Ok(())
    }
}

/// Defaults applied by the record normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Author used when the field is absent, null or empty
    pub default_author: String,
    /// Sentiment used when neither a label nor a polarity score is present
    pub default_sentiment: Sentiment,
    /// Treat whitespace-only authors as missing
    pub blank_author_is_missing: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_author: DEFAULT_AUTHOR.to_string(),
            default_sentiment: Sentiment::Neutral,
            blank_author_is_missing: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub classifier: ClassifierConfig,
    pub normalizer: NormalizerConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QuoteLensError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        if self.normalizer.default_author.is_empty() {
            return Err(QuoteLensError::Config(
                "default_author must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.classifier.positive_threshold, 0.05);
        assert_eq!(config.classifier.negative_threshold, -0.05);
        assert_eq!(config.normalizer.default_author, "Unknown");
        assert_eq!(config.normalizer.default_sentiment, Sentiment::Neutral);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [classifier]
            positive_threshold = 0.2

            [normalizer]
            default_author = "Anonymous"
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.positive_threshold, 0.2);
        assert_eq!(config.classifier.negative_threshold, -0.05);
        assert_eq!(config.normalizer.default_author, "Anonymous");
        assert!(config.normalizer.blank_author_is_missing);
    }

    #[test]
    fn test_overlapping_thresholds_rejected() {
        let err = AnalysisConfig::from_toml_str(
            r#"
            [classifier]
            positive_threshold = -0.1
            negative_threshold = 0.1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, QuoteLensError::Config(_)));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let config = ClassifierConfig::custom(f64::NAN, -0.05);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = AnalysisConfig::from_toml_str("[classifier\n").unwrap_err();
        assert!(matches!(err, QuoteLensError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[normalizer]\ndefault_sentiment = \"Negative\"").unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.normalizer.default_sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AnalysisConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, QuoteLensError::Config(_)));
    }
}
