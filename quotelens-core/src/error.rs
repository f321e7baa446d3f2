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

//! QuoteLens error types
//!
//! Absent optional fields are never errors; they resolve to defaults in the
//! normalizer. Only container-shape violations and undecodable input surface here.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, QuoteLensError>;

/// Errors raised while reading, normalizing or configuring quote records
#[derive(Debug, Error)]
pub enum QuoteLensError {
    /// A field is present but has the wrong container or value type
    #[error("Structural input error{}: field `{}` {}", position(.index), .field, .reason)]
    Structural {
        /// Position of the offending record in its batch, when known
        index: Option<usize>,
        field: String,
        reason: String,
    },

    /// A sentiment label outside {Positive, Neutral, Negative}
    #[error("Invalid sentiment label: {0}")]
    InvalidSentiment(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn position(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at record {}", i),
        None => String::new(),
    }
}

impl QuoteLensError {
    /// Build a structural error for a field of a record whose position is not known yet
    pub fn structural(field: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteLensError::Structural {
            index: None,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attach the batch position to a structural error; other variants pass through
    pub fn at_index(self, at: usize) -> Self {
        match self {
            QuoteLensError::Structural { field, reason, .. } => QuoteLensError::Structural {
                index: Some(at),
                field,
                reason,
            },
            other => other,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, QuoteLensError::Structural { .. })
    }
}

impl From<serde_json::Error> for QuoteLensError {
    fn from(e: serde_json::Error) -> Self {
        QuoteLensError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for QuoteLensError {
    fn from(e: toml::de::Error) -> Self {
        QuoteLensError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_message_includes_position() {
        let err = QuoteLensError::structural("tags", "must be a list of strings").at_index(3);
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "Structural input error at record 3: field `tags` must be a list of strings"
        );
    }

    #[test]
    fn test_structural_message_without_position() {
        let err = QuoteLensError::structural("author", "must be a string");
        assert_eq!(
            err.to_string(),
            "Structural input error: field `author` must be a string"
        );
    }

    #[test]
    fn test_at_index_leaves_other_variants() {
        let err = QuoteLensError::InvalidSentiment("Meh".into()).at_index(1);
        assert!(!err.is_structural());
        assert_eq!(err.to_string(), "Invalid sentiment label: Meh");
    }
}
