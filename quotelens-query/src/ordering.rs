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

//! Deterministic category axis ordering
//!
//! Author and tag axes are sorted ascending by string value and deduplicated,
//! independent of input order. The sentiment axis is always
//! Positive, Neutral, Negative.

use quotelens_core::{Record, Sentiment};
use serde::Serialize;
use std::collections::BTreeSet;

/// Sort and deduplicate category values
pub fn sorted_axis<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Distinct authors in ascending order
pub fn author_axis(records: &[Record]) -> Vec<String> {
    sorted_axis(records.iter().map(|r| r.author.as_str()))
}

/// Distinct tags in ascending order
pub fn tag_axis(records: &[Record]) -> Vec<String> {
    sorted_axis(records.iter().flat_map(|r| r.tags.iter().map(String::as_str)))
}

pub fn sentiment_axis() -> [Sentiment; 3] {
    Sentiment::ALL
}

/// Category orders handed to the renderer alongside chart data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOrders {
    pub author: Vec<String>,
    pub tag: Vec<String>,
    pub sentiment: [Sentiment; 3],
}

impl CategoryOrders {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            author: author_axis(records),
            tag: tag_axis(records),
            sentiment: sentiment_axis(),
        }
    }
}
