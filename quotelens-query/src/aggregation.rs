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

//! Grouping aggregation over quote records
//!
//! Records are bucketed by 1 to 3 categorical dimensions and counted. A
//! dimension may yield several values per record (one per tag), in which case
//! the record contributes one tally per combination. Only observed
//! combinations are stored; lookups of anything else go through
//! [`CountTable::count_or_default`].

use crate::error::{QueryError, Result};
use quotelens_core::{Record, Sentiment};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of dimensions in a group key
pub const MAX_KEY_ARITY: usize = 3;

/// Categorical dimension a record can be grouped by
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Author,
    Tag,
    Sentiment,
}

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Author => "author",
            Dimension::Tag => "tag",
            Dimension::Sentiment => "sentiment",
        }
    }
}

/// A category value tagged with the dimension it belongs to
///
/// Authors, tags and sentiments never compare equal to each other even when
/// their labels coincide.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum Category {
    Author(String),
    Tag(String),
    Sentiment(Sentiment),
}

impl Category {
    pub fn author(name: impl Into<String>) -> Self {
        Category::Author(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Category::Tag(name.into())
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Category::Author(_) => Dimension::Author,
            Category::Tag(_) => Dimension::Tag,
            Category::Sentiment(_) => Dimension::Sentiment,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Author(name) | Category::Tag(name) => name,
            Category::Sentiment(s) => s.as_str(),
        }
    }
}

impl From<Sentiment> for Category {
    fn from(s: Sentiment) -> Self {
        Category::Sentiment(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extracts the category values a record contributes to one grouping dimension
pub trait KeyExtractor {
    fn extract(&self, record: &Record) -> Vec<Category>;
}

impl KeyExtractor for Dimension {
    fn extract(&self, record: &Record) -> Vec<Category> {
        match self {
            Dimension::Author => vec![Category::Author(record.author.clone())],
            Dimension::Tag => record.tags.iter().cloned().map(Category::Tag).collect(),
            Dimension::Sentiment => vec![Category::Sentiment(record.sentiment)],
        }
    }
}

impl<F> KeyExtractor for F
where
    F: Fn(&Record) -> Vec<Category>,
{
    fn extract(&self, record: &Record) -> Vec<Category> {
        self(record)
    }
}

/// Ordered tuple of 1 to 3 category values, each from a different dimension
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct GroupKey(Vec<Category>);

impl GroupKey {
    pub fn new(parts: Vec<Category>) -> Result<Self> {
        check_arity(parts.len())?;
        for (i, part) in parts.iter().enumerate() {
            let dim = part.dimension();
            if parts[..i].iter().any(|p| p.dimension() == dim) {
                return Err(QueryError::DuplicateDimension(dim.name()));
            }
        }
        Ok(GroupKey(parts))
    }

    pub fn parts(&self) -> &[Category] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn into_parts(self) -> Vec<Category> {
        self.0
    }
}

impl From<Category> for GroupKey {
    fn from(a: Category) -> Self {
        GroupKey(vec![a])
    }
}

impl From<(Category, Category)> for GroupKey {
    fn from((a, b): (Category, Category)) -> Self {
        GroupKey(vec![a, b])
    }
}

impl From<(Category, Category, Category)> for GroupKey {
    fn from((a, b, c): (Category, Category, Category)) -> Self {
        GroupKey(vec![a, b, c])
    }
}

pub(crate) fn check_arity(arity: usize) -> Result<()> {
    if arity == 0 || arity > MAX_KEY_ARITY {
        return Err(QueryError::InvalidArity(arity));
    }
    Ok(())
}

/// Immutable mapping from group key to observed count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    arity: usize,
    counts: BTreeMap<GroupKey, u64>,
}

impl CountTable {
    pub(crate) fn from_counts(arity: usize, counts: BTreeMap<GroupKey, u64>) -> Self {
        Self { arity, counts }
    }

    /// Number of dimensions in every key of this table
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for an observed key, `None` if the combination never occurred
    pub fn get(&self, key: &GroupKey) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Count for a key, zero if the combination never occurred
    pub fn count_or_default(&self, key: &GroupKey) -> u64 {
        self.get(key).unwrap_or(0)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Flat `{dimension.., count}` rows in key order
    pub fn rows(&self) -> Vec<FlatRow> {
        self.iter()
            .map(|(key, count)| FlatRow {
                key: key.clone(),
                count,
            })
            .collect()
    }
}

/// Free-function form of [`CountTable::count_or_default`]
pub fn count_or_default(table: &CountTable, key: &GroupKey) -> u64 {
    table.count_or_default(key)
}

/// One tabular row: the key's category values plus their count
///
/// Serializes as a flat object keyed by dimension name, e.g.
/// `{"author": "A", "sentiment": "Positive", "count": 2}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub key: GroupKey,
    pub count: u64,
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key.arity() + 1))?;
        for part in self.key.parts() {
            map.serialize_entry(part.dimension().name(), part.label())?;
        }
        map.serialize_entry("count", &self.count)?;
        map.end()
    }
}

/// Group records by the given dimensions and count each observed combination
///
/// Each dimension may appear at most once, so tag never expands twice for the
/// same record.
pub fn aggregate(records: &[Record], dimensions: &[Dimension]) -> Result<CountTable> {
    for (i, dim) in dimensions.iter().enumerate() {
        if dimensions[..i].contains(dim) {
            return Err(QueryError::DuplicateDimension(dim.name()));
        }
    }
    let extractors: Vec<&dyn KeyExtractor> =
        dimensions.iter().map(|d| d as &dyn KeyExtractor).collect();
    aggregate_with(records, &extractors)
}

/// Group records by arbitrary key extractors
///
/// A record contributes one tally for every element of the Cartesian product
/// of its extracted values; if any extractor yields nothing, it contributes none.
/// Fails if two extractors produce values of the same dimension for one record.
pub fn aggregate_with(records: &[Record], extractors: &[&dyn KeyExtractor]) -> Result<CountTable> {
    check_arity(extractors.len())?;

    let mut counts: BTreeMap<GroupKey, u64> = BTreeMap::new();
    for record in records {
        let values: Vec<Vec<Category>> = extractors.iter().map(|e| e.extract(record)).collect();
        for combo in cartesian(&values) {
            *counts.entry(GroupKey::new(combo)?).or_insert(0) += 1;
        }
    }

    Ok(CountTable::from_counts(extractors.len(), counts))
}

fn cartesian(values: &[Vec<Category>]) -> Vec<Vec<Category>> {
    let mut combos: Vec<Vec<Category>> = vec![Vec::with_capacity(values.len())];
    for options in values {
        combos = combos
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |value| {
                    let mut next = prefix.clone();
                    next.push(value.clone());
                    next
                })
            })
            .collect();
    }
    combos
}
