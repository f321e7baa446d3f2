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

//! Hierarchical count flattening
//!
//! Path-based charts (sunburst, treemap) consume `{path, count}` rows. Nested
//! counts are reshaped into those rows without re-summing: each leaf becomes
//! exactly one row carrying its count unchanged.

use crate::aggregation::{check_arity, Category, CountTable, GroupKey};
use crate::error::{QueryError, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A level of a nested count structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountNode {
    Leaf(u64),
    Branch(BTreeMap<Category, CountNode>),
}

/// Nested mapping `category -> category -> ... -> count`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedCounts {
    root: BTreeMap<Category, CountNode>,
}

impl NestedCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nest a count table by key position
    pub fn from_table(table: &CountTable) -> Result<Self> {
        let mut nested = Self::new();
        for (key, count) in table.iter() {
            nested.add(key.parts(), count)?;
        }
        Ok(nested)
    }

    /// Add `count` to the leaf at `path`, creating intermediate levels as needed
    ///
    /// Fails if the path would end on an existing branch or pass through an
    /// existing leaf.
    pub fn add(&mut self, path: &[Category], count: u64) -> Result<()> {
        let (last, prefix) = path.split_last().ok_or(QueryError::InvalidArity(0))?;

        let mut level = &mut self.root;
        for (depth, part) in prefix.iter().enumerate() {
            let node = level
                .entry(part.clone())
                .or_insert_with(|| CountNode::Branch(BTreeMap::new()));
            level = match node {
                CountNode::Branch(children) => children,
                CountNode::Leaf(_) => {
                    return Err(QueryError::RaggedHierarchy {
                        expected: path.len(),
                        found: depth + 1,
                    })
                }
            };
        }

        match level.entry(last.clone()).or_insert(CountNode::Leaf(0)) {
            CountNode::Leaf(n) => {
                *n += count;
                Ok(())
            }
            CountNode::Branch(_) => Err(QueryError::RaggedHierarchy {
                expected: path.len(),
                found: path.len() + 1,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level entries
    pub fn children(&self) -> &BTreeMap<Category, CountNode> {
        &self.root
    }
}

/// One leaf of a hierarchy: its containment chain and its count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRow {
    pub path: Vec<Category>,
    pub count: u64,
}

impl Serialize for PathRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let labels: Vec<&str> = self.path.iter().map(Category::label).collect();
        let mut row = serializer.serialize_struct("PathRow", 2)?;
        row.serialize_field("path", &labels)?;
        row.serialize_field("count", &self.count)?;
        row.end()
    }
}

/// Flatten nested counts into one row per leaf
///
/// Every leaf must sit at the same depth; a ragged structure is rejected.
pub fn flatten(nested: &NestedCounts) -> Result<Vec<PathRow>> {
    let mut rows = Vec::new();
    let mut path = Vec::new();
    let mut depth = None;
    walk(&nested.root, &mut path, &mut depth, &mut rows)?;
    Ok(rows)
}

fn walk(
    level: &BTreeMap<Category, CountNode>,
    path: &mut Vec<Category>,
    depth: &mut Option<usize>,
    rows: &mut Vec<PathRow>,
) -> Result<()> {
    for (category, node) in level {
        path.push(category.clone());
        match node {
            CountNode::Leaf(count) => {
                let expected = *depth.get_or_insert(path.len());
                if expected != path.len() {
                    return Err(QueryError::RaggedHierarchy {
                        expected,
                        found: path.len(),
                    });
                }
                rows.push(PathRow {
                    path: path.clone(),
                    count: *count,
                });
            }
            CountNode::Branch(children) => walk(children, path, depth, rows)?,
        }
        path.pop();
    }
    Ok(())
}

/// Flatten a count table directly, one row per key
pub fn flatten_table(table: &CountTable) -> Vec<PathRow> {
    table
        .iter()
        .map(|(key, count)| PathRow {
            path: key.parts().to_vec(),
            count,
        })
        .collect()
}

/// Sum flattened rows back into a count table keyed by path
///
/// `arity` is the hierarchy depth; every row's path must have that length.
/// It is passed explicitly so an empty row set keeps the depth of the table
/// it was flattened from.
pub fn reaggregate(rows: &[PathRow], arity: usize) -> Result<CountTable> {
    check_arity(arity)?;

    let mut counts: BTreeMap<GroupKey, u64> = BTreeMap::new();
    for row in rows {
        if row.path.len() != arity {
            return Err(QueryError::RaggedHierarchy {
                expected: arity,
                found: row.path.len(),
            });
        }
        *counts.entry(GroupKey::new(row.path.clone())?).or_insert(0) += row.count;
    }
    Ok(CountTable::from_counts(arity, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{aggregate, Dimension};
    use proptest::prelude::*;
    use quotelens_core::{Record, Sentiment};

    fn records() -> Vec<Record> {
        vec![
            Record::new("A", Sentiment::Positive).tags(["x"]),
            Record::new("A", Sentiment::Negative).tags(["x", "y"]),
            Record::new("B", Sentiment::Positive).tags(["x"]),
        ]
    }

    #[test]
    fn test_flatten_three_levels() {
        let table = aggregate(
            &records(),
            &[Dimension::Author, Dimension::Tag, Dimension::Sentiment],
        )
        .unwrap();
        let rows = flatten(&NestedCounts::from_table(&table).unwrap()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            PathRow {
                path: vec![
                    Category::author("A"),
                    Category::tag("x"),
                    Sentiment::Positive.into()
                ],
                count: 1,
            }
        );
        assert!(rows.iter().all(|r| r.path.len() == 3));
        assert_eq!(rows.iter().map(|r| r.count).sum::<u64>(), 4);
    }

    #[test]
    fn test_flatten_single_level() {
        let table = aggregate(&records(), &[Dimension::Author]).unwrap();
        let rows = flatten(&NestedCounts::from_table(&table).unwrap()).unwrap();
        assert_eq!(rows, flatten_table(&table));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&NestedCounts::new()).unwrap().is_empty());
        assert!(NestedCounts::from_table(&aggregate(&[], &[Dimension::Author]).unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reaggregate_empty_keeps_depth() {
        // Nobody is tagged, so the author/tag/sentiment table has no rows
        let records = vec![Record::new("A", Sentiment::Positive)];
        let table = aggregate(
            &records,
            &[Dimension::Author, Dimension::Tag, Dimension::Sentiment],
        )
        .unwrap();
        let rows = flatten(&NestedCounts::from_table(&table).unwrap()).unwrap();
        assert!(rows.is_empty());

        let back = reaggregate(&rows, table.arity()).unwrap();
        assert_eq!(back.arity(), 3);
        assert_eq!(back, table);
    }

    #[test]
    fn test_reaggregate_checks_depth() {
        let rows = flatten_table(&aggregate(&records(), &[Dimension::Author]).unwrap());
        assert!(matches!(
            reaggregate(&rows, 2),
            Err(QueryError::RaggedHierarchy {
                expected: 2,
                found: 1,
            })
        ));
        assert!(matches!(reaggregate(&[], 0), Err(QueryError::InvalidArity(0))));
        assert!(matches!(reaggregate(&[], 4), Err(QueryError::InvalidArity(4))));
    }

    #[test]
    fn test_add_accumulates() {
        let mut nested = NestedCounts::new();
        let path = [Category::author("A"), Category::tag("x")];
        nested.add(&path, 2).unwrap();
        nested.add(&path, 3).unwrap();
        let rows = flatten(&nested).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 5);
    }

    #[test]
    fn test_add_rejects_conflicting_depths() {
        let mut nested = NestedCounts::new();
        nested.add(&[Category::author("A")], 1).unwrap();
        assert!(matches!(
            nested.add(&[Category::author("A"), Category::tag("x")], 1),
            Err(QueryError::RaggedHierarchy { .. })
        ));
        assert!(nested.add(&[], 1).is_err());
    }

    #[test]
    fn test_ragged_structure_rejected() {
        let mut nested = NestedCounts::new();
        nested.add(&[Category::author("A"), Category::tag("x")], 1).unwrap();
        nested.add(&[Category::author("B")], 1).unwrap();
        assert!(matches!(
            flatten(&nested),
            Err(QueryError::RaggedHierarchy {
                expected: 2,
                found: 1,
            })
        ));
    }

    #[test]
    fn test_path_row_serialization() {
        let row = PathRow {
            path: vec![Category::author("A"), Sentiment::Neutral.into()],
            count: 4,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({"path": ["A", "Neutral"], "count": 4})
        );
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::sample::select(Sentiment::ALL.to_vec()),
            prop::collection::vec(prop::sample::select(vec!["x", "y", "z"]), 0..3),
        )
            .prop_map(|(author, sentiment, tags)| Record::new(author, sentiment).tags(tags))
    }

    proptest! {
        #[test]
        fn prop_flatten_then_reaggregate_is_identity(
            records in prop::collection::vec(arb_record(), 0..30)
        ) {
            let table = aggregate(
                &records,
                &[Dimension::Author, Dimension::Tag, Dimension::Sentiment],
            ).unwrap();
            let rows = flatten(&NestedCounts::from_table(&table).unwrap()).unwrap();
            prop_assert_eq!(reaggregate(&rows, table.arity()).unwrap(), table);
        }
    }
}
