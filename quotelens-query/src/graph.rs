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

//! Author → sentiment → tag flow graph
//!
//! Nodes are laid out in three segments: sorted authors, the three sentiments
//! in axis order, then sorted tags. Edges come from two pairwise count tables,
//! `(author, sentiment)` and `(sentiment, tag)`, so every edge touches the
//! sentiment segment and no edge joins an author to a tag directly.
//!
//! Node identity is the typed [`Category`], so an author called "Positive"
//! gets its own node next to the sentiment of the same name.

use crate::aggregation::{aggregate, Category, CountTable, Dimension};
use crate::error::{QueryError, Result};
use crate::ordering::{author_axis, tag_axis};
use quotelens_core::{Record, Sentiment};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub label: String,
    pub kind: Dimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(skip)]
    author_count: usize,
}

impl FlowGraph {
    /// Index range occupied by one node segment
    pub fn segment(&self, kind: Dimension) -> Range<usize> {
        let sentiment_start = self.author_count;
        let tag_start = sentiment_start + Sentiment::ALL.len();
        match kind {
            Dimension::Author => 0..sentiment_start,
            Dimension::Sentiment => sentiment_start..tag_start,
            Dimension::Tag => tag_start..self.nodes.len(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    /// Position of a category's node
    pub fn index_of(&self, category: &Category) -> Option<usize> {
        let kind = category.dimension();
        self.segment(kind)
            .find(|&i| self.nodes[i].label == category.label())
    }
}

/// Build the flow graph for a record set
///
/// Empty input still yields the three sentiment nodes.
pub fn build_graph(records: &[Record]) -> Result<FlowGraph> {
    let authors = author_axis(records);
    let tags = tag_axis(records);

    let categories: Vec<Category> = authors
        .iter()
        .cloned()
        .map(Category::Author)
        .chain(Sentiment::ALL.into_iter().map(Category::Sentiment))
        .chain(tags.iter().cloned().map(Category::Tag))
        .collect();

    let index: HashMap<&Category, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c, i))
        .collect();

    let author_sentiment = aggregate(records, &[Dimension::Author, Dimension::Sentiment])?;
    let sentiment_tag = aggregate(records, &[Dimension::Sentiment, Dimension::Tag])?;

    let mut edges = Vec::with_capacity(author_sentiment.len() + sentiment_tag.len());
    push_edges(&author_sentiment, &index, &mut edges)?;
    push_edges(&sentiment_tag, &index, &mut edges)?;

    let nodes = categories
        .iter()
        .map(|c| GraphNode {
            label: c.label().to_string(),
            kind: c.dimension(),
        })
        .collect();

    Ok(FlowGraph {
        nodes,
        edges,
        author_count: authors.len(),
    })
}

fn push_edges(
    table: &CountTable,
    index: &HashMap<&Category, usize>,
    edges: &mut Vec<GraphEdge>,
) -> Result<()> {
    let lookup = |c: &Category| {
        index
            .get(c)
            .copied()
            .ok_or_else(|| QueryError::UnknownCategory(c.to_string()))
    };
    for (key, count) in table.iter() {
        if let [source, target] = key.parts() {
            edges.push(GraphEdge {
                source: lookup(source)?,
                target: lookup(target)?,
                value: count,
            });
        }
    }
    Ok(())
}
