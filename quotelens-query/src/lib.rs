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

//! QuoteLens Query
//!
//! Re-shapes a flat list of quote records into the aggregate views charts
//! consume: grouped count tables, hierarchical path rows, and the
//! author → sentiment → tag flow graph. Every function here is a pure
//! transform over its input; nothing is cached between calls.

pub mod aggregation;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod ordering;
pub mod views;

pub use aggregation::{
    aggregate, aggregate_with, count_or_default, Category, CountTable, Dimension, FlatRow,
    GroupKey, KeyExtractor, MAX_KEY_ARITY,
};
pub use error::{QueryError, Result};
pub use flatten::{flatten, flatten_table, reaggregate, CountNode, NestedCounts, PathRow};
pub use graph::{build_graph, FlowGraph, GraphEdge, GraphNode};
pub use ordering::{author_axis, sentiment_axis, sorted_axis, tag_axis, CategoryOrders};
pub use views::{
    sankey, scatter, sentiment_breakdown, sentiment_palette, sentiment_pies, stacked_bars,
    sunburst, treemap, word_cloud_corpora, wrap_text, BarRow, ChartBundle, PaletteEntry,
    PieChart, Sankey, ScatterPoint, SentimentBreakdown, StackedBars,
};
