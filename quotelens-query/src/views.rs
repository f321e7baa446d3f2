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

//! Chart-ready views
//!
//! Each chart's data preparation is a thin call over the aggregator, the
//! flattener or the graph builder. [`ChartBundle`] builds all of them at once
//! for hand-off to a renderer.

use crate::aggregation::{aggregate, Category, Dimension, GroupKey};
use crate::error::{QueryError, Result};
use crate::flatten::{flatten, NestedCounts, PathRow};
use crate::graph::{build_graph, FlowGraph};
use crate::ordering::{sorted_axis, CategoryOrders};
use quotelens_core::{Record, Sentiment};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Column width used when wrapping quote text for hover labels
pub const HOVER_WRAP_WIDTH: usize = 80;

/// Line separator understood by the renderer's hover labels
pub const HOVER_LINE_BREAK: &str = "<br>";

/// Per-sentiment counts for one category, zero where a sentiment was not observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentBreakdown {
    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Counts in axis order
    pub fn values(&self) -> [u64; 3] {
        Sentiment::ALL.map(|s| self.get(s))
    }
}

/// Sentiment breakdown for every author or every tag, keyed in axis order
pub fn sentiment_breakdown(
    records: &[Record],
    dimension: Dimension,
) -> Result<BTreeMap<String, SentimentBreakdown>> {
    if dimension == Dimension::Sentiment {
        return Err(QueryError::InvalidDimension(dimension.name()));
    }

    let table = aggregate(records, &[dimension, Dimension::Sentiment])?;
    let categories = sorted_axis(
        table
            .iter()
            .filter_map(|(key, _)| key.parts().first().map(|c| c.label().to_string())),
    );

    let breakdowns = categories
        .into_iter()
        .map(|name| {
            let category = match dimension {
                Dimension::Tag => Category::Tag(name.clone()),
                _ => Category::Author(name.clone()),
            };
            let count = |s: Sentiment| {
                table.count_or_default(&GroupKey::from((category.clone(), Category::from(s))))
            };
            let breakdown = SentimentBreakdown {
                positive: count(Sentiment::Positive),
                neutral: count(Sentiment::Neutral),
                negative: count(Sentiment::Negative),
            };
            (name, breakdown)
        })
        .collect();

    Ok(breakdowns)
}

/// One stacked-bar segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarRow {
    pub category: String,
    pub sentiment: Sentiment,
    pub count: u64,
}

/// Stacked bar chart: one bar per author or tag, stacked by sentiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedBars {
    pub dimension: Dimension,
    pub category_order: Vec<String>,
    pub rows: Vec<BarRow>,
}

pub fn stacked_bars(records: &[Record], dimension: Dimension) -> Result<StackedBars> {
    let breakdowns = sentiment_breakdown(records, dimension)?;
    let rows = breakdowns
        .iter()
        .flat_map(|(category, breakdown)| {
            Sentiment::ALL.into_iter().map(move |sentiment| BarRow {
                category: category.clone(),
                sentiment,
                count: breakdown.get(sentiment),
            })
        })
        .collect();

    Ok(StackedBars {
        dimension,
        category_order: breakdowns.into_keys().collect(),
        rows,
    })
}

/// Donut chart for a single author or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieChart {
    pub category: String,
    pub labels: [Sentiment; 3],
    pub values: [u64; 3],
    pub colors: [&'static str; 3],
}

/// One donut per author or tag, in axis order
pub fn sentiment_pies(records: &[Record], dimension: Dimension) -> Result<Vec<PieChart>> {
    let pies = sentiment_breakdown(records, dimension)?
        .into_iter()
        .map(|(category, breakdown)| PieChart {
            category,
            labels: Sentiment::ALL,
            values: breakdown.values(),
            colors: Sentiment::ALL.map(|s| s.color()),
        })
        .collect();
    Ok(pies)
}

/// Author → tag → sentiment hierarchy
pub fn sunburst(records: &[Record]) -> Result<Vec<PathRow>> {
    let table = aggregate(
        records,
        &[Dimension::Author, Dimension::Tag, Dimension::Sentiment],
    )?;
    flatten(&NestedCounts::from_table(&table)?)
}

/// Quote count per author as single-level paths
pub fn treemap(records: &[Record]) -> Result<Vec<PathRow>> {
    let table = aggregate(records, &[Dimension::Author])?;
    flatten(&NestedCounts::from_table(&table)?)
}

/// Flow graph plus per-node colors by segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sankey {
    #[serde(flatten)]
    pub graph: FlowGraph,
    pub node_colors: Vec<&'static str>,
}

pub fn sankey(records: &[Record]) -> Result<Sankey> {
    let graph = build_graph(records)?;
    let node_colors = graph.nodes.iter().map(|n| node_color(n.kind)).collect();
    Ok(Sankey { graph, node_colors })
}

fn node_color(kind: Dimension) -> &'static str {
    match kind {
        Dimension::Author => "lightblue",
        Dimension::Sentiment => "gray",
        Dimension::Tag => "lightgreen",
    }
}

/// One quote on the length/polarity scatter plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub author: String,
    /// Quote length in characters
    pub length: usize,
    pub compound: f64,
    pub sentiment: Sentiment,
    pub quote_wrapped: String,
}

pub fn scatter(records: &[Record]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            author: r.author.clone(),
            length: r.text.chars().count(),
            compound: r.polarity.unwrap_or(0.0),
            sentiment: r.sentiment,
            quote_wrapped: wrap_text(&r.text, HOVER_WRAP_WIDTH).join(HOVER_LINE_BREAK),
        })
        .collect()
}

/// Greedy word wrap at `width` columns
///
/// Whitespace characters become plain spaces and runs of spaces inside a line
/// are kept. Lines break at spaces or after hyphens inside words. Words longer
/// than `width` are split. Blank text yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let flat: String = text
        .chars()
        .map(|c| if c.is_ascii_whitespace() { ' ' } else { c })
        .collect();
    let options = textwrap::Options::new(width.max(1))
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(&flat, options)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

/// Concatenated quote text per sentiment, for word clouds
///
/// Sentiments whose corpus is blank are omitted.
pub fn word_cloud_corpora(records: &[Record]) -> BTreeMap<Sentiment, String> {
    let mut corpora: BTreeMap<Sentiment, String> = BTreeMap::new();
    for record in records {
        let corpus = corpora.entry(record.sentiment).or_default();
        corpus.push(' ');
        corpus.push_str(&record.text);
    }
    corpora.retain(|_, text| !text.trim().is_empty());
    corpora
}

/// Sentiment palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub sentiment: Sentiment,
    pub color: &'static str,
}

pub fn sentiment_palette() -> [PaletteEntry; 3] {
    Sentiment::ALL.map(|sentiment| PaletteEntry {
        sentiment,
        color: sentiment.color(),
    })
}

/// Every chart view for one record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub record_count: usize,
    pub category_orders: CategoryOrders,
    pub palette: [PaletteEntry; 3],
    pub author_bars: StackedBars,
    pub tag_bars: StackedBars,
    pub author_pies: Vec<PieChart>,
    pub tag_pies: Vec<PieChart>,
    pub sunburst: Vec<PathRow>,
    pub treemap: Vec<PathRow>,
    pub sankey: Sankey,
    pub scatter: Vec<ScatterPoint>,
    pub word_clouds: BTreeMap<Sentiment, String>,
}

impl ChartBundle {
    pub fn build(records: &[Record]) -> Result<Self> {
        let span = tracing::debug_span!("chart_bundle", records = records.len());
        let _guard = span.enter();

        let bundle = Self {
            record_count: records.len(),
            category_orders: CategoryOrders::from_records(records),
            palette: sentiment_palette(),
            author_bars: stacked_bars(records, Dimension::Author)?,
            tag_bars: stacked_bars(records, Dimension::Tag)?,
            author_pies: sentiment_pies(records, Dimension::Author)?,
            tag_pies: sentiment_pies(records, Dimension::Tag)?,
            sunburst: sunburst(records)?,
            treemap: treemap(records)?,
            sankey: sankey(records)?,
            scatter: scatter(records),
            word_clouds: word_cloud_corpora(records),
        };

        debug!(
            authors = bundle.category_orders.author.len(),
            tags = bundle.category_orders.tag.len(),
            sankey_edges = bundle.sankey.graph.edges.len(),
            "Prepared chart views"
        );
        info!("Built chart bundle for {} quotes", bundle.record_count);
        Ok(bundle)
    }
}
