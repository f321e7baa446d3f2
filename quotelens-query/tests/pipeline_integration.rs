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

//! Integration tests from raw JSON through to chart views

use quotelens_core::{decode_records, AnalysisConfig, RecordNormalizer, Sentiment};
use quotelens_query::{aggregate, build_graph, Category, ChartBundle, Dimension, GroupKey};

const RAW: &str = r#"[
    {"author": "A", "tags": ["x"], "sentiment": "Positive"},
    {"author": "A", "tags": ["x", "y"], "sentiment": "Negative"}
]"#;

fn normalizer() -> RecordNormalizer {
    RecordNormalizer::default()
}

/// Two-record scenario: author/tag and author/sentiment groupings
#[test]
fn test_scenario_groupings() {
    let records = decode_records(RAW, &normalizer()).unwrap();

    let by_tag = aggregate(&records, &[Dimension::Author, Dimension::Tag]).unwrap();
    assert_eq!(by_tag.len(), 2);
    assert_eq!(
        by_tag.get(&GroupKey::from((Category::author("A"), Category::tag("x")))),
        Some(2)
    );
    assert_eq!(
        by_tag.get(&GroupKey::from((Category::author("A"), Category::tag("y")))),
        Some(1)
    );

    let by_sentiment = aggregate(&records, &[Dimension::Author, Dimension::Sentiment]).unwrap();
    assert_eq!(by_sentiment.len(), 2);
    assert_eq!(
        by_sentiment.get(&GroupKey::from((
            Category::author("A"),
            Category::from(Sentiment::Positive)
        ))),
        Some(1)
    );
    assert_eq!(
        by_sentiment.get(&GroupKey::from((
            Category::author("A"),
            Category::from(Sentiment::Negative)
        ))),
        Some(1)
    );
}

/// Empty input yields empty tables and a sentiment-only graph
#[test]
fn test_empty_input() {
    let records = decode_records("[]", &normalizer()).unwrap();
    for dims in [
        vec![Dimension::Author],
        vec![Dimension::Tag],
        vec![Dimension::Author, Dimension::Sentiment],
        vec![Dimension::Author, Dimension::Tag, Dimension::Sentiment],
    ] {
        assert!(aggregate(&records, &dims).unwrap().is_empty());
    }

    let graph = build_graph(&records).unwrap();
    assert_eq!(graph.labels(), vec!["Positive", "Neutral", "Negative"]);
    assert!(graph.edges.is_empty());
}

/// A record without tags counts toward author groupings only
#[test]
fn test_untagged_record() {
    let records = decode_records(r#"[{"author": "B", "tags": []}]"#, &normalizer()).unwrap();
    assert!(aggregate(&records, &[Dimension::Tag]).unwrap().is_empty());
    assert!(aggregate(&records, &[Dimension::Sentiment, Dimension::Tag])
        .unwrap()
        .is_empty());
    assert_eq!(aggregate(&records, &[Dimension::Author]).unwrap().total(), 1);
    assert_eq!(aggregate(&records, &[Dimension::Sentiment]).unwrap().total(), 1);
}

/// Missing fields default before any aggregation runs
#[test]
fn test_defaults_flow_through() {
    let records =
        decode_records(r#"[{"text": "Hmm."}, {"compound": 0.7}]"#, &normalizer()).unwrap();
    let table = aggregate(&records, &[Dimension::Author, Dimension::Sentiment]).unwrap();
    assert_eq!(
        table.get(&GroupKey::from((
            Category::author("Unknown"),
            Category::from(Sentiment::Neutral)
        ))),
        Some(1)
    );
    assert_eq!(
        table.get(&GroupKey::from((
            Category::author("Unknown"),
            Category::from(Sentiment::Positive)
        ))),
        Some(1)
    );
}

/// Structural failures abort before any view is built
#[test]
fn test_structural_error_stops_pipeline() {
    let err = decode_records(r#"[{"author": "A", "tags": "x"}]"#, &normalizer()).unwrap_err();
    assert!(err.is_structural());
}

/// Configured thresholds reach the classifier used during normalization
#[test]
fn test_configured_pipeline() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        [classifier]
        positive_threshold = 0.5
        negative_threshold = -0.5
        "#,
    )
    .unwrap();
    let normalizer = RecordNormalizer::from_config(&config).unwrap();
    let records = decode_records(
        r#"[{"author": "A", "compound": 0.3}, {"author": "A", "compound": 0.6}]"#,
        &normalizer,
    )
    .unwrap();
    let bundle = ChartBundle::build(&records).unwrap();
    assert_eq!(bundle.author_pies[0].values, [1, 1, 0]);
}

/// Full bundle is deterministic under input reordering
#[test]
fn test_bundle_is_order_independent() {
    let json = r#"[
        {"author": "Mark Twain", "tags": ["humor", "truth"], "sentiment": "Positive", "text": "a"},
        {"author": "Albert Einstein", "tags": ["life"], "sentiment": "Neutral", "text": "b"},
        {"author": "Jane Austen", "tags": ["humor"], "sentiment": "Negative", "text": "c"}
    ]"#;
    let records = decode_records(json, &normalizer()).unwrap();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = ChartBundle::build(&records).unwrap();
    let backward = ChartBundle::build(&reversed).unwrap();
    assert_eq!(forward.category_orders, backward.category_orders);
    assert_eq!(forward.author_bars, backward.author_bars);
    assert_eq!(forward.tag_pies, backward.tag_pies);
    assert_eq!(forward.sunburst, backward.sunburst);
    assert_eq!(forward.treemap, backward.treemap);
    assert_eq!(forward.sankey, backward.sankey);
    assert_eq!(
        forward.category_orders.author,
        vec!["Albert Einstein", "Jane Austen", "Mark Twain"]
    );
}
