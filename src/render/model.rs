//! Visual tree emitted by the renderer.
//!
//! The board is a plain serializable value so consumers (chart front-ends,
//! the CLI preview, export) can project it however they like without ever
//! touching the document again.

use crate::document::{ChartType, Source};
use serde::Serialize;

/// Rendered document: header, blocks in display order, footer, provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub title: String,
    pub subtitle: String,
    pub theme_color: String,
    pub background_color: String,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

/// One rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub section_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_description: Option<String>,
    pub width: BlockWidth,
    pub body: BlockBody,
}

/// Grid placement: full row span or half of the two-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockWidth {
    Full,
    Half,
}

/// Per-type visualization payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockBody {
    Chart {
        chart: ChartType,
        series: Vec<SeriesPoint>,
    },
    Stats {
        cards: Vec<StatCard>,
    },
    List {
        rows: Vec<ListRow>,
    },
}

/// One plotted point with its resolved color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// One stat card: thousands-grouped value, name, optional detail line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub value_text: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One list row: 1-based ordinal, name, detail text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub ordinal: usize,
    pub name: String,
    pub text: String,
}
