//! Schema types for infographic documents.
//!
//! This is the contract every producer (LM adapter, template catalog, direct
//! edit) must emit and every consumer (renderer, CLI) may rely on. Documents
//! are plain values: every edit produces a fresh `Document` that replaces the
//! previous one, so no in-place mutation leaks across module boundaries.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Fallback accent color applied when a producer emits an invalid hex value.
pub const DEFAULT_THEME_COLOR: &str = "#4f46e5";
/// Fallback page background for the same case.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f8fafc";

/// Visualization strategy for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Pie,
    Line,
    Stat,
    List,
}

/// Fixed cycle order for the section type switcher. Wraps after `List`.
pub const CHART_TYPE_CYCLE: [ChartType; 5] = [
    ChartType::Stat,
    ChartType::Bar,
    ChartType::Pie,
    ChartType::Line,
    ChartType::List,
];

impl ChartType {
    /// Next type in the fixed cycle; five applications return the input.
    pub fn next_in_cycle(self) -> ChartType {
        let position = CHART_TYPE_CYCLE
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0);
        CHART_TYPE_CYCLE[(position + 1) % CHART_TYPE_CYCLE.len()]
    }

    /// Lowercase wire name, also used for display in the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Line => "line",
            ChartType::Stat => "stat",
            ChartType::List => "list",
        }
    }
}

/// One (name, value, optional label) tuple within a section.
///
/// `value` carries the numeric payload for bar/pie/line/stat sections;
/// `label` carries free text used by list and stat variants. Points have no
/// identity beyond their position in the section's data sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One visual block with a chart type and its ordered data sequence.
///
/// `id` is unique within a document and stable across edits. Empty `data` is
/// tolerated: the section renders nothing rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "chartDescription",
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_description: Option<String>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// Citation metadata attached to a generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// The full infographic state: title, theme, ordered sections, provenance.
///
/// `title`, `subtitle`, `themeColor`, and `sections` are required by the
/// producer contract; everything else is defaulted. Unknown fields from a
/// producer are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "themeColor")]
    pub theme_color: String,
    #[serde(rename = "backgroundColor", default = "default_background")]
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

fn hex_color_regex() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR
        .get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{3,8}$").expect("hex color pattern is valid"))
}

/// True when `value` is a hex color string the renderer understands.
pub fn is_hex_color(value: &str) -> bool {
    hex_color_regex().is_match(value)
}

/// De-duplicate sources by `uri`, preserving order. First-seen title wins.
pub fn dedup_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}

impl Document {
    /// Repair producer output in place of rejecting it.
    ///
    /// Non-finite values become `0`, blank section ids get fresh generated
    /// ids, invalid colors fall back to crate defaults, and sources are
    /// de-duplicated. Nothing here can fail; malformed optional fields are
    /// simply dropped from display downstream.
    pub fn normalize(mut self) -> Document {
        if !is_hex_color(&self.theme_color) {
            self.theme_color = DEFAULT_THEME_COLOR.to_string();
        }
        if !is_hex_color(&self.background_color) {
            self.background_color = default_background();
        }
        let existing: Vec<Section> = self.sections.clone();
        for section in &mut self.sections {
            if section.id.trim().is_empty() {
                section.id = crate::mutate::generate_section_id(&existing);
            }
            for point in &mut section.data {
                if !point.value.is_finite() {
                    point.value = 0.0;
                }
            }
        }
        // Generated ids above are unique against the original list; resolve
        // collisions introduced by duplicated producer ids as well.
        let mut seen = HashSet::new();
        for index in 0..self.sections.len() {
            if !seen.insert(self.sections[index].id.clone()) {
                let fresh = crate::mutate::generate_section_id(&self.sections);
                self.sections[index].id = fresh.clone();
                seen.insert(fresh);
            }
        }
        self.sources = self.sources.map(dedup_sources).filter(|s| !s.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_type_cycle_closes_after_five_steps() {
        for start in CHART_TYPE_CYCLE {
            let mut kind = start;
            for _ in 0..5 {
                kind = kind.next_in_cycle();
            }
            assert_eq!(kind, start);
        }
    }

    #[test]
    fn chart_type_cycle_order_matches_switcher() {
        assert_eq!(ChartType::Stat.next_in_cycle(), ChartType::Bar);
        assert_eq!(ChartType::Bar.next_in_cycle(), ChartType::Pie);
        assert_eq!(ChartType::Pie.next_in_cycle(), ChartType::Line);
        assert_eq!(ChartType::Line.next_in_cycle(), ChartType::List);
        assert_eq!(ChartType::List.next_in_cycle(), ChartType::Stat);
    }

    #[test]
    fn chart_type_serializes_lowercase() {
        let json = serde_json::to_string(&ChartType::Stat).expect("serialize");
        assert_eq!(json, "\"stat\"");
        let parsed: ChartType = serde_json::from_str("\"pie\"").expect("parse");
        assert_eq!(parsed, ChartType::Pie);
    }

    #[test]
    fn document_parses_wire_names_and_ignores_unknown_fields() {
        let raw = r##"{
            "title": "T",
            "subtitle": "S",
            "themeColor": "#8b5cf6",
            "vendorExtension": true,
            "sections": [
                {
                    "id": "s1",
                    "type": "bar",
                    "title": "B",
                    "chartDescription": "context",
                    "data": [{"name": "a", "value": 1.5}]
                }
            ]
        }"##;
        let doc: Document = serde_json::from_str(raw).expect("parse document");
        assert_eq!(doc.theme_color, "#8b5cf6");
        assert_eq!(doc.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(doc.sections[0].kind, ChartType::Bar);
        assert_eq!(doc.sections[0].chart_description.as_deref(), Some("context"));
    }

    #[test]
    fn document_rejects_missing_required_fields() {
        let raw = r#"{"title": "T", "sections": []}"#;
        assert!(serde_json::from_str::<Document>(raw).is_err());
    }

    #[test]
    fn dedup_sources_keeps_first_seen_title() {
        let merged = dedup_sources(vec![
            Source {
                uri: "a".into(),
                title: "X".into(),
            },
            Source {
                uri: "a".into(),
                title: "Y".into(),
            },
            Source {
                uri: "b".into(),
                title: "Z".into(),
            },
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "X");
        assert_eq!(merged[1].uri, "b");
    }

    #[test]
    fn normalize_repairs_colors_ids_and_values() {
        let doc = Document {
            title: "T".into(),
            subtitle: "S".into(),
            theme_color: "violet".into(),
            background_color: "#fff".into(),
            footer: None,
            sections: vec![Section {
                id: "  ".into(),
                kind: ChartType::Stat,
                title: "A".into(),
                description: None,
                chart_description: None,
                data: vec![DataPoint {
                    name: "n".into(),
                    value: f64::NAN,
                    label: None,
                }],
            }],
            sources: Some(vec![]),
        };
        let doc = doc.normalize();
        assert_eq!(doc.theme_color, DEFAULT_THEME_COLOR);
        assert_eq!(doc.background_color, "#fff");
        assert!(!doc.sections[0].id.trim().is_empty());
        assert_eq!(doc.sections[0].data[0].value, 0.0);
        assert!(doc.sources.is_none());
    }

    #[test]
    fn normalize_resolves_duplicate_section_ids() {
        let section = Section {
            id: "s1".into(),
            kind: ChartType::Bar,
            title: "A".into(),
            description: None,
            chart_description: None,
            data: vec![],
        };
        let doc = Document {
            title: "T".into(),
            subtitle: "S".into(),
            theme_color: "#123456".into(),
            background_color: "#ffffff".into(),
            footer: None,
            sections: vec![section.clone(), section],
            sources: None,
        };
        let doc = doc.normalize();
        assert_ne!(doc.sections[0].id, doc.sections[1].id);
    }
}
