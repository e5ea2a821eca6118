//! Pure projection from a document to its visual tree.
//!
//! Rendering stays schema-driven: the board is derived from the document
//! value alone, so the same document always produces the same board and no
//! render state survives a document replacement.

use crate::document::{ChartType, Document, Section};

mod format;
mod model;

pub use format::{format_board, group_thousands};
pub use model::{Block, BlockBody, BlockWidth, Board, ListRow, SeriesPoint, StatCard};

/// Fixed pie slice palette, cycled by index. Independent of the theme color.
pub const PIE_PALETTE: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d",
];

/// Project a document onto its visual tree.
///
/// Deterministic and side-effect free. Sections dispatch on their chart
/// type; empty data sequences produce empty bodies rather than errors.
pub fn render(doc: &Document) -> Board {
    Board {
        title: doc.title.clone(),
        subtitle: doc.subtitle.clone(),
        theme_color: doc.theme_color.clone(),
        background_color: doc.background_color.clone(),
        blocks: doc
            .sections
            .iter()
            .map(|section| render_section(section, &doc.theme_color))
            .collect(),
        footer: doc.footer.clone(),
        sources: doc.sources.clone().unwrap_or_default(),
    }
}

/// Grid span for a section: a pure function of type and point count.
///
/// Line charts need the width; bar charts with many categories and stat rows
/// with many cards overflow a half column.
pub fn block_width(kind: ChartType, len: usize) -> BlockWidth {
    match kind {
        ChartType::Line => BlockWidth::Full,
        ChartType::Bar if len > 6 => BlockWidth::Full,
        ChartType::Stat if len > 3 => BlockWidth::Full,
        _ => BlockWidth::Half,
    }
}

fn render_section(section: &Section, theme_color: &str) -> Block {
    Block {
        section_id: section.id.clone(),
        title: section.title.clone(),
        description: section.description.clone(),
        chart_description: section.chart_description.clone(),
        width: block_width(section.kind, section.data.len()),
        body: render_body(section, theme_color),
    }
}

fn render_body(section: &Section, theme_color: &str) -> BlockBody {
    match section.kind {
        ChartType::Bar | ChartType::Line => BlockBody::Chart {
            chart: section.kind,
            series: section
                .data
                .iter()
                .map(|point| SeriesPoint {
                    name: point.name.clone(),
                    value: point.value,
                    color: theme_color.to_string(),
                })
                .collect(),
        },
        ChartType::Pie => BlockBody::Chart {
            chart: ChartType::Pie,
            series: section
                .data
                .iter()
                .enumerate()
                .map(|(index, point)| SeriesPoint {
                    name: point.name.clone(),
                    value: point.value,
                    color: PIE_PALETTE[index % PIE_PALETTE.len()].to_string(),
                })
                .collect(),
        },
        ChartType::Stat => BlockBody::Stats {
            cards: section
                .data
                .iter()
                .map(|point| StatCard {
                    value_text: group_thousands(point.value),
                    name: point.name.clone(),
                    label: point.label.clone(),
                })
                .collect(),
        },
        ChartType::List => BlockBody::List {
            rows: section
                .data
                .iter()
                .enumerate()
                .map(|(index, point)| ListRow {
                    ordinal: index + 1,
                    name: point.name.clone(),
                    text: point
                        .label
                        .clone()
                        .unwrap_or_else(|| group_thousands(point.value)),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DataPoint, Source};
    use crate::edit::data_point;

    fn section(kind: ChartType, points: usize) -> Section {
        Section {
            id: "s1".into(),
            kind,
            title: "T".into(),
            description: None,
            chart_description: None,
            data: (0..points)
                .map(|index| data_point(&format!("p{index}"), index as f64))
                .collect(),
        }
    }

    fn doc_with(sections: Vec<Section>) -> Document {
        Document {
            title: "Title".into(),
            subtitle: "Subtitle".into(),
            theme_color: "#8b5cf6".into(),
            background_color: "#ffffff".into(),
            footer: Some("footer".into()),
            sections,
            sources: Some(vec![Source {
                title: "Ref".into(),
                uri: "https://example.com".into(),
            }]),
        }
    }

    #[test]
    fn block_width_policy_table() {
        assert_eq!(block_width(ChartType::Line, 1), BlockWidth::Full);
        assert_eq!(block_width(ChartType::Bar, 6), BlockWidth::Half);
        assert_eq!(block_width(ChartType::Bar, 7), BlockWidth::Full);
        assert_eq!(block_width(ChartType::Stat, 3), BlockWidth::Half);
        assert_eq!(block_width(ChartType::Stat, 4), BlockWidth::Full);
        assert_eq!(block_width(ChartType::Pie, 12), BlockWidth::Half);
        assert_eq!(block_width(ChartType::List, 12), BlockWidth::Half);
    }

    #[test]
    fn bar_and_line_series_use_the_theme_color() {
        let doc = doc_with(vec![section(ChartType::Bar, 2)]);
        let board = render(&doc);
        let BlockBody::Chart { series, .. } = &board.blocks[0].body else {
            panic!("expected chart body");
        };
        assert!(series.iter().all(|point| point.color == "#8b5cf6"));
    }

    #[test]
    fn pie_slices_cycle_the_fixed_palette() {
        let doc = doc_with(vec![section(ChartType::Pie, 8)]);
        let board = render(&doc);
        let BlockBody::Chart { series, .. } = &board.blocks[0].body else {
            panic!("expected chart body");
        };
        assert_eq!(series[0].color, PIE_PALETTE[0]);
        assert_eq!(series[5].color, PIE_PALETTE[5]);
        assert_eq!(series[6].color, PIE_PALETTE[0]);
    }

    #[test]
    fn stat_cards_group_thousands_and_carry_labels() {
        let mut stat = section(ChartType::Stat, 1);
        stat.data[0] = DataPoint {
            name: "coffee".into(),
            value: 2250000.0,
            label: Some("cups".into()),
        };
        let doc = doc_with(vec![stat]);
        let board = render(&doc);
        let BlockBody::Stats { cards } = &board.blocks[0].body else {
            panic!("expected stats body");
        };
        assert_eq!(cards[0].value_text, "2,250,000");
        assert_eq!(cards[0].label.as_deref(), Some("cups"));
    }

    #[test]
    fn list_rows_fall_back_to_the_value_when_label_is_absent() {
        let mut list = section(ChartType::List, 2);
        list.data[0].label = Some("first detail".into());
        list.data[1].value = 1500.0;
        let doc = doc_with(vec![list]);
        let board = render(&doc);
        let BlockBody::List { rows } = &board.blocks[0].body else {
            panic!("expected list body");
        };
        assert_eq!(rows[0].ordinal, 1);
        assert_eq!(rows[0].text, "first detail");
        assert_eq!(rows[1].ordinal, 2);
        assert_eq!(rows[1].text, "1,500");
    }

    #[test]
    fn empty_data_renders_an_empty_body_not_an_error() {
        let doc = doc_with(vec![section(ChartType::Bar, 0)]);
        let board = render(&doc);
        let BlockBody::Chart { series, .. } = &board.blocks[0].body else {
            panic!("expected chart body");
        };
        assert!(series.is_empty());
    }

    #[test]
    fn render_is_deterministic() {
        let doc = doc_with(vec![section(ChartType::Pie, 3), section(ChartType::List, 2)]);
        assert_eq!(render(&doc), render(&doc));
    }

    #[test]
    fn format_board_emits_every_section() {
        let doc = doc_with(vec![section(ChartType::Stat, 2), section(ChartType::Bar, 1)]);
        let text = format_board(&render(&doc));
        assert!(text.contains("= Title ="));
        assert!(text.contains("[bar chart]"));
        assert!(text.contains("-- footer"));
        assert!(text.contains("Ref <https://example.com>"));
    }
}
