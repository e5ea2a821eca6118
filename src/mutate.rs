//! Section mutation engine: structural edits expressed as total functions.
//!
//! Structural edits return a whole new document (or section) so the caller's
//! single current-document variable can be replaced atomically. Stale indexes
//! from a superseded render are treated as no-ops, never as errors.

use crate::document::{ChartType, DataPoint, Document, Section};
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder point appended by [`add_data_point`].
pub const NEW_POINT_NAME: &str = "new item";
/// Placeholder value appended by [`add_data_point`].
pub const NEW_POINT_VALUE: f64 = 10.0;

/// Generate a section id unique among `existing`.
///
/// Time-based (`s-<millis>`) with a numeric bump on collision, so ids stay
/// stable and readable in the document JSON.
pub fn generate_section_id(existing: &[Section]) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let base = format!("s-{millis}");
    if existing.iter().all(|section| section.id != base) {
        return base;
    }
    let mut bump = 1u32;
    loop {
        let candidate = format!("{base}-{bump}");
        if existing.iter().all(|section| section.id != candidate) {
            return candidate;
        }
        bump += 1;
    }
}

/// Append a placeholder section at the end of the document.
///
/// New sections start as `stat` with two placeholder points, matching the
/// editor's add-section affordance.
pub fn add_section(doc: &Document) -> Document {
    let mut next = doc.clone();
    let section = Section {
        id: generate_section_id(&doc.sections),
        kind: ChartType::Stat,
        title: "New section".to_string(),
        description: Some("Describe this section...".to_string()),
        chart_description: None,
        data: vec![
            DataPoint {
                name: "Item 1".to_string(),
                value: 100.0,
                label: None,
            },
            DataPoint {
                name: "Item 2".to_string(),
                value: 200.0,
                label: None,
            },
        ],
    };
    next.sections.push(section);
    next
}

/// Remove the section at `index`; later sections shift down by one.
///
/// An empty result is fine. A stale index is a no-op.
pub fn remove_section(doc: &Document, index: usize) -> Document {
    let mut next = doc.clone();
    if index < next.sections.len() {
        next.sections.remove(index);
    }
    next
}

/// Advance the section's type to the next value in the fixed cycle.
///
/// The sole mechanism for retyping a section. `data` is never altered, even
/// though some point fields become semantically unused under the new type.
pub fn cycle_section_type(doc: &Document, index: usize) -> Document {
    let mut next = doc.clone();
    if let Some(section) = next.sections.get_mut(index) {
        section.kind = section.kind.next_in_cycle();
    }
    next
}

/// Append the placeholder `{name: "new item", value: 10}` point.
pub fn add_data_point(section: &Section) -> Section {
    let mut next = section.clone();
    next.data.push(DataPoint {
        name: NEW_POINT_NAME.to_string(),
        value: NEW_POINT_VALUE,
        label: None,
    });
    next
}

/// Remove the point at `index` with the same shift semantics as
/// [`remove_section`]. A stale index is a no-op.
pub fn remove_data_point(section: &Section, index: usize) -> Section {
    let mut next = section.clone();
    if index < next.data.len() {
        next.data.remove(index);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::data_point;

    fn doc_with_sections(count: usize) -> Document {
        let sections = (0..count)
            .map(|index| Section {
                id: format!("s{index}"),
                kind: ChartType::Bar,
                title: format!("Section {index}"),
                description: None,
                chart_description: None,
                data: vec![data_point("a", 1.0)],
            })
            .collect();
        Document {
            title: "T".into(),
            subtitle: "S".into(),
            theme_color: "#8b5cf6".into(),
            background_color: "#ffffff".into(),
            footer: None,
            sections,
            sources: None,
        }
    }

    #[test]
    fn add_section_appends_stat_placeholder_with_unique_id() {
        let doc = doc_with_sections(2);
        let next = add_section(&doc);
        assert_eq!(next.sections.len(), 3);
        let added = next.sections.last().expect("appended section");
        assert_eq!(added.kind, ChartType::Stat);
        assert_eq!(added.data.len(), 2);
        assert!(
            next.sections
                .iter()
                .filter(|section| section.id == added.id)
                .count()
                == 1
        );
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn generate_section_id_avoids_collisions() {
        let mut doc = doc_with_sections(1);
        let id = generate_section_id(&doc.sections);
        doc.sections[0].id = id.clone();
        let second = generate_section_id(&doc.sections);
        assert_ne!(second, id);
    }

    #[test]
    fn remove_section_preserves_order_of_the_rest() {
        let doc = doc_with_sections(3);
        let next = remove_section(&doc, 1);
        assert_eq!(next.sections.len(), 2);
        assert_eq!(next.sections[0].id, "s0");
        assert_eq!(next.sections[1].id, "s2");
    }

    #[test]
    fn remove_section_stale_index_and_empty_result_are_fine() {
        let doc = doc_with_sections(1);
        let next = remove_section(&doc, 5);
        assert_eq!(next, doc);
        let next = remove_section(&doc, 0);
        assert!(next.sections.is_empty());
    }

    #[test]
    fn cycle_section_type_never_touches_data() {
        let doc = doc_with_sections(1);
        let next = cycle_section_type(&doc, 0);
        assert_eq!(next.sections[0].kind, ChartType::Pie);
        assert_eq!(next.sections[0].data, doc.sections[0].data);
        let stale = cycle_section_type(&doc, 9);
        assert_eq!(stale, doc);
    }

    #[test]
    fn add_and_remove_data_point() {
        let doc = doc_with_sections(1);
        let section = &doc.sections[0];
        let grown = add_data_point(section);
        assert_eq!(grown.data.len(), 2);
        assert_eq!(grown.data[1].name, NEW_POINT_NAME);
        assert_eq!(grown.data[1].value, NEW_POINT_VALUE);
        let shrunk = remove_data_point(&grown, 0);
        assert_eq!(shrunk.data.len(), 1);
        assert_eq!(shrunk.data[0].name, NEW_POINT_NAME);
        let stale = remove_data_point(section, 9);
        assert_eq!(&stale, section);
    }
}
