//! Field-merge engine: apply a single scalar edit without disturbing siblings.
//!
//! Every function here is pure. Inputs are borrowed and never mutated; the
//! return value deep-equals the input except at the targeted path, so the
//! caller can atomically replace its current document with the result.

use crate::document::{Document, Section};
#[cfg(test)]
use crate::document::DataPoint;
use clap::ValueEnum;

/// Root document fields editable in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentField {
    Title,
    Subtitle,
    Footer,
}

/// Editable fields of a single data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataPointField {
    Name,
    Value,
    Label,
}

/// Parse user numeric input, stripping thousands separators.
///
/// Unparsable or non-finite input silently defaults to `0` rather than
/// erroring: the editor prefers staying renderable over rejecting a keystroke.
pub fn parse_value(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Return a copy of `doc` with one root text field replaced.
pub fn update_document_field(doc: &Document, field: DocumentField, value: &str) -> Document {
    let mut next = doc.clone();
    match field {
        DocumentField::Title => next.title = value.to_string(),
        DocumentField::Subtitle => next.subtitle = value.to_string(),
        DocumentField::Footer => next.footer = Some(value.to_string()),
    }
    next
}

/// Replace the section at `index` with `section`.
///
/// The index always originates from a render of `doc` itself, so an
/// out-of-range index is a programmer error and panics.
pub fn update_section(doc: &Document, index: usize, section: Section) -> Document {
    let mut next = doc.clone();
    next.sections[index] = section;
    next
}

/// Apply a single data-point field edit within a section.
///
/// `Value` edits go through [`parse_value`]; `Name` and `Label` take the raw
/// string verbatim. A stale (out-of-range) index is a no-op copy, since it
/// indicates the point was removed by a just-prior structural edit.
pub fn update_data_point(
    section: &Section,
    index: usize,
    field: DataPointField,
    raw: &str,
) -> Section {
    let mut next = section.clone();
    let Some(point) = next.data.get_mut(index) else {
        return next;
    };
    match field {
        DataPointField::Name => point.name = raw.to_string(),
        DataPointField::Value => point.value = parse_value(raw),
        DataPointField::Label => point.label = Some(raw.to_string()),
    }
    next
}

/// Shorthand for building fixture points in tests.
#[cfg(test)]
pub fn data_point(name: &str, value: f64) -> DataPoint {
    DataPoint {
        name: name.to_string(),
        value,
        label: None,
    }
}
