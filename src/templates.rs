//! Compiled-in template catalog used to seed documents.
//!
//! The catalog is data, not code: each entry is a JSON file pulled in at
//! compile time, and the core only relies on `entry.data` being a valid
//! document.

use crate::document::Document;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const BEVERAGES_TEMPLATE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/beverages.json"));
pub const REMOTE_WORK_TEMPLATE_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/remote_work.json"
));

/// One catalog entry: display metadata plus a seed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "themeClass")]
    pub theme_class: String,
    pub data: Document,
}

/// Parse and normalize the full catalog.
pub fn load_catalog() -> Result<Vec<TemplateEntry>> {
    [BEVERAGES_TEMPLATE_JSON, REMOTE_WORK_TEMPLATE_JSON]
        .into_iter()
        .map(|raw| {
            let mut entry: TemplateEntry =
                serde_json::from_str(raw).context("parse template entry")?;
            entry.data = entry.data.normalize();
            Ok(entry)
        })
        .collect()
}

/// Look up a template's seed document by catalog id.
pub fn seed_document(template_id: &str) -> Result<Document> {
    let catalog = load_catalog()?;
    let entry = catalog
        .into_iter()
        .find(|entry| entry.id == template_id)
        .with_context(|| format!("unknown template id: {template_id}"))?;
    Ok(entry.data)
}
