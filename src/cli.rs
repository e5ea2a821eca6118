//! CLI argument parsing for the infographic workflow.
//!
//! The CLI is intentionally thin: it wires documents on disk through the
//! pure engines without embedding policy, so the same core logic can be
//! reused behind any front-end.

use crate::edit::{DataPointField, DocumentField};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the infographic workflow.
#[derive(Parser, Debug)]
#[command(
    name = "infograph",
    version,
    about = "LM-driven infographic document engine and editor",
    after_help = "Examples:\n  infograph seed --template beverages --out doc.json\n  infograph generate --prompt 'EV vs gas car sales 2024' --out doc.json\n  infograph edit --doc doc.json add-point --section 0\n  infograph edit --doc doc.json cycle-type --index 0\n  infograph optimize --doc doc.json\n  infograph render --doc doc.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(GenerateArgs),
    Optimize(OptimizeArgs),
    Render(RenderArgs),
    Templates(TemplatesArgs),
    Seed(SeedArgs),
    Edit(EditArgs),
}

/// Generate a document from a free-text request.
#[derive(Parser, Debug)]
#[command(about = "Generate a document from a free-text prompt via the LM")]
pub struct GenerateArgs {
    /// Free-text request describing the infographic
    #[arg(long, conflicts_with = "from_stdin")]
    pub prompt: Option<String>,

    /// Read the request from stdin (e.g. a piped speech transcript)
    #[arg(long)]
    pub from_stdin: bool,

    /// LM command line (overrides INFOGRAPH_LM_COMMAND)
    #[arg(long, value_name = "CMD")]
    pub lm: Option<String>,

    /// Output path for the generated document JSON
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

/// Rewrite a document's text fields via the LM.
#[derive(Parser, Debug)]
#[command(about = "Improve a document's copywriting without touching its data")]
pub struct OptimizeArgs {
    /// Path to the document JSON
    #[arg(long, value_name = "PATH")]
    pub doc: PathBuf,

    /// LM command line (overrides INFOGRAPH_LM_COMMAND)
    #[arg(long, value_name = "CMD")]
    pub lm: Option<String>,

    /// Output path; defaults to rewriting --doc in place
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Render a document to the terminal or a file.
#[derive(Parser, Debug)]
#[command(about = "Render a document as a text board or JSON visual tree")]
pub struct RenderArgs {
    /// Path to the document JSON
    #[arg(long, value_name = "PATH")]
    pub doc: PathBuf,

    /// Emit the visual tree as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Write the rendering to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// List the built-in template catalog.
#[derive(Parser, Debug)]
#[command(about = "List the built-in template catalog")]
pub struct TemplatesArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Materialize a template's seed document.
#[derive(Parser, Debug)]
#[command(about = "Write a template's seed document to a file")]
pub struct SeedArgs {
    /// Template id from the catalog
    #[arg(long, value_name = "ID")]
    pub template: String,

    /// Output path for the seed document JSON
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

/// Apply one edit to a document file and replace it atomically.
#[derive(Parser, Debug)]
#[command(about = "Apply a field or structural edit to a document file")]
pub struct EditArgs {
    /// Path to the document JSON
    #[arg(long, value_name = "PATH")]
    pub doc: PathBuf,

    /// Output path; defaults to rewriting --doc in place
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub action: EditAction,
}

/// One edit operation against the current document.
#[derive(Subcommand, Debug)]
pub enum EditAction {
    /// Set a root text field (title, subtitle, footer)
    SetField {
        #[arg(long, value_enum)]
        field: DocumentField,
        #[arg(long)]
        value: String,
    },
    /// Set one field of one data point
    SetPoint {
        /// Section index (0-based, display order)
        #[arg(long)]
        section: usize,
        /// Data point index within the section (0-based)
        #[arg(long)]
        index: usize,
        #[arg(long, value_enum)]
        field: DataPointField,
        #[arg(long)]
        value: String,
    },
    /// Append a placeholder section
    AddSection,
    /// Remove the section at an index
    RemoveSection {
        #[arg(long)]
        index: usize,
    },
    /// Advance a section's chart type through the fixed cycle
    CycleType {
        #[arg(long)]
        index: usize,
    },
    /// Append the placeholder data point to a section
    AddPoint {
        #[arg(long)]
        section: usize,
    },
    /// Remove one data point from a section
    RemovePoint {
        #[arg(long)]
        section: usize,
        #[arg(long)]
        index: usize,
    },
}
