//! Document producer adapter over a user-configured LM command.
//!
//! Invokes an external LM binary with a prompt on stdin and parses the JSON
//! response from stdout. The command can be any tool that accepts text input
//! and produces text output (`llm`, `ollama run`, custom scripts); no API
//! keys or provider plumbing live in this crate.
//!
//! The adapter owns the whole trust boundary: fence extraction, bounded
//! retries with the parse error folded into the retry prompt, schema
//! normalization, and the optimize merge-back that re-imposes document
//! structure and provenance on the rewritten output. Failures never leak a
//! partial document; the caller keeps its current one.

use crate::document::{dedup_sources, Document, Source};
use serde_json::Value;
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;
use thiserror::Error;

/// Environment variable consulted when no `--lm` flag is given.
pub const LM_COMMAND_ENV: &str = "INFOGRAPH_LM_COMMAND";

/// Maximum number of retry attempts after a malformed LM response.
const MAX_LM_RETRIES: usize = 2;

const GENERATE_PROMPT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/generate.md"));
const OPTIMIZE_PROMPT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/optimize.md"));

/// Producer adapter failures. The current document is untouched in every case.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No LM command configured.
    #[error("no LM command configured; pass --lm or set {LM_COMMAND_ENV}")]
    Config,
    /// The LM command could not be spawned or exited with failure.
    #[error("LM command failed: {0}; check the command and try again")]
    Command(String),
    /// The response never parsed as a document within the retry budget.
    #[error("LM response was not a valid document after {attempts} attempts: {detail}; try again")]
    Parse { attempts: usize, detail: String },
}

/// The configured LM command line, already split into argv.
#[derive(Debug, Clone)]
pub struct LmCommand {
    argv: Vec<String>,
}

impl LmCommand {
    /// Resolve the LM command: `--lm` flag first, then the environment.
    pub fn resolve(flag: Option<&str>) -> Result<LmCommand, GenerateError> {
        let raw = match flag {
            Some(raw) => raw.to_string(),
            None => env::var(LM_COMMAND_ENV).map_err(|_| GenerateError::Config)?,
        };
        LmCommand::parse(&raw)
    }

    /// Parse a shell-style command line into argv.
    pub fn parse(raw: &str) -> Result<LmCommand, GenerateError> {
        let argv = shell_words::split(raw)
            .map_err(|err| GenerateError::Command(format!("parse LM command: {err}")))?;
        if argv.is_empty() {
            return Err(GenerateError::Command("LM command is empty".to_string()));
        }
        Ok(LmCommand { argv })
    }
}

/// Generate a document from a free-text request.
///
/// The returned document is normalized and carries de-duplicated sources,
/// whether they arrived on the document itself or alongside it in a response
/// envelope.
pub fn generate(command: &LmCommand, request: &str) -> Result<Document, GenerateError> {
    let base_prompt = GENERATE_PROMPT.replace("{request}", request);
    let document = invoke_for_document(command, &base_prompt)?;
    Ok(document.normalize())
}

/// Rewrite a document's text fields for tone and clarity.
///
/// The rewritten output is merged back onto the input's structure: section
/// ids, chart types, point values, and counts all come from `input`; only
/// text comes from the LM. Sources are always re-attached from `input` - the
/// optimizer is not trusted to preserve provenance.
pub fn optimize(command: &LmCommand, input: &Document) -> Result<Document, GenerateError> {
    let serialized = serde_json::to_string_pretty(input)
        .map_err(|err| GenerateError::Command(format!("serialize document: {err}")))?;
    let base_prompt = OPTIMIZE_PROMPT.replace("{document}", &serialized);
    let rewritten = invoke_for_document(command, &base_prompt)?;
    Ok(merge_optimized(input, &rewritten).normalize())
}

/// Invoke the LM with retries, parsing the response as a document.
///
/// On a malformed response the retry prompt carries the parse error and a
/// truncated copy of the previous response so the LM can correct itself.
fn invoke_for_document(command: &LmCommand, base_prompt: &str) -> Result<Document, GenerateError> {
    let mut last_error: Option<String> = None;
    let mut last_response: Option<String> = None;

    for attempt in 0..=MAX_LM_RETRIES {
        let prompt = if attempt == 0 {
            base_prompt.to_string()
        } else {
            tracing::warn!(attempt, "retrying LM call after malformed response");
            build_retry_prompt(
                base_prompt,
                last_error.as_deref().unwrap_or("unknown error"),
                last_response.as_deref(),
            )
        };

        // Command execution errors are not retried; they signal a config
        // problem, not a model mistake.
        let response = invoke_lm_command(command, &prompt)?;

        match parse_document_response(&response) {
            Ok(document) => return Ok(document),
            Err(detail) => {
                last_error = Some(detail);
                last_response = Some(response);
            }
        }
    }

    Err(GenerateError::Parse {
        attempts: MAX_LM_RETRIES + 1,
        detail: last_error.unwrap_or_else(|| "unknown".to_string()),
    })
}

fn build_retry_prompt(base_prompt: &str, error: &str, previous: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "# Previous response error\n\nYour previous response could not be used. \
         Fix the error and respond again with a single JSON object only.\n\n",
    );
    prompt.push_str(&format!("**Error:** {error}\n\n"));
    if let Some(previous) = previous {
        // Truncate on a char boundary; a mid-char cut would panic.
        let snippet = if previous.len() > 1000 {
            let mut cut = 1000;
            while !previous.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...(truncated)", &previous[..cut])
        } else {
            previous.to_string()
        };
        prompt.push_str(&format!(
            "**Your previous response (may be truncated):**\n```\n{snippet}\n```\n\n"
        ));
    }
    prompt.push_str(base_prompt);
    prompt
}

/// Run the LM command with the prompt on stdin.
fn invoke_lm_command(command: &LmCommand, prompt: &str) -> Result<String, GenerateError> {
    let start = Instant::now();
    let mut child = Command::new(&command.argv[0])
        .args(&command.argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| GenerateError::Command(format!("spawn {}: {err}", command.argv[0])))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(prompt.as_bytes())
            .map_err(|err| GenerateError::Command(format!("write LM stdin: {err}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|err| GenerateError::Command(format!("wait for LM: {err}")))?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        prompt_bytes = prompt.len(),
        response_bytes = output.stdout.len(),
        "lm invoke complete"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GenerateError::Command(format!(
            "exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|err| GenerateError::Command(format!("decode LM stdout: {err}")))
}

/// Parse an LM response into a document.
///
/// Accepts either a bare document object or a `{"document": ..., "sources":
/// ...}` envelope; citation metadata found on the envelope is merged into the
/// document's sources, de-duplicated by uri with first-seen title winning.
fn parse_document_response(response: &str) -> Result<Document, String> {
    let json_text = extract_json(response);
    let value: Value = serde_json::from_str(json_text)
        .map_err(|err| format!("response JSON failed to parse: {err}"))?;

    let (document_value, envelope_sources) = match value.get("document") {
        Some(inner) => {
            let citations = value
                .get("sources")
                .or_else(|| value.get("citations"))
                .cloned();
            (inner.clone(), citations)
        }
        None => (value, None),
    };

    let mut document: Document = serde_json::from_value(document_value)
        .map_err(|err| format!("response did not satisfy the document schema: {err}"))?;

    if let Some(citations) = envelope_sources {
        // Envelope citations are best-effort metadata; malformed entries are
        // dropped rather than failing the whole response.
        if let Ok(extra) = serde_json::from_value::<Vec<Source>>(citations) {
            let mut merged = document.sources.take().unwrap_or_default();
            merged.extend(extra);
            let merged = dedup_sources(merged);
            document.sources = (!merged.is_empty()).then_some(merged);
        }
    }

    Ok(document)
}

/// Merge a rewritten document onto the input's structure.
///
/// Ids, chart types, data values, and section/point counts come from `input`.
/// Text fields come from `rewritten` where a positional counterpart exists,
/// falling back to the input's text. Sources are re-attached from the input
/// unconditionally.
pub fn merge_optimized(input: &Document, rewritten: &Document) -> Document {
    let mut merged = input.clone();
    merged.title = rewritten.title.clone();
    merged.subtitle = rewritten.subtitle.clone();
    if rewritten.footer.is_some() {
        merged.footer = rewritten.footer.clone();
    }

    for (index, section) in merged.sections.iter_mut().enumerate() {
        let Some(candidate) = rewritten.sections.get(index) else {
            continue;
        };
        section.title = candidate.title.clone();
        if candidate.description.is_some() {
            section.description = candidate.description.clone();
        }
        if candidate.chart_description.is_some() {
            section.chart_description = candidate.chart_description.clone();
        }
        for (point_index, point) in section.data.iter_mut().enumerate() {
            let Some(candidate_point) = candidate.data.get(point_index) else {
                continue;
            };
            point.name = candidate_point.name.clone();
            if candidate_point.label.is_some() {
                point.label = candidate_point.label.clone();
            }
        }
    }

    merged.sources = input.sources.clone();
    merged
}

/// Extract JSON from text that might carry markdown code fences.
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return text[start..start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip a language identifier if present.
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            return text[start..start + end].trim();
        }
    }

    text
}
