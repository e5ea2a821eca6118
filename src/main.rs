use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod document;
mod edit;
mod mutate;
mod producer;
mod render;
mod session;
mod templates;

use cli::{
    Command, EditAction, EditArgs, GenerateArgs, OptimizeArgs, RenderArgs, RootArgs, SeedArgs,
    TemplatesArgs,
};
use document::Document;
use producer::LmCommand;
use session::Session;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infograph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = RootArgs::parse();
    match cli.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Optimize(args) => cmd_optimize(args),
        Command::Render(args) => cmd_render(args),
        Command::Templates(args) => cmd_templates(args),
        Command::Seed(args) => cmd_seed(args),
        Command::Edit(args) => cmd_edit(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let request = resolve_request(&args)?;
    let command = LmCommand::resolve(args.lm.as_deref())?;
    let doc = producer::generate(&command, &request)?;
    write_json(&args.out, &doc)?;
    println!(
        "Wrote generated document ({} sections) to {}",
        doc.sections.len(),
        args.out.display()
    );
    Ok(())
}

fn resolve_request(args: &GenerateArgs) -> Result<String> {
    if let Some(prompt) = &args.prompt {
        if prompt.trim().is_empty() {
            return Err(anyhow!("--prompt is empty"));
        }
        return Ok(prompt.clone());
    }
    if !args.from_stdin {
        return Err(anyhow!("provide --prompt <TEXT> or --from-stdin"));
    }
    let mut transcript = String::new();
    std::io::stdin()
        .read_to_string(&mut transcript)
        .context("read request from stdin")?;
    let transcript = transcript.trim().to_string();
    if transcript.is_empty() {
        return Err(anyhow!("stdin request is empty"));
    }
    Ok(transcript)
}

fn cmd_optimize(args: OptimizeArgs) -> Result<()> {
    let doc: Document = read_json(&args.doc)?;
    let command = LmCommand::resolve(args.lm.as_deref())?;

    // The document file is the current state; route the producer call
    // through a session so a failure provably leaves it untouched.
    let mut session = Session::new(doc);
    let token = session
        .begin_request()
        .map_err(|busy| anyhow!(busy.to_string()))?;
    match producer::optimize(&command, session.current()) {
        Ok(optimized) => {
            session.apply_response(token, optimized);
        }
        Err(err) => {
            session.abort_request(token);
            return Err(err.into());
        }
    }

    let out = args.out.as_deref().unwrap_or(&args.doc);
    write_json(out, session.current())?;
    println!("Wrote optimized document to {}", out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let doc: Document = read_json(&args.doc)?;
    let board = render::render(&doc.normalize());
    let output = if args.json {
        let mut json = serde_json::to_string_pretty(&board).context("serialize board")?;
        json.push('\n');
        json
    } else {
        render::format_board(&board)
    };
    match &args.out {
        Some(path) => {
            std::fs::write(path, output.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            println!("Wrote rendering to {}", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> Result<()> {
    let catalog = templates::load_catalog()?;
    if args.json {
        let json = serde_json::to_string_pretty(&catalog).context("serialize catalog")?;
        println!("{json}");
        return Ok(());
    }
    for entry in &catalog {
        println!(
            "{}  {} - {} ({} sections)",
            entry.id,
            entry.name,
            entry.description,
            entry.data.sections.len()
        );
    }
    Ok(())
}

fn cmd_seed(args: SeedArgs) -> Result<()> {
    let doc = templates::seed_document(&args.template)?;
    write_json(&args.out, &doc)?;
    println!("Wrote template '{}' to {}", args.template, args.out.display());
    Ok(())
}

fn cmd_edit(args: EditArgs) -> Result<()> {
    let doc: Document = read_json(&args.doc)?;
    let mut session = Session::new(doc);
    let next = apply_edit_action(session.current(), &args.action);
    session.apply_edit(next);
    let out = args.out.as_deref().unwrap_or(&args.doc);
    write_json(out, session.current())?;
    println!("Wrote edited document to {}", out.display());
    Ok(())
}

/// Route one CLI edit through the pure engines.
///
/// Section indexes that no longer exist are stale views of a superseded
/// document and fall through as no-ops.
fn apply_edit_action(doc: &Document, action: &EditAction) -> Document {
    match action {
        EditAction::SetField { field, value } => edit::update_document_field(doc, *field, value),
        EditAction::SetPoint {
            section,
            index,
            field,
            value,
        } => match doc.sections.get(*section) {
            Some(current) => {
                let updated = edit::update_data_point(current, *index, *field, value);
                edit::update_section(doc, *section, updated)
            }
            None => doc.clone(),
        },
        EditAction::AddSection => mutate::add_section(doc),
        EditAction::RemoveSection { index } => mutate::remove_section(doc, *index),
        EditAction::CycleType { index } => mutate::cycle_section_type(doc, *index),
        EditAction::AddPoint { section } => match doc.sections.get(*section) {
            Some(current) => edit::update_section(doc, *section, mutate::add_data_point(current)),
            None => doc.clone(),
        },
        EditAction::RemovePoint { section, index } => match doc.sections.get(*section) {
            Some(current) => {
                edit::update_section(doc, *section, mutate::remove_data_point(current, *index))
            }
            None => doc.clone(),
        },
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
