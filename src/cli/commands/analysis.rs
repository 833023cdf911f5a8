//! Local analysis commands.

use std::path::Path;

use console::style;

use crate::cli::render;
use crate::cli::session::Session;
use crate::export::{ExportSink, JsonFileSink};
use crate::models::Document;

/// List documents in the inputs directory.
pub fn cmd_ls(session: &Session) -> anyhow::Result<()> {
    let entries = session.library().list()?;
    if entries.is_empty() {
        println!(
            "No PDF or TXT files found in {}",
            style(session.library().inputs_dir().display()).cyan()
        );
        return Ok(());
    }

    println!(
        "\n{} ({} found)",
        style("Available files").bold(),
        entries.len()
    );
    render::file_list(&entries);
    Ok(())
}

pub fn cmd_summary(session: &Session, file: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::summary(&session.analyzer(&document).summarize());
    Ok(())
}

pub fn cmd_search(session: &Session, file: &str, term: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::search(&session.analyzer(&document).search(term));
    Ok(())
}

pub fn cmd_keywords(session: &Session, file: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::keywords(&session.analyzer(&document).keyword_frequency());
    Ok(())
}

pub fn cmd_stats(session: &Session, file: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::statistics(session.analyzer(&document).statistics().as_ref());
    Ok(())
}

pub fn cmd_compare(session: &Session, file: &str, first: &str, second: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::comparison(&session.analyzer(&document).compare(first, second));
    Ok(())
}

pub fn cmd_metadata(session: &Session, file: &str) -> anyhow::Result<()> {
    let document = session.load(file)?;
    render::metadata(&document);
    Ok(())
}

pub fn cmd_export(session: &Session, file: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let document = session.load(file)?;
    let dir = output.unwrap_or(session.settings().export_dir.as_path());
    let sink = JsonFileSink::new(dir);
    export_with(session, &document, &sink)
}

/// Export through any sink, printing where it went.
pub(crate) fn export_with(
    session: &Session,
    document: &Document,
    sink: &dyn ExportSink,
) -> anyhow::Result<()> {
    let location = session.analyzer(document).export(sink)?;
    render::success(format!("Analysis saved to {}", location));
    Ok(())
}
