//! Interactive menus, used when doclens runs without a subcommand.
//!
//! Every failure inside a menu is printed as a single line and the menu
//! continues. Closing stdin leaves the current menu.

use console::style;

use super::commands::export_with;
use super::input::{confirm, parse_choice, pause, read_line};
use super::render;
use super::session::{QuestionInput, Session};
use crate::credentials::{mask_key, KeyStatus};
use crate::export::JsonFileSink;
use crate::history::RECENT_ENTRIES;
use crate::llm::{Answerer, LlmError};
use crate::models::Document;

/// Main menu loop.
pub async fn run(session: &mut Session) -> anyhow::Result<()> {
    println!("{}", style("doclens - document analysis").bold());
    println!("{}", "=".repeat(42));
    println!("Ask a language model about a document, or analyze it locally.");

    loop {
        println!("\n{}", style("Main Menu").bold());
        println!("{}", "-".repeat(24));
        println!("1 - AI mode (ask questions)");
        println!("2 - Analysis mode (no AI)");
        println!("3 - List files");
        println!("4 - Conversation history");
        println!("5 - Quit");

        let Some(choice) = read_line("\nChoose an option: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => ai_menu(session).await?,
            "2" => {
                if let Some(document) = pick_document(session)? {
                    analysis_menu(session, &document)?;
                }
            }
            "3" => list_files(session),
            "4" => render::history(session.history(), RECENT_ENTRIES),
            "5" => {
                println!("\nThanks for using doclens!");
                break;
            }
            _ => render::error("Invalid option, try again"),
        }
    }
    Ok(())
}

fn list_files(session: &Session) {
    match session.library().list() {
        Ok(entries) if entries.is_empty() => no_files(session),
        Ok(entries) => {
            println!(
                "\n{} ({} found)",
                style("Available files").bold(),
                entries.len()
            );
            render::file_list(&entries);
        }
        Err(e) => render::error(format!("Could not list files: {}", e)),
    }
}

fn no_files(session: &Session) {
    render::error(format!(
        "No PDF or TXT files found in {}",
        session.library().inputs_dir().display()
    ));
}

/// List documents, let the user choose one and load it.
fn pick_document(session: &Session) -> anyhow::Result<Option<Document>> {
    let entries = match session.library().list() {
        Ok(entries) => entries,
        Err(e) => {
            render::error(format!("Could not list files: {}", e));
            return Ok(None);
        }
    };
    if entries.is_empty() {
        no_files(session);
        return Ok(None);
    }

    println!("\n{}", style("Select a file:").bold());
    render::file_list(&entries);

    let Some(input) = read_line(&format!("\nChoose (1-{}): ", entries.len()))? else {
        return Ok(None);
    };
    if input.parse::<usize>().is_err() {
        render::error("Please enter a number");
        return Ok(None);
    }
    let Some(index) = parse_choice(&input, entries.len()) else {
        render::error("Invalid choice");
        return Ok(None);
    };

    match session.library().load(&entries[index].name) {
        Ok(document) if document.is_empty() => {
            render::error(format!("{} has no text", document.source()));
            Ok(None)
        }
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            render::error(format!("Could not load {}: {}", entries[index].name, e));
            Ok(None)
        }
    }
}

fn analysis_menu(session: &Session, document: &Document) -> anyhow::Result<()> {
    let analyzer = session.analyzer(document);

    loop {
        println!(
            "\n{} {}",
            style("Analysis Mode -").bold(),
            style(document.source()).cyan()
        );
        println!("{}", "-".repeat(50));
        println!("1 - Document summary");
        println!("2 - Search for a word");
        println!("3 - Keywords");
        println!("4 - Statistics");
        println!("5 - Compare words");
        println!("6 - Metadata");
        println!("7 - Export analysis");
        println!("8 - Back");

        let Some(choice) = read_line("\nChoose an option: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => render::summary(&analyzer.summarize()),
            "2" => {
                if let Some(term) = read_line("Word to search for: ")?.filter(|t| !t.is_empty()) {
                    render::search(&analyzer.search(&term));
                }
            }
            "3" => render::keywords(&analyzer.keyword_frequency()),
            "4" => render::statistics(analyzer.statistics().as_ref()),
            "5" => {
                let first = read_line("First word: ")?.unwrap_or_default();
                let second = read_line("Second word: ")?.unwrap_or_default();
                if !first.is_empty() && !second.is_empty() {
                    render::comparison(&analyzer.compare(&first, &second));
                }
            }
            "6" => render::metadata(document),
            "7" => {
                let sink = JsonFileSink::new(&session.settings().export_dir);
                if let Err(e) = export_with(session, document, &sink) {
                    render::error(format!("Export failed: {}", e));
                }
            }
            "8" => return Ok(()),
            _ => render::error("Invalid option"),
        }

        pause()?;
    }
}

fn ai_unavailable(error: &LlmError) {
    render::error(error);
    if matches!(error, LlmError::MissingApiKey) {
        render::hint("Configure your key first in the key menu");
    }
}

async fn ai_menu(session: &mut Session) -> anyhow::Result<()> {
    loop {
        render::heading("AI Mode");
        render::key_status(&session.credentials().status());
        println!("\n1 - Select a file and ask questions");
        println!("2 - Manage API key");
        println!("3 - Back to main menu");

        let Some(choice) = read_line("\nChoose: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => match session.llm_client() {
                Ok(client) => {
                    if let Some(document) = pick_document(session)? {
                        question_loop(session, &client, &document).await?;
                    }
                }
                Err(e) => ai_unavailable(&e),
            },
            "2" => key_menu(session)?,
            "3" => return Ok(()),
            _ => render::error("Invalid option"),
        }

        pause()?;
    }
}

/// Ask questions until the user leaves.
pub async fn question_loop(
    session: &mut Session,
    answerer: &dyn Answerer,
    document: &Document,
) -> anyhow::Result<()> {
    println!(
        "\n{} {}",
        style("AI Mode -").bold(),
        style(document.source()).cyan()
    );
    println!("{}", "=".repeat(50));
    render::hint(format!("Answering with {}", answerer.describe()));
    render::hint("Type 'exit' to leave, 'menu' to return to the menu");

    loop {
        let Some(input) = read_line("\nYour question: ")? else {
            return Ok(());
        };
        match QuestionInput::parse(&input) {
            QuestionInput::Leave | QuestionInput::Menu => return Ok(()),
            QuestionInput::Empty => render::error("Question cannot be empty"),
            QuestionInput::Question(question) => {
                session.ask(answerer, document, &question).await;
            }
        }
    }
}

fn key_menu(session: &mut Session) -> anyhow::Result<()> {
    loop {
        render::heading("Manage API Key");
        render::key_status(&session.credentials().status());
        println!("\n1 - Add/update OpenAI key");
        println!("2 - Remove OpenAI key");
        println!("3 - Back");

        let Some(choice) = read_line("\nChoose: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => set_key(session)?,
            "2" => {
                if let KeyStatus::Missing = session.credentials().status() {
                    render::error("No key to remove");
                } else if confirm("Are you sure you want to remove the key?")? {
                    match session.credentials_mut().remove_openai_key() {
                        Ok(_) => render::success("Key removed"),
                        Err(e) => render::error(e),
                    }
                }
            }
            "3" => return Ok(()),
            _ => render::error("Invalid option"),
        }

        pause()?;
    }
}

fn set_key(session: &mut Session) -> anyhow::Result<()> {
    render::hint("Get a key at https://platform.openai.com/api-keys");
    if let Some(current) = session.credentials().openai_key() {
        println!("Current key: {}", mask_key(current));
        if !confirm("Replace it?")? {
            return Ok(());
        }
    }

    let key = read_line("New key: ")?.unwrap_or_default();
    if key.is_empty() {
        return Ok(());
    }
    match session.credentials_mut().set_openai_key(&key) {
        Ok(()) => render::success("Key saved"),
        Err(e) => render::error(e),
    }
    Ok(())
}
