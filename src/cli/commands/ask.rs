//! Question answering and conversation history commands.

use crate::cli::interactive::question_loop;
use crate::cli::render;
use crate::cli::session::Session;

/// Ask one question, or start a question session when none is given.
pub async fn cmd_ask(session: &mut Session, file: &str, question: Option<&str>) -> anyhow::Result<()> {
    let document = session.load(file)?;
    let client = session.llm_client()?;

    match question.map(str::trim) {
        Some("") => anyhow::bail!("Question cannot be empty"),
        Some(question) => {
            if session.ask(&client, &document, question).await.is_none() {
                anyhow::bail!("No answer received");
            }
            Ok(())
        }
        None => {
            question_loop(session, &client, &document).await?;
            Ok(())
        }
    }
}

pub fn cmd_history(session: &Session, limit: usize) -> anyhow::Result<()> {
    render::history(session.history(), limit);
    Ok(())
}
