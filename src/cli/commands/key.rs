//! API key management commands.

use console::style;

use crate::cli::input::{confirm, read_line};
use crate::cli::render;
use crate::cli::session::Session;

pub fn cmd_key_status(session: &Session) -> anyhow::Result<()> {
    render::heading("API Key Status");
    render::key_status(&session.credentials().status());
    println!(
        "  {}",
        style(session.credentials().path().display()).dim()
    );
    Ok(())
}

pub fn cmd_key_set(session: &mut Session, key: Option<&str>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key.to_string(),
        None => {
            render::hint("Get a key at https://platform.openai.com/api-keys");
            read_line("New key: ")?.unwrap_or_default()
        }
    };

    session.credentials_mut().set_openai_key(&key)?;
    render::success("Key saved");
    Ok(())
}

pub fn cmd_key_remove(session: &mut Session, yes: bool) -> anyhow::Result<()> {
    if session.credentials().openai_key().is_none() {
        render::error("No key to remove");
        return Ok(());
    }
    if !yes && !confirm("Remove the stored key?")? {
        println!("{} Cancelled", style("!").yellow());
        return Ok(());
    }

    session.credentials_mut().remove_openai_key()?;
    render::success("Key removed");
    Ok(())
}
