//! Tokenizer resource and external tool checks.

use console::style;

use crate::cli::render;
use crate::cli::session::Session;
use crate::documents::check_tools;
use crate::llm::Answerer;

pub fn cmd_resources_install(session: &Session) -> anyhow::Result<()> {
    let resources = session.settings().stopword_resources();
    let written = resources.install()?;
    for path in &written {
        render::success(format!("Installed {}", path.display()));
    }
    println!("The linguistic tokenizer is now available.");
    Ok(())
}

pub async fn cmd_resources_check(session: &Session) -> anyhow::Result<()> {
    let resources = session.settings().stopword_resources();

    println!("\n{}", style("Tokenizer Resources").bold());
    println!("{}", "-".repeat(50));
    for (language, present) in resources.status() {
        let status = if present {
            style("✓ found").green()
        } else {
            style("✗ not found").red()
        };
        println!("  {:<15} {}", language.as_str(), status);
    }
    if !resources.is_installed() {
        println!(
            "                  {}",
            style("Run `doclens resources install` to enable the linguistic tokenizer").dim()
        );
    }

    println!("\n{}", style("PDF Tools:").cyan());
    let mut all_found = true;
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }
    if !all_found {
        println!(
            "                  {}",
            style("Install poppler-utils to load PDF files").dim()
        );
    }

    println!("\n{}", style("Language Model:").cyan());
    match session.llm_client() {
        Ok(client) => {
            let status = if client.is_available().await {
                style("✓ reachable").green()
            } else {
                style("✗ not reachable").red()
            };
            println!("  {:<15} {}", client.describe(), status);
            println!(
                "                  {}",
                style(client.config().endpoint()).dim()
            );
        }
        Err(e) => println!("  {}", style(format!("✗ {}", e)).red()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::llm::LlmProvider;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_check_reports_unreachable_model() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::with_data_dir(temp.path().to_path_buf());
        settings.llm = settings
            .llm
            .with_provider(LlmProvider::Ollama)
            .with_endpoint("http://127.0.0.1:9");
        settings.llm.timeout_secs = 2;
        let session = Session::new(settings);

        let client = session.llm_client().unwrap();
        assert_eq!(client.config().endpoint(), "http://127.0.0.1:9");
        assert!(!client.is_available().await);
        assert!(cmd_resources_check(&session).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_with_model_disabled() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::with_data_dir(temp.path().to_path_buf());
        settings.llm.enabled = false;
        let session = Session::new(settings);

        assert!(session.llm_client().is_err());
        assert!(cmd_resources_check(&session).await.is_ok());
    }
}
