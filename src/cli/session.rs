//! Per-run state shared by subcommands and the interactive menus.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::render;
use crate::analysis::{select_tokenizer, DocumentAnalyzer, TokenizerStrategy};
use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::documents::{DocumentLibrary, LoadError};
use crate::history::{ConversationHistory, MODE_AI};
use crate::llm::{Answerer, LlmClient, LlmError};
use crate::models::Document;

/// What a line typed in the question loop means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionInput {
    /// `exit`, `quit` or `sair`
    Leave,
    /// `menu`
    Menu,
    Empty,
    Question(String),
}

impl QuestionInput {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "exit" | "quit" | "sair" => Self::Leave,
            "menu" => Self::Menu,
            _ => Self::Question(trimmed.to_string()),
        }
    }
}

/// Settings plus the collaborators built from them.
pub struct Session {
    settings: Settings,
    library: DocumentLibrary,
    tokenizer: Box<dyn TokenizerStrategy>,
    credentials: CredentialStore,
    history: ConversationHistory,
}

impl Session {
    /// Open the credential and history files, reporting problems as warnings.
    pub fn new(settings: Settings) -> Self {
        let tokenizer = select_tokenizer(settings.tokenizer, &settings.stopword_resources());
        debug!("Using {} tokenizer", tokenizer.name());

        let credentials = CredentialStore::open(&settings.credentials_file).unwrap_or_else(|e| {
            render::error(format!("Could not load API keys: {}", e));
            CredentialStore::empty(&settings.credentials_file)
        });
        let history = ConversationHistory::open(&settings.history_file).unwrap_or_else(|e| {
            render::error(format!("Could not load history: {}", e));
            ConversationHistory::empty(&settings.history_file)
        });

        Self {
            library: DocumentLibrary::new(&settings.inputs_dir),
            settings,
            tokenizer,
            credentials,
            history,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn library(&self) -> &DocumentLibrary {
        &self.library
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut CredentialStore {
        &mut self.credentials
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Load by file name from the inputs directory, or from an existing path.
    pub fn load(&self, file: &str) -> Result<Document, LoadError> {
        let path = Path::new(file);
        if path.components().count() > 1 && path.is_file() {
            self.library.load_path(path)
        } else {
            self.library.load(file)
        }
    }

    pub fn analyzer(&self, document: &Document) -> DocumentAnalyzer {
        DocumentAnalyzer::new(document, self.tokenizer.as_ref())
            .with_options(self.settings.analysis.clone())
    }

    /// API key from the key file, else from `LLM_API_KEY`/`OPENAI_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.credentials
            .openai_key()
            .map(str::to_string)
            .or_else(|| std::env::var("LLM_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Build a client for the configured provider.
    pub fn llm_client(&self) -> Result<LlmClient, LlmError> {
        let config = self.settings.llm.clone();
        if !config.enabled {
            return Err(LlmError::Disabled);
        }
        let api_key = self.api_key();
        if config.provider.requires_api_key() && api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }
        LlmClient::new(config, api_key)
    }

    /// Ask one question, print the answer and log it.
    ///
    /// API failures are printed and yield `None`; a history save failure is
    /// only a warning.
    pub async fn ask(
        &mut self,
        answerer: &dyn Answerer,
        document: &Document,
        question: &str,
    ) -> Option<String> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Asking {}...", answerer.describe()));
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = answerer.answer(document.text(), question).await;
        pb.finish_and_clear();

        match result {
            Ok(answer) => {
                println!("\n{}\n{}", console::style("Answer:").bold(), answer);
                if let Err(e) = self
                    .history
                    .record(document.source(), MODE_AI, question, &answer)
                {
                    println!(
                        "{} Could not save to history: {}",
                        console::style("!").yellow(),
                        e
                    );
                }
                Some(answer)
            }
            Err(e) => {
                render::error(format!("API call failed: {}", e));
                render::hint("Check your API key and internet connection");
                None
            }
        }
    }
}
