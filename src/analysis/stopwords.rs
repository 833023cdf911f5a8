//! Stopword sets for both tokenizer strategies.
//!
//! The manual strategy uses a fixed list of Portuguese function words compiled
//! into the binary. The linguistic strategy reads larger Portuguese and English
//! lists from the resources directory; `doclens resources install` writes the
//! bundled copies there.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tracing::{debug, info};

use super::tokenizer::TokenizerError;

/// Function words removed by the manual tokenizer.
pub const MANUAL_STOPWORDS: [&str; 16] = [
    "o", "a", "e", "de", "do", "da", "em", "um", "uma", "para", "com", "os", "as", "se", "que",
    "por",
];

static MANUAL_STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| MANUAL_STOPWORDS.iter().copied().collect());

/// The manual tokenizer's stopword set.
pub fn manual_stopwords() -> &'static HashSet<&'static str> {
    &MANUAL_STOPWORD_SET
}

/// Languages with an installable stopword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwordLanguage {
    Portuguese,
    English,
}

impl StopwordLanguage {
    pub const ALL: [StopwordLanguage; 2] = [StopwordLanguage::Portuguese, StopwordLanguage::English];

    pub fn as_str(&self) -> &'static str {
        match self {
            StopwordLanguage::Portuguese => "portuguese",
            StopwordLanguage::English => "english",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }

    /// The list shipped with doclens, one word per line.
    pub fn bundled(&self) -> &'static str {
        match self {
            StopwordLanguage::Portuguese => {
                include_str!("../../resources/stopwords/portuguese.txt")
            }
            StopwordLanguage::English => include_str!("../../resources/stopwords/english.txt"),
        }
    }
}

/// Parse a stopword list: one word per line, blank lines and `#` comments ignored.
pub fn parse_stopword_list(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
}

/// On-disk stopword lists used by the linguistic tokenizer.
#[derive(Debug, Clone)]
pub struct StopwordResources {
    dir: PathBuf,
}

impl StopwordResources {
    /// Lists live in `<resources_dir>/stopwords`.
    pub fn new(resources_dir: &Path) -> Self {
        Self {
            dir: resources_dir.join("stopwords"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, language: StopwordLanguage) -> PathBuf {
        self.dir.join(language.file_name())
    }

    /// Availability of each list.
    pub fn status(&self) -> Vec<(StopwordLanguage, bool)> {
        StopwordLanguage::ALL
            .iter()
            .map(|lang| (*lang, self.path(*lang).is_file()))
            .collect()
    }

    pub fn is_installed(&self) -> bool {
        self.status().iter().all(|(_, present)| *present)
    }

    /// Write the bundled lists, replacing any existing copies.
    pub fn install(&self) -> Result<Vec<PathBuf>, TokenizerError> {
        fs::create_dir_all(&self.dir)?;
        let mut written = Vec::with_capacity(StopwordLanguage::ALL.len());
        for lang in StopwordLanguage::ALL {
            let path = self.path(lang);
            fs::write(&path, lang.bundled())?;
            info!("Installed {} stopwords to {}", lang.as_str(), path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Load the union of every language's list.
    pub fn load(&self) -> Result<HashSet<String>, TokenizerError> {
        let mut words = HashSet::new();
        for lang in StopwordLanguage::ALL {
            let path = self.path(lang);
            let contents = fs::read_to_string(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TokenizerError::ResourceMissing(path.clone())
                } else {
                    TokenizerError::Io(e)
                }
            })?;
            words.extend(parse_stopword_list(&contents));
        }
        debug!("Loaded {} stopwords from {}", words.len(), self.dir.display());
        Ok(words)
    }
}
