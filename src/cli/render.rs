//! Terminal output for analysis results.

use std::fmt::Display;

use console::style;

use crate::analysis::{Comparison, KeywordReport, SearchResults, Summary, TextStatistics, Verdict};
use crate::credentials::KeyStatus;
use crate::documents::FileEntry;
use crate::history::{preview, ConversationHistory, PREVIEW_CHARS};
use crate::models::Document;

pub fn error(msg: impl Display) {
    println!("{} {}", style("✗").red(), msg);
}

pub fn success(msg: impl Display) {
    println!("{} {}", style("✓").green(), msg);
}

pub fn hint(msg: impl Display) {
    println!("  {}", style(msg).dim());
}

pub fn heading(title: impl Display) {
    println!("\n{}", style(title).bold());
    println!("{}", "-".repeat(50));
}

pub fn file_list(entries: &[FileEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            entry.name,
            style(format!("({:.2} KB)", entry.size_kb())).dim()
        );
    }
}

pub fn summary(summary: &Summary) {
    heading("Document Summary");
    println!("  Sentences:          {}", summary.sentence_count);
    println!("  Content words:      {}", summary.word_count);
    println!("  Unique words:       {}", summary.unique_word_count);
    println!("  Lexical density:    {}", density(summary.lexical_density));

    if !summary.page_previews.is_empty() {
        println!("\n{}", style("Page previews:").cyan());
        for page in &summary.page_previews {
            let ellipsis = if page.truncated { "..." } else { "" };
            println!(
                "  {} {}{}",
                style(format!("Page {}:", page.page)).yellow(),
                page.text,
                ellipsis
            );
        }
    }
}

/// Lexical density as a percentage, or `n/a` for documents without content words.
fn density(value: Option<f64>) -> String {
    match value {
        Some(density) => format!("{:.1}%", density * 100.0),
        None => "n/a".to_string(),
    }
}

pub fn search(results: &SearchResults) {
    heading(format!("Search: '{}'", results.term));
    if results.total == 0 {
        error("Term not found");
        return;
    }

    success(format!("Found {} times", results.total));
    for (i, snippet) in results.snippets.iter().enumerate() {
        println!("\n  {}. ...{}...", i + 1, snippet);
    }
    if results.hidden() > 0 {
        println!(
            "\n  {}",
            style(format!("... and {} more results", results.hidden())).dim()
        );
    }
}

pub fn keywords(report: &KeywordReport) {
    if report.top.is_empty() {
        error("Nothing to analyze");
        return;
    }

    heading("Keywords");
    println!("{}", style("Most frequent words:").cyan());
    for entry in &report.top {
        println!("  {:<24} {}x", entry.word, entry.count);
    }

    if !report.long_words.is_empty() {
        println!("\n{}", style("Technical terms (long words):").cyan());
        for entry in &report.long_words {
            println!("  {:<24} {}x", entry.word, entry.count);
        }
    }
}

pub fn statistics(stats: Option<&TextStatistics>) {
    let Some(stats) = stats else {
        error("Insufficient data");
        return;
    };

    heading("Detailed Statistics");
    println!(
        "  Mean words per sentence:  {:.1}",
        stats.mean_words_per_sentence
    );
    println!(
        "  Mean letters per word:    {:.2}",
        stats.mean_letters_per_word
    );
    println!(
        "  Longest sentence:         {} words",
        stats.max_words_in_sentence
    );
    println!(
        "  Shortest sentence:        {} words",
        stats.min_words_in_sentence
    );
    println!(
        "  Words occurring once:     {}",
        stats.single_occurrence_words
    );
}

pub fn comparison(comparison: &Comparison) {
    heading("Comparison");
    println!(
        "  '{}': {} occurrences",
        comparison.first, comparison.first_count
    );
    println!(
        "  '{}': {} occurrences",
        comparison.second, comparison.second_count
    );
    match comparison.verdict {
        Verdict::Tie => println!("{} {}", style("=").yellow(), comparison.verdict_text()),
        _ => success(comparison.verdict_text()),
    }
}

pub fn metadata(document: &Document) {
    heading(format!("Metadata: {}", document.source()));
    for (label, value) in document.metadata().display_rows() {
        println!("  {:<10} {}", label, value);
    }

    let stats = document.basic_stats();
    println!("\n{}", style("Basic statistics:").cyan());
    println!("  {:<14} {}", "words", stats.words);
    println!("  {:<14} {}", "characters", stats.characters);
    println!("  {:<14} {}", "unique words", stats.unique_words);
}

pub fn key_status(status: &KeyStatus) {
    match status {
        KeyStatus::Configured { masked } => {
            println!("  OpenAI key: {} {}", style("✓ configured").green(), masked)
        }
        KeyStatus::Missing => println!("  OpenAI key: {}", style("✗ not configured").red()),
    }
}

pub fn history(history: &ConversationHistory, limit: usize) {
    if history.is_empty() {
        println!("No conversations in history yet.");
        return;
    }

    heading("Conversation History");
    for (i, entry) in history.recent(limit).iter().enumerate() {
        println!(
            "{}. [{}] {} - {}",
            i + 1,
            entry.short_date(),
            entry.mode,
            style(&entry.file).cyan()
        );
        println!("   Question: {}...", preview(&entry.question, PREVIEW_CHARS));
        println!("   Answer:   {}...", preview(&entry.answer, PREVIEW_CHARS));
        println!("{}", "-".repeat(70));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DocumentAnalyzer, ManualTokenizer};

    #[test]
    fn test_density() {
        assert_eq!(density(Some(0.8333)), "83.3%");
        assert_eq!(density(Some(1.0)), "100.0%");
        assert_eq!(density(None), "n/a");
    }

    #[test]
    fn test_density_without_content_words() {
        let analyzer = DocumentAnalyzer::from_text("a.txt", "de da do.", &ManualTokenizer);
        assert_eq!(density(analyzer.summarize().lexical_density), "n/a");
    }
}
