//! Load a document from an inputs directory, analyze it and export the result.

use std::fs;

use doclens::analysis::{DocumentAnalyzer, ManualTokenizer};
use doclens::documents::{DocumentLibrary, LoadError};
use doclens::export::JsonFileSink;
use tempfile::TempDir;

#[test]
fn list_load_analyze_export() {
    let temp = TempDir::new().unwrap();
    let inputs = temp.path().join("inputs");
    fs::create_dir(&inputs).unwrap();
    fs::write(
        inputs.join("relatorio.anual.txt"),
        "O orçamento cresceu.\nO orçamento foi aprovado pela comissão!\n\nFim.",
    )
    .unwrap();
    fs::write(inputs.join("notes.md"), "ignored").unwrap();

    let library = DocumentLibrary::new(&inputs);
    let entries = library.list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "relatorio.anual.txt");

    let document = library.load(&entries[0].name).unwrap();
    assert_eq!(document.basic_stats().words, 10);

    let analyzer = DocumentAnalyzer::from_text(document.source(), document.raw_text(), &ManualTokenizer);
    assert_eq!(analyzer.sentences().len(), 3);
    assert_eq!(analyzer.search("ORÇAMENTO").total, 1);

    let out = temp.path().join("exports");
    let location = analyzer.export(&JsonFileSink::new(&out)).unwrap();
    assert!(location.ends_with("analysis_relatorio.json"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("analysis_relatorio.json")).unwrap())
            .unwrap();
    assert_eq!(json["statistics"]["sentences"], 3);
    assert_eq!(json["top_words"][0]["word"], "orçamento");
    assert_eq!(json["top_words"][0]["count"], 2);
}

#[test]
fn load_failures_are_typed() {
    let temp = TempDir::new().unwrap();
    let library = DocumentLibrary::new(temp.path());
    assert!(matches!(library.load("nope.pdf"), Err(LoadError::NotFound(_))));
    assert!(matches!(
        library.load("deck.pptx"),
        Err(LoadError::UnsupportedFormat(_))
    ));
}
