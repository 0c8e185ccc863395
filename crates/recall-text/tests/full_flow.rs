use std::fs;

use recall_core::data_processor::DataProcessor;
use recall_core::traits::{LexicalBackend, SearchQuery};
use recall_core::types::Intent;
use recall_text::{QueryNormalizer, TantivyBackend};
use tempfile::TempDir;

#[test]
fn tantivy_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir_all(tmp.path().join("survival")).expect("mkdir");
    fs::write(
        tmp.path().join("survival/firecraft.txt"),
        "Firecraft basics.\n\nA ferro rod throws hot sparks onto tinder.\n\nKeep the fire small and sheltered.",
    )
    .expect("write");
    fs::write(tmp.path().join("networking.txt"), "Routers forward packets between networks.").expect("write");

    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 4);
    let backend = TantivyBackend::new(&chunks).expect("index");

    let normalizer = QueryNormalizer::new();
    let q = normalizer.normalize("How do I keep the FIRE going?");
    assert_eq!(q.intent, Intent::Informational);
    assert_eq!(q.cleaned, "how do i keep fire going");

    let hits = backend.search(&SearchQuery { text: &q.cleaned, vector: &[] }, 10).expect("search");
    eprintln!("q='{}' -> {} hits", q.cleaned, hits.len());
    assert!(!hits.is_empty());
    assert_eq!(hits[0].document_id, "firecraft");
    assert_eq!(hits[0].chunk_index, 2);
    assert_eq!(hits[0].title, "firecraft.txt");
    for pair in hits.windows(2) { assert!(pair[0].backend_score >= pair[1].backend_score); }

    let net = backend.search(&SearchQuery { text: "packets", vector: &[] }, 10).expect("search");
    assert_eq!(net.len(), 1);
    assert_eq!(net[0].document_id, "networking");
}
