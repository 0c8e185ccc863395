use std::fs;

use recall_core::data_processor::DataProcessor;
use recall_core::traits::{Embedder, VectorBackend};
use recall_embed::HashEmbedder;
use recall_vector::FlatVectorIndex;
use tempfile::TempDir;

#[test]
fn flat_index_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("fire.txt"), "start a fire with dry tinder\n\nbank the fire overnight").expect("write");
    fs::write(tmp.path().join("water.txt"), "filter and boil water").expect("write");
    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 3);

    let embedder = HashEmbedder::new(256).expect("embedder");
    let index = FlatVectorIndex::build(&embedder, &chunks).expect("build");
    assert_eq!(index.len(), 3);

    let q = embedder.embed("bank the fire overnight").expect("embed");
    let hits = index.search(&q, 2).expect("search");
    eprintln!("flat: {} hits", hits.len());
    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].document_id.as_str(), hits[0].chunk_index), ("fire", 1));
    assert!((hits[0].backend_score - 1.0).abs() < 1e-5, "exact text is its own nearest neighbour");
    assert!(hits[0].backend_score >= hits[1].backend_score);
}
