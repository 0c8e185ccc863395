use recall_core::types::RetrievalHit;
use recall_hybrid::fuse;

fn hit(doc: &str) -> RetrievalHit {
    RetrievalHit {
        document_id: doc.to_string(),
        chunk_index: 0,
        content: format!("content of {doc}"),
        title: format!("{doc}.txt"),
        backend_score: 0.0,
    }
}

fn ids(results: &[recall_core::types::FusedResult]) -> Vec<&str> {
    results.iter().map(|r| r.document_id.as_str()).collect()
}

fn approx(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

#[test]
fn weighted_rank_fusion_numeric_example() {
    let vector = [hit("A"), hit("B"), hit("C")];
    let lexical = [hit("B"), hit("D")];

    let fused = fuse(&vector, &lexical, 0.5, 0.5, 10);
    assert_eq!(ids(&fused), vec!["B", "A", "D", "C"]);

    let by_id = |id: &str| fused.iter().find(|r| r.document_id == id).expect("present");
    let b = by_id("B");
    assert!(approx(b.vector_rank_score, 0.667) && approx(b.lexical_rank_score, 1.0));
    assert!(approx(b.combined_score, 0.833));
    assert!(approx(by_id("A").combined_score, 0.5));
    assert!(approx(by_id("D").combined_score, 0.25));
    assert!(approx(by_id("D").vector_rank_score, 0.0));
    assert!(approx(by_id("C").combined_score, 0.167));
    assert_eq!(b.title, "B.txt");
    assert_eq!(b.content, "content of B");
}

#[test]
fn missing_side_is_purely_the_other_side_scaled() {
    let lexical = [hit("B"), hit("D")];
    let fused = fuse(&[], &lexical, 0.5, 0.5, 10);
    assert_eq!(ids(&fused), vec!["B", "D"]);
    assert!(approx(fused[0].combined_score, 0.5));
    assert!(approx(fused[1].combined_score, 0.25));
}

#[test]
fn both_empty_is_empty() {
    assert!(fuse(&[], &[], 0.5, 0.5, 5).is_empty());
}

#[test]
fn output_is_truncated_to_limit() {
    let vector = [hit("A"), hit("B"), hit("C")];
    let lexical = [hit("B"), hit("D")];
    assert_eq!(ids(&fuse(&vector, &lexical, 0.5, 0.5, 2)), vec!["B", "A"]);
    assert!(fuse(&vector, &lexical, 0.5, 0.5, 0).is_empty());
}

#[test]
fn weights_shift_the_ranking() {
    let vector = [hit("A"), hit("B")];
    let lexical = [hit("C"), hit("A")];
    assert_eq!(ids(&fuse(&vector, &lexical, 1.0, 0.0, 10)), vec!["A", "B", "C"]);
    assert_eq!(ids(&fuse(&vector, &lexical, 0.0, 1.0, 10)), vec!["C", "A", "B"]);
}
