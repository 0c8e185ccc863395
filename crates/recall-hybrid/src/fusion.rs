//! Weighted rank fusion of the vector and lexical result lists.
//!
//! Native backend scores are discarded: hit `i` of an `N`-long list scores
//! `(N - i) / N`, so only the order inside each list matters.

use std::collections::{HashMap, HashSet};

use recall_core::types::{FusedResult, FusionKey, RetrievalHit};

pub fn rank_score(position: usize, len: usize) -> f32 {
    if len == 0 { return 0.0; }
    (len - position) as f32 / len as f32
}

/// Merge two ranked lists into one, best first, at most `limit` long.
///
/// A unit missing from one list contributes 0 for that side. Only the first
/// occurrence of a key within a list counts. Equal combined scores keep
/// insertion order: vector-list order first, then lexical-only units in
/// lexical order.
pub fn fuse(
    vector_hits: &[RetrievalHit],
    lexical_hits: &[RetrievalHit],
    weight_vector: f32,
    weight_lexical: f32,
    limit: usize,
) -> Vec<FusedResult> {
    let mut merged: Vec<FusedResult> = Vec::with_capacity(vector_hits.len() + lexical_hits.len());
    let mut slots: HashMap<FusionKey, usize> = HashMap::new();

    let n = vector_hits.len();
    for (i, hit) in vector_hits.iter().enumerate() {
        let key = hit.key();
        if slots.contains_key(&key) { continue; }
        let score = rank_score(i, n);
        slots.insert(key, merged.len());
        merged.push(FusedResult {
            content: hit.content.clone(),
            document_id: hit.document_id.clone(),
            chunk_index: hit.chunk_index,
            title: hit.title.clone(),
            vector_rank_score: score,
            lexical_rank_score: 0.0,
            combined_score: score * weight_vector,
        });
    }

    let n = lexical_hits.len();
    let mut seen: HashSet<FusionKey> = HashSet::new();
    for (i, hit) in lexical_hits.iter().enumerate() {
        let key = hit.key();
        if !seen.insert(key.clone()) { continue; }
        let score = rank_score(i, n);
        if let Some(slot) = slots.get(&key).copied() {
            let fused = &mut merged[slot];
            fused.lexical_rank_score = score;
            fused.combined_score += score * weight_lexical;
        } else {
            slots.insert(key, merged.len());
            merged.push(FusedResult {
                content: hit.content.clone(),
                document_id: hit.document_id.clone(),
                chunk_index: hit.chunk_index,
                title: hit.title.clone(),
                vector_rank_score: 0.0,
                lexical_rank_score: score,
                combined_score: score * weight_lexical,
            });
        }
    }

    merged.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    merged.truncate(limit);
    merged
}
