//! Column name normalization and deduplication
//!
//! Pure string pipeline: raw headers in, canonical unique identifiers out.
//! No column is ever dropped here; collisions are suffixed, never overwritten.

use std::collections::{HashMap, HashSet};

/// Lowercase, trim, and replace space/hyphen/colon with underscore.
/// Input order is preserved and nothing is dropped.
pub fn normalize_columns(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|name| {
            name.trim()
                .to_lowercase()
                .replace(' ', "_")
                .replace('-', "_")
                .replace(':', "_")
        })
        .collect()
}

/// Disambiguate repeats by appending `_1`, `_2`, ... to the second and later
/// occurrences, in first-seen order. The first occurrence is never suffixed.
/// A suffixed candidate that itself collides with an existing name keeps
/// counting up, so the output is pairwise distinct for any input.
pub fn deduplicate_columns(names: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if !used.contains(name) {
            used.insert(name.clone());
            counts.entry(name.clone()).or_insert(0);
            out.push(name.clone());
            continue;
        }

        let count = counts.entry(name.clone()).or_insert(0);
        let mut candidate;
        loop {
            *count += 1;
            candidate = format!("{}_{}", name, count);
            if !used.contains(&candidate) {
                break;
            }
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}
