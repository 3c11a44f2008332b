//! Suggestion engine over a bloom filter.
//!
//! The filter can only answer point membership, so suggestions are
//! reconstructed by a depth-first walk of the 26-way extension space.
//! Absent prefixes prune whole subtrees; the budget drops by one per level,
//! capping the depth; each level packs its children with
//! [`merge_branches`].

use crate::index::TERMINATOR;
use crate::query::merge::{merge_branches, Branch};
use crate::query::{NameLookup, ALPHABET};
use crate::utils::BloomFilter;
use rayon::prelude::*;
use std::sync::Arc;

/// Work done by one lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupTrace {
    /// Recursive calls, including the top-level one
    pub calls: usize,
    /// Membership tests against the filter
    pub probes: usize,
}

impl LookupTrace {
    fn absorb(&mut self, other: LookupTrace) {
        self.calls += other.calls;
        self.probes += other.probes;
    }
}

/// [`NameLookup`] answering from a read-only bloom filter
#[derive(Debug, Clone)]
pub struct BloomNameLookup {
    filter: Arc<BloomFilter>,
}

impl BloomNameLookup {
    pub fn new(filter: impl Into<Arc<BloomFilter>>) -> Self {
        Self {
            filter: filter.into(),
        }
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Lookup that also reports how much of the filter it touched
    pub fn lookup_traced(&self, prefix: &str, max: usize) -> (Vec<String>, LookupTrace) {
        let mut trace = LookupTrace::default();
        let mut buf = prefix.to_string();
        let tokens = self.explore(&mut buf, max, &mut trace);
        (tokens, trace)
    }

    /// Same output as [`lookup_tokens`](NameLookup::lookup_tokens), with the
    /// top-level letters explored on the rayon pool. All 26 sub-results are
    /// collected before the merge runs.
    pub fn lookup_parallel(&self, prefix: &str, max: usize) -> Vec<String> {
        if !self.filter.might_contain(prefix) {
            return Vec::new();
        }
        if max == 0 {
            return vec![prefix.to_string()];
        }

        let result = self.terminal_token(prefix).into_iter().collect();

        let letters: Vec<char> = ALPHABET.collect();
        let per_letter: Vec<Option<Branch>> = letters
            .into_par_iter()
            .map(|c| {
                let mut next = format!("{prefix}{c}");
                let tokens = self.explore(&mut next, max - 1, &mut LookupTrace::default());
                (!tokens.is_empty()).then_some(Branch { prefix: next, tokens })
            })
            .collect();

        merge_branches(result, per_letter.into_iter().flatten().collect(), max)
    }

    /// `prefix` with the terminator if the filter holds it as a whole word
    fn terminal_token(&self, prefix: &str) -> Option<String> {
        let word = format!("{prefix}{TERMINATOR}");
        self.filter.might_contain(&word).then_some(word)
    }

    /// `prefix` is used as a scratch buffer and is restored before returning.
    fn explore(&self, prefix: &mut String, max: usize, trace: &mut LookupTrace) -> Vec<String> {
        trace.calls += 1;
        trace.probes += 1;
        if !self.filter.might_contain(prefix) {
            return Vec::new();
        }
        if max == 0 {
            return vec![prefix.clone()];
        }

        let mut result = Vec::new();
        prefix.push(TERMINATOR);
        trace.probes += 1;
        if self.filter.might_contain(prefix) {
            result.push(prefix.clone());
        }
        prefix.pop();

        let mut branches = Vec::new();
        let mut sub_trace = LookupTrace::default();
        for c in ALPHABET {
            prefix.push(c);
            let tokens = self.explore(prefix, max - 1, &mut sub_trace);
            if !tokens.is_empty() {
                branches.push(Branch {
                    prefix: prefix.clone(),
                    tokens,
                });
            }
            prefix.pop();
        }
        trace.absorb(sub_trace);

        merge_branches(result, branches, max)
    }
}

impl NameLookup for BloomNameLookup {
    fn lookup_tokens(&self, prefix: &str, max: usize) -> Vec<String> {
        let (tokens, trace) = self.lookup_traced(prefix, max);
        tracing::trace!(prefix, max, calls = trace.calls, probes = trace.probes, "bloom lookup");
        tokens
    }
}
