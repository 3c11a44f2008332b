//! Exact lookups over a sorted in-memory name table.
//!
//! A query range-scans the table for names starting with the prefix,
//! builds a prefix tree of what it found and runs the same budgeted walk
//! as the bloom engine, with node existence standing in for membership.
//! With a filter free of false positives both engines agree token for token.

use crate::error::Result;
use crate::index::{DictionaryEncoder, TERMINATOR};
use crate::query::merge::{merge_branches, Branch};
use crate::query::{NameLookup, ALPHABET};
use crate::utils::split_lines;
use ahash::AHashMap;

#[derive(Debug, Default)]
struct PrefixNode {
    word: bool,
    children: AHashMap<char, PrefixNode>,
}

impl PrefixNode {
    fn insert(&mut self, suffix: &str) {
        let mut curr = self;
        for c in suffix.chars() {
            curr = curr.children.entry(c).or_default();
        }
        curr.word = true;
    }
}

/// [`NameLookup`] over a sorted, deduplicated list of names
#[derive(Debug, Clone)]
pub struct SortedNameLookup {
    names: Vec<String>,
    encoder: DictionaryEncoder,
}

impl SortedNameLookup {
    /// Keep the names the encoder would index, sorted and deduplicated.
    pub fn new<I, S>(names: I, min_prefix_length: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let encoder = DictionaryEncoder::new(min_prefix_length)?;
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| encoder.accepts(name))
            .collect();
        names.sort_unstable();
        names.dedup();
        Ok(Self { names, encoder })
    }

    /// Same line handling as filter ingestion
    pub fn from_lines(data: &[u8], min_prefix_length: usize) -> Result<Self> {
        let names = split_lines(data).filter_map(|line| std::str::from_utf8(line).ok());
        Self::new(names, min_prefix_length)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names starting with `prefix`, a contiguous run of the sorted table
    fn scan(&self, prefix: &str) -> &[String] {
        let start = self.names.partition_point(|n| n.as_str() < prefix);
        let len = self.names[start..].partition_point(|n| n.starts_with(prefix));
        &self.names[start..start + len]
    }

    fn walk(node: &PrefixNode, prefix: &mut String, max: usize) -> Vec<String> {
        if max == 0 {
            return vec![prefix.clone()];
        }

        let mut result = Vec::new();
        if node.word {
            result.push(format!("{prefix}{TERMINATOR}"));
        }

        let mut branches = Vec::new();
        for c in ALPHABET {
            let Some(child) = node.children.get(&c) else {
                continue;
            };
            prefix.push(c);
            let tokens = Self::walk(child, prefix, max - 1);
            if !tokens.is_empty() {
                branches.push(Branch {
                    prefix: prefix.clone(),
                    tokens,
                });
            }
            prefix.pop();
        }

        merge_branches(result, branches, max)
    }
}

impl NameLookup for SortedNameLookup {
    fn lookup_tokens(&self, prefix: &str, max: usize) -> Vec<String> {
        // The filter never stores prefixes this short
        if prefix.chars().count() < self.encoder.min_prefix_length() {
            return Vec::new();
        }

        let matches = self.scan(prefix);
        if matches.is_empty() {
            return Vec::new();
        }

        let mut root = PrefixNode::default();
        for name in matches {
            root.insert(&name[prefix.len()..]);
        }

        let mut buf = prefix.to_string();
        Self::walk(&root, &mut buf, max)
    }
}
