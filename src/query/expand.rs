use crate::query::{NameLookup, Suggestion, ALPHABET};
use ahash::AHashSet;
use tracing::debug;

/// Continuations longer than this are not followed. Only false positive
/// chains can get here; real names are far shorter.
const MAX_EXPANDED_LEN: usize = 256;

/// Every word reachable from `prefix`, following continuation prefixes
/// with a fresh budget of `batch` each time. Words come back in discovery
/// order without duplicates.
pub fn expand_all<L>(lookup: &L, prefix: &str, batch: usize) -> Vec<String>
where
    L: NameLookup + ?Sized,
{
    let mut words = Vec::new();
    let mut seen = AHashSet::new();
    // A zero budget would hand the same prefix straight back
    expand_into(lookup, prefix, batch.max(1), &mut words, &mut seen);
    words
}

/// Every word in the dictionary behind `lookup`, recovered by expanding
/// each `seed_length`-letter prefix over `a`..`z` in order.
///
/// `seed_length` should be the minimum prefix length the dictionary was
/// encoded with; shorter seeds are never stored. Per two-letter group the
/// number of names found is logged at debug level.
pub fn expand_dictionary<L>(lookup: &L, seed_length: usize, batch: usize) -> Vec<String>
where
    L: NameLookup + ?Sized,
{
    let seed_length = seed_length.max(1);
    let mut walk = SeedWalk {
        seed_length,
        group_length: seed_length.min(2),
        batch: batch.max(1),
        words: Vec::new(),
        seen: AHashSet::new(),
    };
    let mut seed = String::with_capacity(seed_length);
    walk.descend(lookup, &mut seed);
    debug!("Expanded {} names from the whole dictionary", walk.words.len());
    walk.words
}

struct SeedWalk {
    seed_length: usize,
    group_length: usize,
    batch: usize,
    words: Vec<String>,
    seen: AHashSet<String>,
}

impl SeedWalk {
    fn descend<L>(&mut self, lookup: &L, seed: &mut String)
    where
        L: NameLookup + ?Sized,
    {
        if seed.len() == self.seed_length {
            expand_into(lookup, seed, self.batch, &mut self.words, &mut self.seen);
            return;
        }

        for c in ALPHABET {
            seed.push(c);
            let before = self.words.len();
            self.descend(lookup, seed);
            if seed.len() == self.group_length {
                debug!("{}: {} names", seed, self.words.len() - before);
            }
            seed.pop();
        }
    }
}

fn expand_into<L>(lookup: &L, prefix: &str, batch: usize, words: &mut Vec<String>, seen: &mut AHashSet<String>)
where
    L: NameLookup + ?Sized,
{
    for token in lookup.lookup_tokens(prefix, batch) {
        match Suggestion::from_token(token) {
            Suggestion::Word(word) => {
                if seen.insert(word.clone()) {
                    words.push(word);
                }
            }
            Suggestion::Prefix(next) => {
                if next.len() > prefix.len() && next.len() <= MAX_EXPANDED_LEN {
                    expand_into(lookup, &next, batch, words, seen);
                }
            }
        }
    }
}
