//! Budgeted merge of per-letter sub-results.
//!
//! Branches are folded in smallest first. A branch is revealed in full
//! only while the running total (tokens already taken, one slot for every
//! other pending branch, this branch's tokens) stays within the nominal
//! size; once one does not fit, every branch still pending is reported as
//! its bare prefix.

/// The non-empty result of looking up `prefix`, one letter longer than
/// the parent query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub prefix: String,
    pub tokens: Vec<String>,
}

/// Merge `branches` (in alphabet order) into `result` under budget `max`.
///
/// The nominal size is `max(result + branches, max)`: never smaller than
/// one slot per branch already known to exist. Ties on token count go to
/// the earliest branch, keeping output deterministic.
pub fn merge_branches(mut result: Vec<String>, mut branches: Vec<Branch>, max: usize) -> Vec<String> {
    let nominal = (result.len() + branches.len()).max(max);

    while let Some(idx) = smallest(&branches) {
        let others = branches.len() - 1;
        if result.len() + others + branches[idx].tokens.len() <= nominal {
            let branch = branches.remove(idx);
            result.extend(branch.tokens);
        } else {
            result.extend(branches.into_iter().map(|b| b.prefix));
            break;
        }
    }

    result
}

/// Index of the first branch with the fewest tokens
fn smallest(branches: &[Branch]) -> Option<usize> {
    branches
        .iter()
        .enumerate()
        .min_by_key(|(_, b)| b.tokens.len())
        .map(|(i, _)| i)
}
