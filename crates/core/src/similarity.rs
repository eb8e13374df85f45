//! Sequence similarity for fuzzy name matching.
//!
//! Ratcliff/Obershelp "gestalt" matching: find the longest common
//! contiguous block, recurse into the unmatched pieces on either side,
//! and score `2*M/T` where M is the total matched length and T the
//! combined input length. These are the semantics behind the 0.8
//! threshold the directory uses for company names; edit-distance or
//! bigram scores would shift every threshold.

use std::collections::HashMap;

/// Similarity of two strings in `[0.0, 1.0]`. Empty input scores 0.0
/// against everything, including itself. Symmetric.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut first: Vec<char> = a.chars().collect();
    let mut second: Vec<char> = b.chars().collect();
    // Canonical argument order: greedy block selection must not depend on
    // which side the caller passes first.
    if (second.len(), &second) < (first.len(), &first) {
        std::mem::swap(&mut first, &mut second);
    }

    let matched = matched_len(&first, &second);
    (2.0 * matched as f64) / ((first.len() + second.len()) as f64)
}

/// Total length of all matching blocks between `a` and `b`.
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        positions.entry(c).or_default().push(j);
    }

    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size > 0 {
            total += size;
            pending.push((alo, i, blo, j));
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given
/// windows. Of equally long blocks, the one starting earliest in `a`
/// (then earliest in `b`) wins.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;

    // run_len[j] = length of the match ending at a[i], b[j]
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_run: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = positions.get(&a[i]) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let len = if j > blo {
                    run_len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_run.insert(j, len);
                if len > best_size {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_size = len;
                }
            }
        }
        run_len = next_run;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_strings_are_one() {
        assert_eq!(ratio("acme llc", "acme llc"), 1.0);
    }

    #[test]
    fn empty_is_zero_even_against_itself() {
        assert_eq!(ratio("", ""), 0.0);
        assert_eq!(ratio("", "acme"), 0.0);
        assert_eq!(ratio("acme", ""), 0.0);
    }

    #[test]
    fn known_block_ratio() {
        // "bcd" matches out of 8 total chars: 2*3/8
        assert_eq!(ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn disjoint_alphabets_are_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn recursion_picks_up_side_blocks() {
        // longest block "ab", then "d" to its right: 2*3/8
        assert_eq!(ratio("abxd", "abyd"), 0.75);
    }

    #[test]
    fn close_company_names_clear_the_threshold() {
        let score = ratio("acme llc", "acme lllc");
        assert!(score >= 0.8, "score was {score}");
    }

    #[test]
    fn unrelated_company_names_stay_below_threshold() {
        let score = ratio("acme llc", "initech inc");
        assert!(score < 0.8, "score was {score}");
    }

    proptest! {
        #[test]
        fn symmetric(a in ".{0,12}", b in ".{0,12}") {
            prop_assert_eq!(ratio(&a, &b).to_bits(), ratio(&b, &a).to_bits());
        }

        #[test]
        fn bounded(a in ".{0,12}", b in ".{0,12}") {
            let r = ratio(&a, &b);
            prop_assert!((0.0..=1.0).contains(&r));
        }

        #[test]
        fn identity_is_one(a in ".{1,12}") {
            prop_assert_eq!(ratio(&a, &a), 1.0);
        }
    }
}
