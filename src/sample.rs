/*! Training-sample construction.

A sample is a deterministic, token-budgeted subsequence of a treebank:
the full sentence sequence is permuted with a fixed seed, then a greedy
prefix is taken while the cumulative token count stays within the budget.

!*/
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::corpus::Sentence;
use crate::error::Error;

/// Fixed shuffle seed. Identical corpora must yield identical samples
/// across runs and machines.
pub const SHUFFLE_SEED: u64 = 42;

/// Maximum cumulative token count of a training sample.
pub const TOKEN_BUDGET: usize = 5000;

/// Applies the fixed-seed permutation to the sentence sequence.
pub fn shuffle(sentences: &mut [Sentence]) {
    let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
    sentences.shuffle(&mut rng);
}

/// Greedy prefix selection under `budget` tokens.
///
/// Selection stops at the first sentence that would push the running total
/// strictly over the budget, even if a later sentence would still fit.
/// May select nothing if the first sentence alone exceeds the budget.
pub fn select_within_budget(sentences: Vec<Sentence>, budget: usize) -> Vec<Sentence> {
    let mut token_count = 0;
    let mut selected = Vec::new();

    for sentence in sentences {
        let num_tokens = sentence.token_count();
        if token_count + num_tokens > budget {
            break;
        }
        token_count += num_tokens;
        selected.push(sentence);
    }
    selected
}

/// Writes `sentences` as blank-line-separated blocks with a terminating
/// newline. Reading the file back yields the same block sequence.
pub fn write_sample(path: &Path, sentences: &[Sentence]) -> Result<(), Error> {
    let mut out = BufWriter::new(File::create(path)?);
    let blocks = sentences
        .iter()
        .map(|sentence| sentence.lines().join("\n"))
        .join("\n\n");
    writeln!(out, "{}", blocks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SentenceReader;

    /// Builds a block of `n` single-column token lines.
    fn sentence(n: usize) -> Sentence {
        Sentence::new((1..=n).map(|i| format!("{}\ttok", i)).collect())
    }

    #[test]
    fn shuffle_is_reproducible() {
        let mut a: Vec<_> = (1..=50).map(sentence).collect();
        let mut b = a.clone();
        let original = a.clone();

        shuffle(&mut a);
        shuffle(&mut b);

        assert_eq!(a, b);
        // same elements, permuted
        assert_ne!(a, original);
        let mut sorted_a = a.clone();
        let mut sorted_o = original;
        sorted_a.sort_by_key(Sentence::token_count);
        sorted_o.sort_by_key(Sentence::token_count);
        assert_eq!(sorted_a, sorted_o);
    }

    #[test]
    fn selection_respects_budget() {
        let sentences = vec![sentence(3), sentence(4), sentence(5)];
        let selected = select_within_budget(sentences, 8);
        let total: usize = selected.iter().map(Sentence::token_count).sum();
        assert_eq!(selected.len(), 2);
        assert!(total <= 8);
    }

    #[test]
    fn selection_stops_at_first_overflow() {
        // the third sentence would fit, but selection is a strict prefix
        let sentences = vec![sentence(3), sentence(10), sentence(2)];
        let selected = select_within_budget(sentences, 5);
        assert_eq!(selected, vec![sentence(3)]);
    }

    #[test]
    fn selection_is_empty_iff_first_sentence_exceeds_budget() {
        assert!(select_within_budget(vec![sentence(6)], 5).is_empty());
        assert_eq!(select_within_budget(vec![sentence(5)], 5).len(), 1);
    }

    #[test]
    fn selection_accepts_exact_fit() {
        let sentences = vec![sentence(2), sentence(3)];
        let selected = select_within_budget(sentences, 5);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn sample_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_train.conllu");
        let sentences = vec![sentence(2), sentence(5), sentence(1)];

        write_sample(&path, &sentences).unwrap();

        let reread: Vec<_> = SentenceReader::open(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(reread, sentences);
    }
}
