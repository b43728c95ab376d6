//! The sorting procedures. Each one is expressed only through [`SortOps`],
//! so none of them knows about rendering, pacing or cancellation beyond
//! propagating the result of every instrumented call.

mod distribution;
mod exchange;
mod insertion;
mod partition;
mod selection;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, SortOps, SortVizError};

/// Longest sequence Bogo Sort may run on without explicit confirmation.
pub const BOGO_SAFE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
    Heap,
    Shell,
    Comb,
    Cocktail,
    Radix,
    Bucket,
    Bogo,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 12] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Quick,
        Self::Merge,
        Self::Heap,
        Self::Shell,
        Self::Comb,
        Self::Cocktail,
        Self::Radix,
        Self::Bucket,
        Self::Bogo,
    ];

    /// Selector key, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
            Self::Merge => "merge",
            Self::Heap => "heap",
            Self::Shell => "shell",
            Self::Comb => "comb",
            Self::Cocktail => "cocktail",
            Self::Radix => "radix",
            Self::Bucket => "bucket",
            Self::Bogo => "bogo",
        }
    }

    /// Display title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Quick => "Quick Sort",
            Self::Merge => "Merge Sort",
            Self::Heap => "Heap Sort",
            Self::Shell => "Shell Sort",
            Self::Comb => "Comb Sort",
            Self::Cocktail => "Cocktail Shaker Sort",
            Self::Radix => "Radix Sort (LSD)",
            Self::Bucket => "Bucket Sort",
            Self::Bogo => "Bogo Sort",
        }
    }

    /// Whether a run over `len` elements needs an explicit go-ahead first.
    pub fn requires_confirmation(self, len: usize) -> bool {
        self == Self::Bogo && len > BOGO_SAFE_LEN
    }

    /// Rejects inputs the procedure cannot handle.
    pub fn validate(self, values: &[i64]) -> Result<()> {
        if self == Self::Radix && values.iter().any(|&value| value < 0) {
            return Err(SortVizError::InvalidInput(
                "radix sort requires non-negative values",
            ));
        }
        Ok(())
    }

    /// Sorts the sequence behind `ops` in place. Sequences shorter than two
    /// elements are already sorted and produce no frames.
    pub fn run(self, ops: &mut SortOps<'_>) -> Result<()> {
        if ops.len() < 2 {
            return Ok(());
        }
        self.validate(ops.values())?;

        match self {
            Self::Bubble => exchange::bubble(ops),
            Self::Selection => selection::selection(ops),
            Self::Insertion => insertion::insertion(ops),
            Self::Quick => partition::quick(ops),
            Self::Merge => partition::merge(ops),
            Self::Heap => selection::heap(ops),
            Self::Shell => insertion::shell(ops),
            Self::Comb => exchange::comb(ops),
            Self::Cocktail => exchange::cocktail(ops),
            Self::Radix => distribution::radix(ops),
            Self::Bucket => distribution::bucket(ops),
            Self::Bogo => exchange::bogo(ops),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SortVizError::msg(format!("unknown algorithm `{wanted}`")))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::ops::harness::Harness;

    fn assert_sorted_permutation(kind: AlgorithmKind, input: &[i64]) {
        let mut harness = Harness::new(input);
        harness.run(kind).unwrap();

        let mut expected = input.to_vec();
        expected.sort();
        assert_eq!(harness.values, expected, "{kind} on {input:?}");
    }

    fn comparison_kinds() -> impl Iterator<Item = AlgorithmKind> {
        AlgorithmKind::ALL
            .into_iter()
            .filter(|kind| *kind != AlgorithmKind::Bogo)
    }

    #[test]
    fn every_algorithm_sorts_random_sequences() {
        let mut rng = StdRng::seed_from_u64(2024);
        for kind in comparison_kinds() {
            for len in [2, 3, 10, 33, 64] {
                let input: Vec<i64> = (0..len).map(|_| rng.random_range(0..500)).collect();
                assert_sorted_permutation(kind, &input);
            }
        }
    }

    #[test]
    fn bogo_sorts_small_sequences() {
        assert_sorted_permutation(AlgorithmKind::Bogo, &[3, 1, 2]);
        assert_sorted_permutation(AlgorithmKind::Bogo, &[4, 4, 1, 3, 2]);
    }

    #[test]
    fn comparison_sorts_handle_negative_values() {
        for kind in AlgorithmKind::ALL {
            if kind == AlgorithmKind::Radix || kind == AlgorithmKind::Bogo {
                continue;
            }
            assert_sorted_permutation(kind, &[3, -7, 0, -1, 12, -7]);
        }
    }

    #[test]
    fn trivial_sequences_cost_nothing() {
        for kind in AlgorithmKind::ALL {
            for input in [&[][..], &[7][..]] {
                let mut harness = Harness::new(input);
                harness.run(kind).unwrap();
                assert_eq!(harness.values, input.to_vec());
                assert_eq!(harness.stats.comparisons(), 0, "{kind}");
                assert_eq!(harness.stats.accesses(), 0, "{kind}");
                assert!(harness.frames.is_empty().unwrap());
            }
        }
    }

    #[test]
    fn all_equal_values_stay_put() {
        for kind in AlgorithmKind::ALL {
            let mut harness = Harness::new(&[5; 9]);
            harness.run(kind).unwrap();
            assert_eq!(harness.values, vec![5; 9], "{kind}");
        }
    }

    #[test]
    fn sorted_input_needs_no_swaps() {
        let sorted: Vec<i64> = (1..=20).collect();
        for kind in [
            AlgorithmKind::Bubble,
            AlgorithmKind::Insertion,
            AlgorithmKind::Cocktail,
        ] {
            let mut harness = Harness::new(&sorted);
            harness.run(kind).unwrap();
            assert_eq!(harness.swap_frames(), 0, "{kind}");
            assert_eq!(harness.values, sorted);
        }
    }

    #[test]
    fn merge_and_insertion_are_stable() {
        // Key lives in the hundreds, the tag in the units.
        let input = [301, 102, 303, 104, 205, 306, 107, 208];
        for kind in [AlgorithmKind::Merge, AlgorithmKind::Insertion] {
            let mut harness = Harness::new(&input);
            harness.run_keyed(kind, |value| value / 100).unwrap();
            assert_eq!(
                harness.values,
                vec![102, 104, 107, 205, 208, 301, 303, 306],
                "{kind}"
            );
        }
    }

    #[test]
    fn bubble_sort_counts() {
        let mut harness = Harness::new(&[5, 3, 8, 1]);
        harness.run(AlgorithmKind::Bubble).unwrap();

        assert_eq!(harness.values, vec![1, 3, 5, 8]);
        assert_eq!(harness.stats.comparisons(), 6);
        // One adjacent swap per inversion: (5,3) (5,1) (3,1) (8,1).
        assert_eq!(harness.swap_frames(), 4);
        assert_eq!(harness.stats.accesses(), 8);
    }

    #[test]
    fn radix_sorts_reference_input() {
        let mut harness = Harness::new(&[170, 45, 75, 90, 802, 24, 2, 66]);
        harness.run(AlgorithmKind::Radix).unwrap();
        assert_eq!(harness.values, vec![2, 24, 45, 66, 75, 90, 170, 802]);
        assert_eq!(harness.stats.comparisons(), 0);
    }

    #[test]
    fn radix_rejects_negative_values() {
        let mut harness = Harness::new(&[3, -1, 2]);
        let err = harness.run(AlgorithmKind::Radix).unwrap_err();
        assert!(matches!(err, SortVizError::InvalidInput(_)));
        assert_eq!(harness.values, vec![3, -1, 2]);
    }

    #[test]
    fn selection_counts_every_scan_step() {
        let mut harness = Harness::new(&[4, 3, 2, 1, 0]);
        harness.run(AlgorithmKind::Selection).unwrap();
        // n(n-1)/2 scan comparisons regardless of the swap decision.
        assert_eq!(harness.stats.comparisons(), 10);
    }

    #[test]
    fn counters_never_decrease_across_frames() {
        let mut harness = Harness::new(&[9, 1, 8, 2, 7, 3]);
        let mut ops = harness.ops();
        let mut last = (0, 0);
        for _ in 0..3 {
            ops.compare(0, 1).unwrap();
            ops.swap(0, 1).unwrap();
            let now = (ops.stats().comparisons(), ops.stats().accesses());
            assert!(now.0 > last.0 && now.1 > last.1);
            last = now;
        }
        assert_eq!(last, (3, 6));
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.name().parse::<AlgorithmKind>().unwrap(), kind);
        }
        assert_eq!(" Quick ".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Quick);
        assert!("stooge".parse::<AlgorithmKind>().is_err());
    }

    #[test]
    fn only_long_bogo_runs_need_confirmation() {
        assert!(!AlgorithmKind::Bogo.requires_confirmation(8));
        assert!(AlgorithmKind::Bogo.requires_confirmation(9));
        assert!(!AlgorithmKind::Quick.requires_confirmation(1_000));
    }
}
