//! Quantile classes on the log of crime counts.
//!
//! Breaks are quantiles of `ln(count)` over units with a positive count.
//! Zero counts and missing units get classes of their own so they can be
//! styled apart from each other and from the lowest bin.

use serde::{Deserialize, Serialize};
use vs_inference::quantile_sorted;

use crate::join::CrimeValue;

/// Quantile probabilities for the class breaks.
pub const DEFAULT_QUANTILES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.95, 1.0];

/// Class of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountClass {
    /// No crime-table row.
    NoData,
    /// Count of exactly zero.
    Zero,
    /// Positive count in quantile bin `i` (0 = lowest).
    Bin(usize),
}

/// Ascending, de-duplicated breaks in `ln(count)` space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBins {
    /// Break values; `breaks.len() - 1` bins when there are at least two.
    pub breaks: Vec<f64>,
}

impl QuantileBins {
    /// Compute breaks from every positive count.
    pub fn from_counts<I: IntoIterator<Item = u64>>(counts: I, probs: &[f64]) -> Self {
        let mut logs: Vec<f64> =
            counts.into_iter().filter(|&c| c > 0).map(|c| (c as f64).ln()).collect();
        logs.sort_by(f64::total_cmp);

        let mut probs: Vec<f64> = probs.iter().map(|p| p.clamp(0.0, 1.0)).collect();
        probs.sort_by(f64::total_cmp);

        let mut breaks: Vec<f64> = Vec::with_capacity(probs.len());
        for p in probs {
            if let Some(q) = quantile_sorted(&logs, p) {
                if breaks.last().is_none_or(|&last| q > last) {
                    breaks.push(q);
                }
            }
        }
        Self { breaks }
    }

    /// Number of positive-count bins (at least one when any positive count exists).
    pub fn n_bins(&self) -> usize {
        match self.breaks.len() {
            0 => 0,
            1 => 1,
            n => n - 1,
        }
    }

    /// Bin index for a positive count. Values outside the breaks clamp to the
    /// first/last bin, so the mapping is monotone in `count`.
    pub fn bin_of(&self, count: u64) -> usize {
        let n = self.n_bins();
        if n <= 1 {
            return 0;
        }
        let v = (count as f64).ln();
        // First interval is closed on both sides, later ones are (lo, hi].
        let idx = self.breaks[1..n].iter().take_while(|&&b| v > b).count();
        idx.min(n - 1)
    }

    /// Class for a joined value.
    pub fn classify(&self, value: CrimeValue) -> CountClass {
        match value {
            CrimeValue::NoData => CountClass::NoData,
            CrimeValue::Count(0) => CountClass::Zero,
            CrimeValue::Count(c) => CountClass::Bin(self.bin_of(c)),
        }
    }

    /// Break values converted back to counts, for legend labels.
    pub fn count_breaks(&self) -> Vec<f64> {
        self.breaks.iter().map(|b| b.exp()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn five_bins_for_many_distinct_counts() {
        let bins = QuantileBins::from_counts(1..=100, &DEFAULT_QUANTILES);
        assert_eq!(bins.breaks.len(), 6);
        assert_eq!(bins.n_bins(), 5);
        assert_eq!(bins.bin_of(1), 0);
        assert_eq!(bins.bin_of(100), 4);
    }

    #[test]
    fn zero_and_no_data_are_distinct_classes() {
        let bins = QuantileBins::from_counts([5, 0], &DEFAULT_QUANTILES);
        assert_eq!(bins.classify(CrimeValue::Count(0)), CountClass::Zero);
        assert_eq!(bins.classify(CrimeValue::NoData), CountClass::NoData);
        assert_eq!(bins.classify(CrimeValue::Count(5)), CountClass::Bin(0));
        assert_ne!(CountClass::Zero, CountClass::NoData);
    }

    #[test]
    fn duplicate_breaks_collapse() {
        let bins = QuantileBins::from_counts([7, 7, 7, 7], &DEFAULT_QUANTILES);
        assert_eq!(bins.breaks.len(), 1);
        assert_eq!(bins.n_bins(), 1);
        assert_eq!(bins.bin_of(7), 0);
    }

    #[test]
    fn no_positive_counts_means_no_bins() {
        let bins = QuantileBins::from_counts([0, 0], &DEFAULT_QUANTILES);
        assert!(bins.breaks.is_empty());
        assert_eq!(bins.n_bins(), 0);
    }

    #[test]
    fn binning_is_deterministic() {
        let counts = vec![3, 90, 14, 2200, 412, 7, 0, 65];
        let a = QuantileBins::from_counts(counts.clone(), &DEFAULT_QUANTILES);
        let b = QuantileBins::from_counts(counts.clone(), &DEFAULT_QUANTILES);
        assert_eq!(a, b);
        let ca: Vec<_> = counts.iter().map(|&c| a.classify(CrimeValue::Count(c))).collect();
        let cb: Vec<_> = counts.iter().map(|&c| b.classify(CrimeValue::Count(c))).collect();
        assert_eq!(ca, cb);
    }

    proptest! {
        #[test]
        fn bin_is_monotone_in_count(
            counts in prop::collection::vec(1u64..100_000, 1..60),
            a in 1u64..200_000,
            b in 1u64..200_000,
        ) {
            let bins = QuantileBins::from_counts(counts, &DEFAULT_QUANTILES);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(bins.bin_of(lo) <= bins.bin_of(hi));
            prop_assert!(bins.bin_of(hi) < bins.n_bins().max(1));
        }
    }
}
