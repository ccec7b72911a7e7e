//! Selection-frequency statistics for the pool builder.
//!
//! Each draw picks `n` of `N` entries uniformly without replacement, so every
//! entry is expected `runs * n / N` times. Pearson's chi-square over the
//! observed counts checks that expectation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Stage;
use crate::pool::PoolBuilder;
use crate::traits::RandomSource;

/// Pearson's chi-square statistic: `sum((o - e)^2 / e)`.
///
/// Returns `0.0` when `expected` is not positive.
pub fn chi_square(observed: &[u64], expected: f64) -> f64 {
    if expected <= 0.0 {
        return 0.0;
    }
    observed
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Observed draw counts for one stage's pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionStats {
    pub stage: Stage,
    /// Number of games simulated.
    pub runs: u64,
    /// Entries drawn per game.
    pub per_game: usize,
    /// Draw count per question id, in pool order.
    pub counts: Vec<(String, u64)>,
}

impl SelectionStats {
    /// Expected count per entry under uniform selection.
    pub fn expected(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        self.runs as f64 * self.per_game as f64 / self.counts.len() as f64
    }

    pub fn chi_square(&self) -> f64 {
        let observed: Vec<u64> = self.counts.iter().map(|(_, c)| *c).collect();
        chi_square(&observed, self.expected())
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Largest relative deviation of any entry from the expected count.
    pub fn max_relative_deviation(&self) -> f64 {
        let expected = self.expected();
        if expected <= 0.0 {
            return 0.0;
        }
        self.counts
            .iter()
            .map(|(_, c)| (*c as f64 - expected).abs() / expected)
            .fold(0.0, f64::max)
    }
}

/// Run `runs` simulated draws and count how often each catalog entry appears.
///
/// Returns the stage-1 and stage-2 statistics in that order.
pub fn selection_frequencies(
    builder: &PoolBuilder,
    runs: u64,
    source: &mut dyn RandomSource,
) -> [SelectionStats; 2] {
    let catalog = builder.catalog();
    let mut counts: BTreeMap<&str, u64> = catalog.iter().map(|q| (q.id.as_str(), 0)).collect();

    for _ in 0..runs {
        for q in builder.build_pool(source) {
            if let Some(count) = counts.get_mut(q.id.as_str()) {
                *count += 1;
            }
        }
    }

    let size = builder.size();
    let stats_for = |stage: Stage, per_game: usize| SelectionStats {
        stage,
        runs,
        per_game,
        counts: catalog
            .pool(stage)
            .iter()
            .map(|q| (q.id.clone(), counts.get(q.id.as_str()).copied().unwrap_or(0)))
            .collect(),
    };

    [stats_for(Stage::One, size.stage1), stats_for(Stage::Two, size.stage2)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RngSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Upper 0.1% critical value of chi-square with 19 degrees of freedom.
    const CHI2_19_P001: f64 = 43.82;

    #[test]
    fn chi_square_of_exact_match_is_zero() {
        assert_eq!(chi_square(&[10, 10, 10], 10.0), 0.0);
    }

    #[test]
    fn chi_square_known_value() {
        // (12-10)^2/10 + (8-10)^2/10 = 0.8
        let value = chi_square(&[12, 8], 10.0);
        assert!((value - 0.8).abs() < 1e-12, "got {value}");
    }

    #[test]
    fn chi_square_non_positive_expectation() {
        assert_eq!(chi_square(&[1, 2], 0.0), 0.0);
    }

    #[test]
    fn selection_counts_sum_to_draws() {
        let builder = PoolBuilder::with_defaults();
        let mut source = RngSource(StdRng::seed_from_u64(1));
        let [s1, s2] = selection_frequencies(&builder, 100, &mut source);
        assert_eq!(s1.counts.iter().map(|(_, c)| c).sum::<u64>(), 600);
        assert_eq!(s2.counts.iter().map(|(_, c)| c).sum::<u64>(), 600);
        assert_eq!(s1.counts.len(), 20);
        assert_eq!(s1.expected(), 30.0);
        assert_eq!(s1.degrees_of_freedom(), 19);
    }

    #[test]
    fn selection_is_uniform_in_the_limit() {
        let builder = PoolBuilder::with_defaults();
        let mut source = RngSource(StdRng::seed_from_u64(0x5eed));
        let stats = selection_frequencies(&builder, 20_000, &mut source);
        for stage in &stats {
            let chi = stage.chi_square();
            assert!(
                chi < CHI2_19_P001,
                "stage {} chi-square {chi:.2} exceeds {CHI2_19_P001}",
                stage.stage
            );
            assert!(
                stage.max_relative_deviation() < 0.1,
                "stage {} deviates by {:.3}",
                stage.stage,
                stage.max_relative_deviation()
            );
        }
    }

    #[test]
    fn biased_counts_fail_the_check() {
        let mut counts: Vec<(String, u64)> = (1..=20).map(|i| (format!("q{i}"), 300)).collect();
        counts[0].1 = 600;
        counts[1].1 = 0;
        let stats = SelectionStats {
            stage: Stage::One,
            runs: 1000,
            per_game: 6,
            counts,
        };
        assert!(stats.chi_square() > CHI2_19_P001);
    }
}
