//! Sweep output in the shapes callers consume: an ordered `(k, score)`
//! series for plotting and a single best-k summary line.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Silhouette score of the partition produced for one candidate `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KScore {
    /// Candidate cluster count (at least 2).
    pub k: usize,
    /// Mean silhouette value over all observations, in `[-1, 1]`.
    pub score: f64,
}

/// Result of a k sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Estimate {
    /// One entry per candidate k, in increasing k order starting at 2.
    pub scores: Vec<KScore>,
    /// The selected cluster count and its score.
    pub best: KScore,
    /// Whether the partitioner reported itself deterministic for this run.
    pub reproducible: bool,
}

impl Estimate {
    /// The selected cluster count.
    pub fn best_k(&self) -> usize {
        self.best.k
    }

    /// Score of the selected cluster count.
    pub fn best_score(&self) -> f64 {
        self.best.score
    }

    /// Score recorded for `k`, if it was part of the sweep.
    pub fn score_for(&self, k: usize) -> Option<f64> {
        self.scores.iter().find(|s| s.k == k).map(|s| s.score)
    }

    /// `(x = k, y = score)` pairs in k order, ready for a scatter or line plot.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.scores.iter().map(|s| (s.k as f64, s.score))
    }

    /// One-line summary of the selection.
    pub fn summary(&self) -> String {
        format!(
            "Optimum no. of clusters: {}, best silhouette score: {:.4}",
            self.best.k, self.best.score
        )
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:>10}", "k", "silhouette")?;
        for s in &self.scores {
            let marker = if s.k == self.best.k { " *" } else { "" };
            writeln!(f, "{:>4}  {:>10.4}{}", s.k, s.score, marker)?;
        }
        write!(f, "{}", self.summary())
    }
}
