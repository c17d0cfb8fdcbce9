//! Cluster-count estimation by silhouette sweep.
//!
//! `ksweep` answers "how many clusters does this data have?" for dense
//! feature vectors. For every candidate `k` in `2..=kmax` it asks a
//! pluggable [`Partitioner`] for a `k`-way partition, scores that partition
//! with the mean silhouette coefficient, and selects the `k` with the
//! highest score (lowest `k` on ties).
//!
//! - [`Observations`]: validated, immutable feature vectors.
//! - [`cluster`]: the [`Partitioner`] capability and a reference [`Kmeans`].
//! - [`silhouette`]: per-point cohesion/separation and the silhouette score.
//! - [`sweep`]: the k sweep ([`estimate_k`], [`KSweep`]).
//! - [`report`]: the sweep result ([`Estimate`], [`KScore`]).
//!
//! ```rust
//! use ksweep::{estimate_k, Kmeans, Observations};
//!
//! let mut rows = Vec::new();
//! for &(cx, cy) in &[(0.0, 0.0), (10.0, 0.0), (5.0, 9.0)] {
//!     for i in 0..5 {
//!         rows.push(vec![cx + 0.1 * i as f64, cy - 0.05 * i as f64]);
//!     }
//! }
//! let data = Observations::new(rows).unwrap();
//!
//! let est = estimate_k(&data, 5, &Kmeans::default().with_seed(7)).unwrap();
//! assert_eq!(est.best_k(), 3);
//! assert!(est.reproducible);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod observation;
pub mod partition;
pub mod report;
pub mod silhouette;
pub mod sweep;

pub use cluster::{Kmeans, KmeansFit, Partitioner};
pub use error::{Error, Result};
pub use observation::Observations;
pub use partition::{Partition, UNASSIGNED};
pub use report::{Estimate, KScore};
pub use silhouette::{
    cohesion_separation, silhouette_samples, silhouette_score, CohesionSeparation,
    PointSilhouette,
};
pub use sweep::{estimate_k, select_best, KSweep, DEFAULT_TIE_TOLERANCE};
