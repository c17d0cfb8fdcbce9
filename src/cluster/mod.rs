//! Partitioners: the clustering side of the k sweep.
//!
//! The estimator does not care how a partition is produced. It depends on a
//! single capability, [`Partitioner`]: given observations and `k`, return
//! exactly `k` non-empty clusters covering every observation, or fail.
//! Any clustering algorithm with that shape can be plugged in, including a
//! plain closure.
//!
//! ## K-means
//!
//! [`Kmeans`] is the reference partitioner: k-means++ seeding followed by
//! Lloyd iterations, restarted a few times with the lowest-inertia run kept.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//!
//! Seed it ([`Kmeans::with_seed`]) when sweep results must be reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use ksweep::cluster::{Kmeans, Partitioner};
//! use ksweep::Observations;
//!
//! let data = Observations::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ])
//! .unwrap();
//!
//! let partition = Kmeans::default().with_seed(42).partition(&data, 2).unwrap();
//! assert_eq!(partition.k(), 2);
//! assert_eq!(partition.sizes(), vec![2, 2]);
//! ```

mod kmeans;
mod traits;
mod util;

pub use kmeans::{Kmeans, KmeansFit};
pub use traits::Partitioner;
pub use util::euclidean;
