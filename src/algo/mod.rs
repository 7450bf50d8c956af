//! Mesh algorithms behind the unwrap pipeline.
//!
//! - **Segmentation**: partitions and normal-gated connected islands
//! - **Holes**: boundary loops, ear-clipped hole filling, seam cuts
//! - **Parameterization**: circle boundary with neighbor relaxation
//! - **Charts**: UV box normalization, rotation search, area-based sizing
//!
//! The stages are chained by [`unwrap`](crate::unwrap()).

pub mod chart;
pub mod holes;
pub mod parameterize;
pub mod progress;
pub mod segment;

pub use progress::Progress;
