//! UV parameterization of islands.
//!
//! Each island that reaches this stage has a single boundary loop (smaller
//! holes have been filled, closed islands have been cut). [`parametrize`]
//! maps that loop to a circle and relaxes everything else toward the
//! neighbor average, giving one [`UVMap`] per island.
//!
//! # Example
//!
//! ```
//! use texatlas::algo::parameterize::{parametrize, ParametrizeOptions};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let options = ParametrizeOptions::default().with_iterations(0);
//! let uv_map = parametrize(&positions, &faces, &options).unwrap();
//!
//! for (v, uv) in uv_map.as_slice().iter().enumerate() {
//!     println!("Vertex {}: u={:.3}, v={:.3}", v, uv.x, uv.y);
//! }
//! ```
//!
//! # References
//!
//! - Tutte, W. T. (1963). "How to draw a graph." Proceedings of the London
//!   Mathematical Society.
//! - Floater, M. S. (1997). "Parametrization and smooth approximation of
//!   surface triangulations." Computer Aided Geometric Design.

mod harmonic;
mod uv;

pub use harmonic::{parametrize, ParametrizeOptions};
pub use uv::{uv_bounding_box, uv_triangle_area, UVMap};
