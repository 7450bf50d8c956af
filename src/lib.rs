//! # Texatlas
//!
//! Automatic UV unwrapping and texture atlas packing for triangle meshes.
//!
//! Texatlas takes an indexed triangle list and produces per-face texture
//! coordinates laid out in a single square atlas. It cuts the mesh into
//! charts, flattens each chart, and packs them without overlap.
//!
//! ## Features
//!
//! - **Segmentation**: optional partition ids plus normal-gated flood fill
//! - **Hole handling**: ear-clipped hole filling and seam cuts for closed
//!   islands
//! - **Parameterization**: circle-boundary mapping with neighbor relaxation
//! - **Packing**: MaxRects bin packing over five heuristics with a growing
//!   square bin
//! - **Parallelism**: islands and heuristics run on rayon, with identical
//!   output to the sequential path
//!
//! ## Quick Start
//!
//! ```
//! use texatlas::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit cube, two triangles per side
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(1.0, 1.0, 1.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 1], [0, 3, 2],
//!     [4, 5, 6], [4, 6, 7],
//!     [0, 1, 5], [0, 5, 4],
//!     [3, 7, 6], [3, 6, 2],
//!     [0, 4, 7], [0, 7, 3],
//!     [1, 2, 6], [1, 6, 5],
//! ];
//!
//! let mesh = UvMesh::new(positions, faces)?.with_computed_normals();
//! let output = unwrap(&mesh, &UnwrapOptions::default())?;
//!
//! // One chart per side of the cube
//! assert_eq!(output.charts.len(), 6);
//! for (chart, rect) in output.charts.iter().zip(&output.chart_rects) {
//!     println!("{} faces at ({:.3}, {:.3})", chart.len(), rect.left, rect.top);
//! }
//!
//! // UVs for every input face
//! let [a, b, c] = output.face_uvs[0];
//! println!("face 0: {:?} {:?} {:?}", a, b, c);
//! # Ok::<(), texatlas::MeshError>(())
//! ```
//!
//! ## Packing Alone
//!
//! The atlas packer works on plain sizes and can be used without the rest of
//! the pipeline:
//!
//! ```
//! use texatlas::atlas::{pack_charts, PackOptions};
//! use nalgebra::Vector2;
//!
//! let sizes = vec![Vector2::new(2.0, 1.0), Vector2::new(1.0, 1.0)];
//! let result = pack_charts(&sizes, &PackOptions::default());
//!
//! assert!(result.is_complete());
//! println!("atlas side: {}", result.texture_size);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod atlas;
pub mod error;
pub mod mesh;
mod unwrap;

pub use error::{MeshError, Result};
pub use mesh::UvMesh;
pub use unwrap::{unwrap, unwrap_with_progress, UnwrapOptions, UnwrapOutput, UnwrapStage};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use texatlas::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::chart::Chart;
    pub use crate::algo::Progress;
    pub use crate::atlas::{ChartPlacement, PackOptions, UvRect};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{Face, FaceTextureCoords, TextureCoord, UvMesh};
    pub use crate::unwrap::{
        unwrap, unwrap_with_progress, UnwrapOptions, UnwrapOutput, UnwrapStage,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
