//! Core mesh data structures.
//!
//! The unwrapper consumes a plain indexed triangle list, [`UvMesh`], with
//! optional per-face normals and partition ids. Connectivity is rebuilt on
//! demand from directed edges (see [`topology`]), and islands are processed as
//! compact [`SubMesh`] copies.
//!
//! # Construction
//!
//! ```
//! use texatlas::mesh::UvMesh;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh = UvMesh::new(positions, faces)
//!     .unwrap()
//!     .with_computed_normals()
//!     .with_partitions(vec![0, 0])
//!     .unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! ```

mod builder;
mod submesh;
pub mod topology;
mod uv_mesh;

use nalgebra::Point2;

pub use submesh::SubMesh;
pub use uv_mesh::{triangle_area, Face, UvMesh};

/// A 2D texture coordinate.
pub type TextureCoord = Point2<f64>;

/// Texture coordinates of one face, in the face's vertex order.
pub type FaceTextureCoords = [TextureCoord; 3];
