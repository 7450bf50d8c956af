//! Mesh construction and attribute validation.
//!
//! All constructors validate indices up front so that later stages can index
//! into vertex and attribute arrays without bounds checks failing.

use nalgebra::{Point3, Vector3};

use super::uv_mesh::{Face, UvMesh};
use crate::error::{MeshError, Result};

impl UvMesh {
    /// Build a mesh from vertex positions and triangle faces.
    ///
    /// An empty mesh is accepted; unwrapping it yields an empty result.
    ///
    /// # Example
    /// ```
    /// use texatlas::mesh::UvMesh;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = UvMesh::new(positions, vec![[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<Face>) -> Result<Self> {
        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= positions.len() {
                    return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
        }

        Ok(Self {
            positions,
            faces,
            normals: None,
            partitions: None,
        })
    }

    /// Attach per-face normals.
    ///
    /// Normals only drive island segmentation; they are not renormalized.
    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Result<Self> {
        check_parallel("normals", self.faces.len(), normals.len())?;
        self.normals = Some(normals);
        Ok(self)
    }

    /// Attach per-face normals computed from the face winding.
    pub fn with_computed_normals(mut self) -> Self {
        let normals = (0..self.faces.len()).map(|f| self.face_normal(f)).collect();
        self.normals = Some(normals);
        self
    }

    /// Attach per-face partition ids.
    ///
    /// Faces with different partition ids never share a chart.
    pub fn with_partitions(mut self, partitions: Vec<u32>) -> Result<Self> {
        check_parallel("partitions", self.faces.len(), partitions.len())?;
        self.partitions = Some(partitions);
        Ok(self)
    }
}

fn check_parallel(attribute: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(MeshError::AttributeLength {
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}
