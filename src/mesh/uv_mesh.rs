//! Indexed triangle mesh used as unwrapper input.
//!
//! Unlike a half-edge structure, [`UvMesh`] is a plain face-vertex list: the
//! unwrapper builds its own directed-edge maps per partition and per island,
//! so it tolerates the non-manifold and inconsistently wound input that shows
//! up in content pipelines.

use nalgebra::{Point3, Vector3};

/// A triangle face: three vertex indices whose order defines the winding.
pub type Face = [usize; 3];

/// A triangle mesh with optional per-face normals and partition ids.
#[derive(Debug, Clone, Default)]
pub struct UvMesh {
    /// Vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// Triangle faces, indices into `positions`.
    pub(crate) faces: Vec<Face>,

    /// Optional per-face normals, parallel to `faces`.
    pub(crate) normals: Option<Vec<Vector3<f64>>>,

    /// Optional per-face partition ids, parallel to `faces`.
    pub(crate) partitions: Option<Vec<u32>>,
}

impl UvMesh {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check whether the mesh has nothing to unwrap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.faces.is_empty()
    }

    /// Get all vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Get all faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a single face.
    #[inline]
    pub fn face(&self, f: usize) -> Face {
        self.faces[f]
    }

    /// Get the per-face normals, if the mesh carries them.
    #[inline]
    pub fn normals(&self) -> Option<&[Vector3<f64>]> {
        self.normals.as_deref()
    }

    /// Get the per-face partition ids, if the mesh carries them.
    #[inline]
    pub fn partitions(&self) -> Option<&[u32]> {
        self.partitions.as_deref()
    }

    /// Get the partition id of a face (0 when the mesh has no partitions).
    #[inline]
    pub fn partition_of(&self, f: usize) -> u32 {
        self.partitions.as_ref().map_or(0, |p| p[f])
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: usize) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.faces[f];
        [self.positions[v0], self.positions[v1], self.positions[v2]]
    }

    // ==================== Geometry ====================

    /// Compute the geometric normal of a face from its winding.
    ///
    /// Degenerate faces yield a zero vector.
    pub fn face_normal(&self, f: usize) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        let n = (p1 - p0).cross(&(p2 - p0));
        n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: usize) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        triangle_area(&p0, &p1, &p2)
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }
}

/// Area of a 3D triangle.
#[inline]
pub fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}
