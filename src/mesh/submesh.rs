//! Compact local copies of face subsets.

use std::collections::HashMap;

use nalgebra::Point3;

use super::uv_mesh::{Face, UvMesh};

/// A face subset re-indexed into its own compact vertex array.
///
/// Faces appended after extraction (hole fillers) have no global face and
/// live past `face_map.len()`.
#[derive(Debug, Clone, Default)]
pub struct SubMesh {
    /// Local vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Local faces, indices into `positions`.
    pub faces: Vec<Face>,
    /// Global face index of every extracted local face.
    pub face_map: Vec<usize>,
}

impl SubMesh {
    /// Copy the given global faces out of `mesh`, in order.
    pub fn extract(mesh: &UvMesh, group: &[usize]) -> Self {
        let mut positions = Vec::new();
        let mut faces = Vec::with_capacity(group.len());
        let mut global_to_local: HashMap<usize, usize> = HashMap::new();

        for &global_face in group {
            let mut local = [0usize; 3];
            for (slot, &gv) in local.iter_mut().zip(mesh.face(global_face).iter()) {
                *slot = *global_to_local.entry(gv).or_insert_with(|| {
                    positions.push(mesh.positions[gv]);
                    positions.len() - 1
                });
            }
            faces.push(local);
        }

        Self {
            positions,
            faces,
            face_map: group.to_vec(),
        }
    }

    /// Number of faces that came from the source mesh.
    #[inline]
    pub fn num_source_faces(&self) -> usize {
        self.face_map.len()
    }

    /// Number of local vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reindexes_vertices() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0),
        ];
        let mesh = UvMesh::new(positions, vec![[0, 1, 2], [4, 1, 0], [0, 2, 3]]).unwrap();

        let sub = SubMesh::extract(&mesh, &[2, 0]);
        assert_eq!(sub.num_vertices(), 4);
        assert_eq!(sub.faces, vec![[0, 1, 2], [0, 3, 1]]);
        assert_eq!(sub.face_map, vec![2, 0]);
        assert_eq!(sub.positions[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(sub.num_source_faces(), 2);
    }
}
