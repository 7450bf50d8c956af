//! Bisection of closed islands.

use std::collections::VecDeque;

use crate::mesh::topology::{build_edge_map, opposite_faces};
use crate::mesh::SubMesh;

/// Cut a closed island into two face groups.
///
/// The first group grows breadth-first from the first face that holds the
/// highest vertex (largest Y) and stops as soon as it holds at least half of
/// the faces. The second group is every other face in local order. Both
/// groups hold global face indices.
///
/// Either group may come back empty for degenerate input; callers drop the
/// island in that case.
pub fn seam_cut(island: &SubMesh) -> (Vec<usize>, Vec<usize>) {
    let total = island.num_source_faces();
    let faces = &island.faces[..total];

    let mut max_y = f64::NEG_INFINITY;
    let mut seed = None;
    for (index, face) in faces.iter().enumerate() {
        for &v in face {
            let y = island.positions[v].y;
            if y > max_y {
                max_y = y;
                seed = Some(index);
            }
        }
    }

    let Some(seed) = seed else {
        return (Vec::new(), Vec::new());
    };

    let edge_map = build_edge_map(faces, 0..total);
    let mut processed = vec![false; total];
    let mut queue = VecDeque::from([seed]);
    let mut first = Vec::new();

    while let Some(index) = queue.pop_front() {
        if processed[index] {
            continue;
        }

        queue.extend(opposite_faces(&faces[index], &edge_map));
        processed[index] = true;
        first.push(island.face_map[index]);

        if first.len() * 2 >= total {
            break;
        }
    }

    let second = (0..total)
        .filter(|&index| !processed[index])
        .map(|index| island.face_map[index])
        .collect();

    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::UvMesh;
    use nalgebra::Point3;

    fn create_octahedron() -> UvMesh {
        let positions = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            [3, 0, 4],
            [3, 4, 1],
            [3, 1, 5],
            [3, 5, 0],
            [2, 4, 0],
            [2, 1, 4],
            [2, 5, 1],
            [2, 0, 5],
        ];
        UvMesh::new(positions, faces).unwrap()
    }

    #[test]
    fn test_cut_octahedron_in_half() {
        let mesh = create_octahedron();
        let all: Vec<usize> = (0..8).collect();
        let island = SubMesh::extract(&mesh, &all);

        let (first, second) = seam_cut(&island);
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);

        // Seeded at the first face touching the top vertex.
        assert_eq!(first[0], 4);

        let mut both: Vec<usize> = first.iter().chain(&second).copied().collect();
        both.sort_unstable();
        assert_eq!(both, all);
    }

    #[test]
    fn test_cut_maps_to_global_faces() {
        let mesh = create_octahedron();
        let group = vec![7, 6, 5, 4, 3, 2, 1, 0];
        let island = SubMesh::extract(&mesh, &group);

        let (first, second) = seam_cut(&island);
        // Local face 0 (global 7) is the first holding the top vertex.
        assert_eq!(first[0], 7);
        assert_eq!(first.len() + second.len(), 8);
        assert!(first.iter().all(|f| !second.contains(f)));
    }

    #[test]
    fn test_single_face_leaves_second_empty() {
        let mesh = create_octahedron();
        let island = SubMesh::extract(&mesh, &[0]);
        let (first, second) = seam_cut(&island);
        assert_eq!(first, vec![0]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_ignores_filler_faces() {
        let mesh = create_octahedron();
        let mut island = SubMesh::extract(&mesh, &[0, 1]);
        island.faces.push([0, 1, 2]);
        let (first, second) = seam_cut(&island);
        assert_eq!(first.len() + second.len(), 2);
    }
}
