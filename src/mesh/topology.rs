//! Face-vertex connectivity helpers.
//!
//! Adjacency is derived from directed edges: a face `[a, b, c]` contributes
//! the edges `(a, b)`, `(b, c)` and `(c, a)`. Two consistently wound faces
//! share an edge when one owns `(a, b)` and the other owns `(b, a)`.

use std::collections::{BTreeMap, HashMap, HashSet};

use nalgebra::Point3;

use super::uv_mesh::Face;
use crate::error::{MeshError, Result};

/// Map from a directed edge to the face that owns it.
pub type EdgeMap = HashMap<(usize, usize), usize>;

/// The three directed edges of a face, in winding order.
#[inline]
pub fn face_edges(face: &Face) -> [(usize, usize); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

/// Build the directed edge map for a subset of faces.
///
/// `indices` selects the faces and is also the value stored per edge. When a
/// directed edge occurs twice (non-manifold input) the later face wins.
pub fn build_edge_map<I>(faces: &[Face], indices: I) -> EdgeMap
where
    I: IntoIterator<Item = usize>,
{
    let mut map = EdgeMap::new();
    for index in indices {
        for edge in face_edges(&faces[index]) {
            map.insert(edge, index);
        }
    }
    map
}

/// Faces across each edge of `face`, found through the reversed edge.
pub fn opposite_faces<'a>(face: &Face, map: &'a EdgeMap) -> impl Iterator<Item = usize> + 'a {
    let edges = face_edges(face);
    edges
        .into_iter()
        .filter_map(move |(a, b)| map.get(&(b, a)).copied())
}

/// Directed boundary edges: edges whose reverse is owned by no face.
pub fn directed_boundary_edges(faces: &[Face]) -> Vec<(usize, usize)> {
    let map = build_edge_map(faces, 0..faces.len());
    faces
        .iter()
        .flat_map(face_edges)
        .filter(|&(a, b)| !map.contains_key(&(b, a)))
        .collect()
}

/// Boundary edges by use count: edges used by exactly one face, regardless
/// of direction. Each edge keeps the orientation of its owning face.
pub fn single_use_edges(faces: &[Face]) -> Vec<(usize, usize)> {
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    for face in faces {
        for (a, b) in face_edges(face) {
            *counts.entry(undirected(a, b)).or_insert(0) += 1;
        }
    }

    faces
        .iter()
        .flat_map(face_edges)
        .filter(|&(a, b)| counts.get(&undirected(a, b)) == Some(&1))
        .collect()
}

#[inline]
fn undirected(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Assemble directed boundary edges into closed vertex loops.
///
/// Walks start at the smallest remaining origin vertex and never reuse an
/// edge. A loop ends when it returns to its start or runs out of unused
/// edges. Loops with fewer than three vertices are discarded, and every vertex
/// of a finished loop is retired from later walks.
///
/// # Errors
///
/// Returns [`MeshError::OpenBoundary`] if a walk reaches a vertex without
/// outgoing boundary edges, or runs longer than `num_vertices` steps.
pub fn trace_loops(edges: &[(usize, usize)], num_vertices: usize) -> Result<Vec<Vec<usize>>> {
    let mut outgoing: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &(a, b) in edges {
        outgoing.entry(a).or_default().push(b);
    }

    let mut used: HashSet<(usize, usize)> = HashSet::new();
    let mut loops = Vec::new();

    while let Some(&start) = outgoing.keys().next() {
        let mut ring = vec![start];
        let mut current = start;

        loop {
            let candidates = outgoing
                .get(&current)
                .ok_or(MeshError::OpenBoundary { vertex: current })?;

            let Some(next) = candidates
                .iter()
                .copied()
                .find(|&c| !used.contains(&(current, c)))
            else {
                break;
            };

            used.insert((current, next));
            if next == start {
                break;
            }

            ring.push(next);
            current = next;

            if ring.len() > num_vertices {
                return Err(MeshError::OpenBoundary { vertex: current });
            }
        }

        for v in &ring {
            outgoing.remove(v);
        }

        if ring.len() >= 3 {
            loops.push(ring);
        } else {
            tracing::debug!(vertices = ring.len(), "Discarding short boundary loop");
        }
    }

    Ok(loops)
}

/// Perimeter of a closed vertex loop.
pub fn loop_length(ring: &[usize], positions: &[Point3<f64>]) -> f64 {
    (0..ring.len())
        .map(|i| {
            let j = (i + 1) % ring.len();
            (positions[ring[j]] - positions[ring[i]]).norm()
        })
        .sum()
}

/// Sort loops by perimeter, longest first. Equal perimeters keep their order.
pub fn sort_loops_by_length(loops: &mut [Vec<usize>], positions: &[Point3<f64>]) {
    loops.sort_by(|a, b| {
        loop_length(b, positions)
            .partial_cmp(&loop_length(a, positions))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// One-ring neighbors of every vertex, sorted and deduplicated.
pub fn vertex_neighbors(faces: &[Face], num_vertices: usize) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); num_vertices];
    for face in faces {
        for i in 0..3 {
            let v = face[i];
            neighbors[v].push(face[(i + 1) % 3]);
            neighbors[v].push(face[(i + 2) % 3]);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 vertex grid, 8 triangles, one boundary loop of 8 vertices.
    fn grid_faces() -> Vec<Face> {
        let mut faces = Vec::new();
        for j in 0..2 {
            for i in 0..2 {
                let v00 = j * 3 + i;
                let v10 = v00 + 1;
                let v01 = v00 + 3;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        faces
    }

    fn tetrahedron_faces() -> Vec<Face> {
        vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]
    }

    #[test]
    fn test_opposite_faces() {
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        let map = build_edge_map(&faces, 0..2);
        let across: Vec<usize> = opposite_faces(&faces[0], &map).collect();
        assert_eq!(across, vec![1]);
    }

    #[test]
    fn test_closed_mesh_has_no_boundary() {
        let faces = tetrahedron_faces();
        assert!(directed_boundary_edges(&faces).is_empty());
        assert!(single_use_edges(&faces).is_empty());
    }

    #[test]
    fn test_grid_boundary_loop() {
        let faces = grid_faces();
        let edges = directed_boundary_edges(&faces);
        assert_eq!(edges.len(), 8);

        let loops = trace_loops(&edges, 9).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 8);
        assert_eq!(loops[0][0], 0);
        // Center vertex is interior.
        assert!(!loops[0].contains(&4));
    }

    #[test]
    fn test_trace_two_loops() {
        // Two disjoint triangles.
        let faces = vec![[0, 1, 2], [3, 4, 5]];
        let loops = trace_loops(&directed_boundary_edges(&faces), 6).unwrap();
        assert_eq!(loops, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_trace_open_chain_fails() {
        let edges = vec![(0, 1), (1, 2)];
        assert!(matches!(
            trace_loops(&edges, 3),
            Err(MeshError::OpenBoundary { vertex: 2 })
        ));
    }

    #[test]
    fn test_single_use_edges_ignore_direction() {
        // Second face repeats edge (0, 1) in the same direction.
        let faces = vec![[0, 1, 2], [0, 1, 3]];
        let edges = single_use_edges(&faces);
        assert_eq!(edges.len(), 4);
        assert!(!edges.contains(&(0, 1)));
    }

    #[test]
    fn test_sort_loops_by_length() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(0.0, 5.0, 0.0),
        ];
        let mut loops = vec![vec![0, 1, 2], vec![3, 4, 5]];
        sort_loops_by_length(&mut loops, &positions);
        assert_eq!(loops[0], vec![3, 4, 5]);
    }

    #[test]
    fn test_vertex_neighbors() {
        let faces = grid_faces();
        let neighbors = vertex_neighbors(&faces, 9);
        assert_eq!(neighbors[4].len(), 6);
        assert_eq!(neighbors[0], vec![1, 3, 4]);
    }
}
