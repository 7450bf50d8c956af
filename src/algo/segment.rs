//! Mesh segmentation into partitions and islands.
//!
//! Faces are first grouped by their partition id. Each partition is then
//! split into islands: maximal sets of faces connected through shared,
//! consistently wound edges. When normal segmentation is enabled, a
//! neighbor only joins an island if its normal is close enough to a
//! reference normal.
//!
//! # Example
//!
//! ```
//! use texatlas::algo::segment::{partition_faces, split_islands, SegmentOptions};
//! use texatlas::mesh::UvMesh;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = UvMesh::new(positions, vec![[0, 1, 2], [0, 2, 3]])
//!     .unwrap()
//!     .with_computed_normals();
//!
//! let partitions = partition_faces(&mesh);
//! let islands = split_islands(&mesh, &partitions[&0], &SegmentOptions::default());
//! assert_eq!(islands.len(), 1);
//! ```

use std::collections::{BTreeMap, VecDeque};

use crate::mesh::topology::{build_edge_map, opposite_faces};
use crate::mesh::UvMesh;

/// Options for [`split_islands`].
#[derive(Debug, Clone, Copy)]
pub struct SegmentOptions {
    /// Whether to break islands at normal discontinuities.
    ///
    /// Only has an effect when the mesh carries normals.
    pub by_normal: bool,

    /// A neighbor joins only if the dot product of its normal with the
    /// reference normal is strictly greater than this.
    pub normal_threshold: f64,

    /// Compare against the island's seed face (true) instead of the face
    /// being expanded (false). Comparing against the seed stops drift along
    /// smoothly curving surfaces and gives more, smaller islands.
    pub prefer_more_pieces: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            by_normal: true,
            normal_threshold: 0.0,
            prefer_more_pieces: true,
        }
    }
}

impl SegmentOptions {
    /// Set whether to segment by normal.
    pub fn with_by_normal(mut self, enabled: bool) -> Self {
        self.by_normal = enabled;
        self
    }

    /// Set the normal dot-product threshold.
    pub fn with_normal_threshold(mut self, threshold: f64) -> Self {
        self.normal_threshold = threshold;
        self
    }

    /// Set which face provides the reference normal.
    pub fn with_prefer_more_pieces(mut self, prefer: bool) -> Self {
        self.prefer_more_pieces = prefer;
        self
    }
}

/// Group face indices by partition id, ascending.
///
/// A mesh without partitions yields a single partition `0` holding every
/// face. A mesh without faces yields no partitions.
pub fn partition_faces(mesh: &UvMesh) -> BTreeMap<u32, Vec<usize>> {
    let mut partitions: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for f in 0..mesh.num_faces() {
        partitions.entry(mesh.partition_of(f)).or_default().push(f);
    }
    partitions
}

/// Split a group of faces into connected islands.
///
/// Islands are seeded in `group` order and grown breadth-first, so both
/// the island order and the face order inside each island are deterministic.
/// Every face of `group` ends up in exactly one island.
pub fn split_islands(mesh: &UvMesh, group: &[usize], options: &SegmentOptions) -> Vec<Vec<usize>> {
    let edge_map = build_edge_map(mesh.faces(), group.iter().copied());
    let normals = if options.by_normal {
        mesh.normals()
    } else {
        None
    };

    let mut processed = vec![false; mesh.num_faces()];
    let mut queue = VecDeque::new();
    let mut islands = Vec::new();

    for &seed in group {
        if processed[seed] {
            continue;
        }

        queue.push_back(seed);
        let mut island = Vec::new();

        while let Some(index) = queue.pop_front() {
            if processed[index] {
                continue;
            }

            let reference = if options.prefer_more_pieces { seed } else { index };
            for opposite in opposite_faces(&mesh.faces()[index], &edge_map) {
                if let Some(normals) = normals {
                    if normals[opposite].dot(&normals[reference]) <= options.normal_threshold {
                        continue;
                    }
                }
                queue.push_back(opposite);
            }

            island.push(index);
            processed[index] = true;
        }

        islands.push(island);
    }

    islands
}
