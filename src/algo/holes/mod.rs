//! Hole resolution for islands.
//!
//! An island can only be mapped to a disk if it has exactly one boundary
//! loop. [`resolve_holes`] brings an island into that shape:
//!
//! - With one or more boundary loops, the longest loop is kept as the real
//!   boundary and every other loop is closed with ear-clipped filler faces.
//! - With no boundary at all, the island is closed and is cut in two by
//!   [`seam_cut`].
//!
//! Filler faces are appended to the island after its source faces, so
//! `island.faces[island.num_source_faces()..]` are exactly the fillers.

mod ear_clip;
mod seam;

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::topology::{directed_boundary_edges, sort_loops_by_length, trace_loops};
use crate::mesh::SubMesh;

pub use ear_clip::triangulate;
pub use seam::seam_cut;

/// What [`resolve_holes`] did with an island.
#[derive(Debug, Clone)]
pub enum HoleResolution {
    /// The island has a single boundary left and is ready to parametrize.
    Disk(SubMesh),
    /// The island was closed and has been cut into two global face groups.
    SeamCut {
        /// Faces grown from the top of the island.
        first: Vec<usize>,
        /// The remaining faces.
        second: Vec<usize>,
    },
}

/// Fill every hole of `island` except the longest, or cut it if closed.
///
/// # Errors
///
/// Returns [`MeshError::OpenBoundary`] if the boundary edges do not form
/// closed loops, and [`MeshError::NoBoundary`] if boundary edges exist but
/// no loop of three or more vertices could be traced from them.
pub fn resolve_holes(mut island: SubMesh) -> Result<HoleResolution> {
    let edges = directed_boundary_edges(&island.faces);
    if edges.is_empty() {
        debug!(faces = island.faces.len(), "Island is closed, cutting a seam");
        let (first, second) = seam_cut(&island);
        return Ok(HoleResolution::SeamCut { first, second });
    }

    let mut loops = trace_loops(&edges, island.num_vertices())?;
    if loops.is_empty() {
        return Err(MeshError::NoBoundary);
    }

    sort_loops_by_length(&mut loops, &island.positions);

    for ring in &loops[1..] {
        let fillers = triangulate(&island.positions, ring);
        debug!(
            ring = ring.len(),
            fillers = fillers.len(),
            "Filled hole"
        );
        island.faces.extend(fillers);
    }

    Ok(HoleResolution::Disk(island))
}
