//! Circle-boundary parametrization with neighbor relaxation.
//!
//! The boundary loop is spread evenly around a circle centered at
//! `(0.5, 0.5)`, every other vertex starts at the center, and a few rounds of
//! uniform Laplacian relaxation pull the interior into place. This is a fast
//! approximation of a harmonic map with fixed boundary (Tutte embedding); it
//! only has to give the packer a sensible starting layout.
//!
//! By default boundary vertices are relaxed too, which slightly shrinks the
//! chart away from the circle. Set [`ParametrizeOptions::pin_boundary`] to
//! keep them fixed.

use std::f64::consts::TAU;

use nalgebra::{Point2, Point3, Vector2};

use crate::error::{MeshError, Result};
use crate::mesh::topology::{single_use_edges, sort_loops_by_length, trace_loops, vertex_neighbors};
use crate::mesh::Face;

use super::uv::UVMap;

/// Options for [`parametrize`].
#[derive(Debug, Clone)]
pub struct ParametrizeOptions {
    /// Number of relaxation rounds.
    pub iterations: usize,

    /// How far each round moves a vertex toward its neighbor average (0.0 to 1.0).
    pub relaxation: f64,

    /// Radius of the boundary circle.
    pub boundary_radius: f64,

    /// Whether boundary vertices stay on the circle during relaxation.
    pub pin_boundary: bool,
}

impl Default for ParametrizeOptions {
    fn default() -> Self {
        Self {
            iterations: 5,
            relaxation: 0.5,
            boundary_radius: 1.0,
            pin_boundary: false,
        }
    }
}

impl ParametrizeOptions {
    /// Set the number of relaxation rounds.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the relaxation factor.
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation.clamp(0.0, 1.0);
        self
    }

    /// Set the boundary circle radius.
    pub fn with_boundary_radius(mut self, radius: f64) -> Self {
        self.boundary_radius = radius;
        self
    }

    /// Keep boundary vertices fixed during relaxation.
    pub fn pin_boundary(mut self) -> Self {
        self.pin_boundary = true;
        self
    }

    /// Check that the options give a usable layout.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] for a boundary radius that is
    /// not a positive finite number, or a relaxation factor outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.boundary_radius.is_finite() && self.boundary_radius > 0.0) {
            return Err(MeshError::invalid_param(
                "boundary_radius",
                self.boundary_radius,
                "must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.relaxation) {
            return Err(MeshError::invalid_param(
                "relaxation",
                self.relaxation,
                "must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Center of the boundary circle.
#[inline]
fn center() -> Point2<f64> {
    Point2::new(0.5, 0.5)
}

/// Compute UVs for every vertex of a disk-like island.
///
/// The boundary is formed by edges used by exactly one face. If it has
/// several loops, the longest one is mapped to the circle and the others are
/// treated like interior vertices.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if there are no vertices or no faces
/// - [`MeshError::NoBoundary`] if the faces form a closed surface
/// - [`MeshError::OpenBoundary`] if the boundary edges do not close up
///
/// # Example
///
/// ```
/// use texatlas::algo::parameterize::{parametrize, ParametrizeOptions};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2], [0, 2, 3]];
///
/// let uvs = parametrize(&positions, &faces, &ParametrizeOptions::default()).unwrap();
/// assert_eq!(uvs.len(), 4);
/// ```
pub fn parametrize(
    positions: &[Point3<f64>],
    faces: &[Face],
    options: &ParametrizeOptions,
) -> Result<UVMap> {
    let n = positions.len();
    if n == 0 || faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let edges = single_use_edges(faces);
    if edges.is_empty() {
        return Err(MeshError::NoBoundary);
    }

    let mut loops = trace_loops(&edges, n)?;
    if loops.is_empty() {
        return Err(MeshError::NoBoundary);
    }
    sort_loops_by_length(&mut loops, positions);
    let boundary = &loops[0];

    let center = center();
    let mut uvs = UVMap::filled(n, center);
    let mut on_boundary = vec![false; n];
    let step = TAU / boundary.len() as f64;
    for (i, &v) in boundary.iter().enumerate() {
        let angle = i as f64 * step;
        uvs.set(
            v,
            Point2::new(
                center.x + options.boundary_radius * angle.cos(),
                center.y + options.boundary_radius * angle.sin(),
            ),
        );
        on_boundary[v] = true;
    }

    let neighbors = vertex_neighbors(faces, n);
    for _ in 0..options.iterations {
        let current = uvs.clone();
        for (v, ring) in neighbors.iter().enumerate() {
            if ring.is_empty() || (options.pin_boundary && on_boundary[v]) {
                continue;
            }
            let sum = ring
                .iter()
                .fold(Vector2::zeros(), |acc, &u| acc + current.get(u).coords);
            let average = Point2::from(sum / ring.len() as f64);
            let uv = current.get(v);
            uvs.set(v, uv + (average - uv) * options.relaxation);
        }
    }

    Ok(uvs)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle fan: vertex 0 at the center, `n` rim vertices on a circle.
    fn create_fan(n: usize) -> (Vec<Point3<f64>>, Vec<Face>) {
        let mut positions = vec![Point3::origin()];
        for i in 0..n {
            let angle = i as f64 * TAU / n as f64;
            positions.push(Point3::new(angle.cos(), angle.sin(), 0.0));
        }
        let faces = (0..n).map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        (positions, faces)
    }

    #[test]
    fn test_boundary_on_circle_without_relaxation() {
        let (positions, faces) = create_fan(8);
        let options = ParametrizeOptions::default().with_iterations(0);
        let uvs = parametrize(&positions, &faces, &options).unwrap();

        assert_eq!(uvs.get(0), center());
        for k in 1..=8 {
            let offset = uvs.get(k) - center();
            assert!((offset.norm() - 1.0).abs() < 1e-12);

            let expected = (k - 1) as f64 * TAU / 8.0;
            let angle = offset.y.atan2(offset.x).rem_euclid(TAU);
            let diff = (angle - expected).abs();
            assert!(diff < 1e-9 || (TAU - diff) < 1e-9, "vertex {k}: {angle} vs {expected}");
        }
    }

    #[test]
    fn test_validate() {
        assert!(ParametrizeOptions::default().validate().is_ok());
        assert!(ParametrizeOptions::default()
            .with_boundary_radius(0.0)
            .validate()
            .is_err());
        assert!(ParametrizeOptions::default()
            .with_boundary_radius(f64::INFINITY)
            .validate()
            .is_err());

        let options = ParametrizeOptions {
            relaxation: 1.5,
            ..ParametrizeOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(MeshError::InvalidParameter { name: "relaxation", .. })
        ));
    }

    #[test]
    fn test_custom_radius() {
        let (positions, faces) = create_fan(6);
        let options = ParametrizeOptions::default()
            .with_iterations(0)
            .with_boundary_radius(0.5);
        let uvs = parametrize(&positions, &faces, &options).unwrap();
        let (min, max) = uvs.bounding_box().unwrap();
        assert!(min.x >= -1e-12 && max.x <= 1.0 + 1e-12);
        assert!(min.y >= -1e-12 && max.y <= 1.0 + 1e-12);
    }

    #[test]
    fn test_relaxation_moves_boundary_inward() {
        let (positions, faces) = create_fan(8);
        let uvs = parametrize(&positions, &faces, &ParametrizeOptions::default()).unwrap();

        // Symmetric fan keeps its center.
        assert!((uvs.get(0) - center()).norm() < 1e-9);
        for k in 1..=8 {
            let radius = (uvs.get(k) - center()).norm();
            assert!(radius < 1.0 && radius > 0.0);
        }
    }

    #[test]
    fn test_pinned_boundary_stays_on_circle() {
        let (positions, faces) = create_fan(8);
        let options = ParametrizeOptions::default().pin_boundary();
        let uvs = parametrize(&positions, &faces, &options).unwrap();

        for k in 1..=8 {
            assert!(((uvs.get(k) - center()).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_strip_gives_finite_layout() {
        // 3x2 vertex strip, every vertex on the boundary.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]];
        let uvs = parametrize(&positions, &faces, &ParametrizeOptions::default()).unwrap();
        assert_eq!(uvs.len(), 6);
        assert!(uvs.as_slice().iter().all(|uv| uv.x.is_finite() && uv.y.is_finite()));
        assert!(uvs.total_area(&faces) > 0.0);
    }

    #[test]
    fn test_closed_surface_fails() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let result = parametrize(&positions, &faces, &ParametrizeOptions::default());
        assert!(matches!(result, Err(MeshError::NoBoundary)));
    }

    #[test]
    fn test_empty_input_fails() {
        let result = parametrize(&[], &[], &ParametrizeOptions::default());
        assert!(matches!(result, Err(MeshError::EmptyMesh)));

        let positions = vec![Point3::origin()];
        let result = parametrize(&positions, &[], &ParametrizeOptions::default());
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_longest_loop_is_the_boundary() {
        // Annulus: outer rim 1..=6 of radius 1, inner rim 7..=12 of radius
        // 0.2. Vertex 0 is unused.
        let mut positions = vec![Point3::origin()];
        for radius in [1.0, 0.2] {
            for i in 0..6 {
                let angle = i as f64 * TAU / 6.0;
                positions.push(Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0));
            }
        }
        let mut faces = Vec::new();
        for i in 0..6 {
            let outer = 1 + i;
            let outer_next = 1 + (i + 1) % 6;
            let inner = 7 + i;
            let inner_next = 7 + (i + 1) % 6;
            faces.push([inner, outer, outer_next]);
            faces.push([inner, outer_next, inner_next]);
        }

        let options = ParametrizeOptions::default().with_iterations(0);
        let uvs = parametrize(&positions, &faces, &options).unwrap();
        for k in 1..=6 {
            assert!(((uvs.get(k) - center()).norm() - 1.0).abs() < 1e-12);
        }
        for k in 7..=12 {
            assert_eq!(uvs.get(k), center());
        }
    }
}
