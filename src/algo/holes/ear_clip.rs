//! Ear-clipping triangulation of 3D boundary loops.

use nalgebra::{Point3, Vector3};

use crate::mesh::Face;

/// Smallest turning angle, in degrees, accepted at an ear tip.
const MIN_EAR_ANGLE: f64 = 1.0;

/// Largest turning angle, in degrees, accepted at an ear tip.
const MAX_EAR_ANGLE: f64 = 179.0;

/// Triangulate a closed vertex loop by ear clipping.
///
/// Triangles follow the ring order `(ring[i], ring[i + 1], ring[i + 2])`.
/// Ears are measured against the loop's average normal, and a candidate is
/// rejected when another ring vertex lies inside it. If a full scan finds no
/// ear, clipping stops and the loop is only partially filled.
///
/// Returns no triangles for rings shorter than three vertices.
pub fn triangulate(positions: &[Point3<f64>], ring: &[usize]) -> Vec<Face> {
    if ring.len() < 3 {
        return Vec::new();
    }

    let mut fill = ring.to_vec();
    let direction = ring_normal(positions, &fill);
    let mut faces = Vec::with_capacity(ring.len() - 2);

    while fill.len() > 3 {
        let n = fill.len();
        let ear = (0..n).find(|&i| {
            let (enter, cone, leave) = corner(positions, &fill, i);
            let angle = turning_angle(&(cone - enter), &(leave - cone), &direction);
            if !(MIN_EAR_ANGLE..=MAX_EAR_ANGLE).contains(&angle) {
                return false;
            }
            (0..n - 3).all(|x| {
                let other = positions[fill[(i + 3 + x) % n]];
                !point_in_triangle(&enter, &cone, &leave, &other)
            })
        });

        let Some(i) = ear else {
            tracing::debug!(remaining = fill.len(), "No ear found, hole left partially filled");
            break;
        };

        let j = (i + 1) % n;
        faces.push([fill[i], fill[j], fill[(i + 2) % n]]);
        fill.remove(j);
    }

    if fill.len() == 3 {
        faces.push([fill[0], fill[1], fill[2]]);
    }

    faces
}

fn corner(
    positions: &[Point3<f64>],
    ring: &[usize],
    i: usize,
) -> (Point3<f64>, Point3<f64>, Point3<f64>) {
    let n = ring.len();
    (
        positions[ring[i]],
        positions[ring[(i + 1) % n]],
        positions[ring[(i + 2) % n]],
    )
}

/// Normalized sum of the normals of every consecutive vertex triple.
fn ring_normal(positions: &[Point3<f64>], ring: &[usize]) -> Vector3<f64> {
    let sum: Vector3<f64> = (0..ring.len())
        .map(|i| {
            let (a, b, c) = corner(positions, ring, i);
            (b - a)
                .cross(&(c - a))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros)
        })
        .sum();
    sum.try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Angle from `a` to `b` in degrees, in `[0, 360)` around `direction`.
fn turning_angle(a: &Vector3<f64>, b: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
    let cross = a.cross(b);
    let angle = cross.norm().atan2(a.dot(b)).to_degrees();
    if cross.dot(direction) < 0.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Inclusive point-in-triangle test for a point in the triangle's plane.
fn point_in_triangle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, p: &Point3<f64>) -> bool {
    let u = b - a;
    let v = c - a;
    let w = p - a;

    let v_x_w = v.cross(&w);
    let v_x_u = v.cross(&u);
    if v_x_w.dot(&v_x_u) < 0.0 {
        return false;
    }

    let u_x_w = u.cross(&w);
    let u_x_v = u.cross(&v);
    if u_x_w.dot(&u_x_v) < 0.0 {
        return false;
    }

    let denom = u_x_v.norm();
    if denom <= 0.0 {
        return false;
    }
    let r = v_x_w.norm() / denom;
    let t = u_x_w.norm() / denom;
    r + t <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangle_area;
    use std::f64::consts::TAU;

    fn polygon(points: &[(f64, f64)]) -> Vec<Point3<f64>> {
        points.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect()
    }

    fn total_area(positions: &[Point3<f64>], faces: &[Face]) -> f64 {
        faces
            .iter()
            .map(|f| triangle_area(&positions[f[0]], &positions[f[1]], &positions[f[2]]))
            .sum()
    }

    /// Signed area in the XY plane; positive for counter-clockwise.
    fn signed_area_xy(positions: &[Point3<f64>], f: &Face) -> f64 {
        let a = positions[f[0]];
        let b = positions[f[1]];
        let c = positions[f[2]];
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
    }

    #[test]
    fn test_square() {
        let positions = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let faces = triangulate(&positions, &[0, 1, 2, 3]);
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_convex_polygons_give_n_minus_two() {
        for n in 3..12 {
            let positions: Vec<Point3<f64>> = (0..n)
                .map(|i| {
                    let angle = i as f64 * TAU / n as f64;
                    Point3::new(angle.cos(), angle.sin(), 0.0)
                })
                .collect();
            let ring: Vec<usize> = (0..n).collect();
            let faces = triangulate(&positions, &ring);

            assert_eq!(faces.len(), n - 2, "n = {n}");
            let expected = 0.5 * n as f64 * (TAU / n as f64).sin();
            assert!((total_area(&positions, &faces) - expected).abs() < 1e-9);
            // Same winding as the ring, so no triangle folds over another.
            for face in &faces {
                assert!(signed_area_xy(&positions, face) > 0.0);
            }
        }
    }

    #[test]
    fn test_concave_polygon() {
        // Chevron with a reflex vertex at (1, 1).
        let positions = polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (1.0, 1.0), (0.0, 2.0)]);
        let faces = triangulate(&positions, &[0, 1, 2, 3, 4]);

        assert_eq!(faces.len(), 3);
        assert!((total_area(&positions, &faces) - 3.0).abs() < 1e-12);
        for face in &faces {
            assert!(signed_area_xy(&positions, face) > 0.0);
        }
    }

    #[test]
    fn test_ring_indices_are_global() {
        let positions = polygon(&[
            (9.0, 9.0),
            (0.0, 0.0),
            (9.0, 9.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]);
        let faces = triangulate(&positions, &[1, 3, 4]);
        assert_eq!(faces, vec![[1, 3, 4]]);
    }

    #[test]
    fn test_short_ring() {
        let positions = polygon(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(triangulate(&positions, &[0, 1]).is_empty());
    }

    #[test]
    fn test_turning_angle() {
        let up = Vector3::z();
        let x = Vector3::x();
        let y = Vector3::y();
        assert!((turning_angle(&x, &y, &up) - 90.0).abs() < 1e-12);
        assert!((turning_angle(&y, &x, &up) - 270.0).abs() < 1e-12);
    }
}
