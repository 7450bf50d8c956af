//! UV coordinate storage.
//!
//! This module provides the [`UVMap`] type for storing 2D parameterization
//! coordinates for the vertices of an island.

use nalgebra::Point2;

use crate::mesh::{Face, FaceTextureCoords};

/// UV coordinates for island vertices.
///
/// Index `i` holds the UV of local vertex `i`. Coordinates produced by
/// [`parametrize`](super::parametrize) lie around `(0.5, 0.5)` but are not
/// clamped to any range.
#[derive(Debug, Clone, PartialEq)]
pub struct UVMap {
    coords: Vec<Point2<f64>>,
}

impl UVMap {
    /// Create a new UV map with the given coordinates.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Create a UV map with every vertex at `uv`.
    pub fn filled(n: usize, uv: Point2<f64>) -> Self {
        Self {
            coords: vec![uv; n],
        }
    }

    /// Get the UV coordinates for a vertex.
    #[inline]
    pub fn get(&self, v: usize) -> Point2<f64> {
        self.coords[v]
    }

    /// Set the UV coordinates for a vertex.
    #[inline]
    pub fn set(&mut self, v: usize, uv: Point2<f64>) {
        self.coords[v] = uv;
    }

    /// Get the number of UV coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// The three UVs of a face, in the face's vertex order.
    #[inline]
    pub fn face_coords(&self, face: &Face) -> FaceTextureCoords {
        [
            self.coords[face[0]],
            self.coords[face[1]],
            self.coords[face[2]],
        ]
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the UV map is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        uv_bounding_box(self.coords.iter())
    }

    /// Compute the total area in UV space of the given faces.
    pub fn total_area(&self, faces: &[Face]) -> f64 {
        faces
            .iter()
            .map(|face| {
                let [a, b, c] = self.face_coords(face);
                uv_triangle_area(&a, &b, &c)
            })
            .sum()
    }
}

/// Unsigned area of a UV triangle.
#[inline]
pub fn uv_triangle_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

/// Bounding box of a set of UVs, `None` when there are none.
pub fn uv_bounding_box<'a, I>(coords: I) -> Option<(Point2<f64>, Point2<f64>)>
where
    I: IntoIterator<Item = &'a Point2<f64>>,
{
    let mut iter = coords.into_iter();
    let first = *iter.next()?;
    let (mut min, mut max) = (first, first);

    for uv in iter {
        min.x = min.x.min(uv.x);
        min.y = min.y.min(uv.y);
        max.x = max.x.max(uv.x);
        max.y = max.y.max(uv.y);
    }

    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_map_basic() {
        let coords = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let mut uv_map = UVMap::new(coords);

        assert_eq!(uv_map.len(), 3);
        assert!(!uv_map.is_empty());
        assert_eq!(uv_map.get(2), Point2::new(0.5, 1.0));

        uv_map.set(2, Point2::new(0.25, 0.75));
        assert_eq!(
            uv_map.face_coords(&[2, 0, 1]),
            [
                Point2::new(0.25, 0.75),
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_uv_map_bounding_box() {
        let coords = vec![
            Point2::new(-1.0, 0.5),
            Point2::new(2.0, -0.5),
            Point2::new(0.5, 3.0),
        ];
        let uv_map = UVMap::new(coords);

        let (min, max) = uv_map.bounding_box().unwrap();
        assert_eq!(min, Point2::new(-1.0, -0.5));
        assert_eq!(max, Point2::new(2.0, 3.0));

        assert!(UVMap::new(Vec::new()).bounding_box().is_none());
    }

    #[test]
    fn test_uv_map_total_area() {
        let uv_map = UVMap::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ]);

        // Winding does not matter.
        let area = uv_map.total_area(&[[0, 1, 2], [1, 2, 3]]);
        assert!((area - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_filled() {
        let uv_map = UVMap::filled(4, Point2::new(0.5, 0.5));
        assert_eq!(uv_map.len(), 4);
        assert!(uv_map.as_slice().iter().all(|uv| *uv == Point2::new(0.5, 0.5)));
    }
}
