//! Charts and chart sizing.
//!
//! A [`Chart`] is the parametrized form of one island: its global faces and
//! one [`FaceTextureCoords`] per face. Every transformation here returns a
//! new chart and leaves the input untouched.
//!
//! [`size_chart`] turns a raw chart into a [`SizedChart`]: it rejects charts
//! with a degenerate UV box, moves the box to the origin, optionally searches
//! a few rotations for a tighter box, and scales the size by the ratio of
//! surface area to UV area so that charts covering more of the surface get
//! more of the atlas.

use nalgebra::{Point2, Rotation2, Vector2};
use tracing::debug;

use crate::atlas::ChartPlacement;
use crate::mesh::{FaceTextureCoords, SubMesh, UvMesh};

use super::parameterize::{uv_bounding_box, uv_triangle_area, UVMap};

/// Rotations tried by [`size_chart`], in degrees.
pub const ROTATION_CANDIDATES: [f64; 8] = [5.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0];

/// A UV chart: faces of the input mesh and their texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Global face indices.
    pub faces: Vec<usize>,
    /// UVs per face, parallel to `faces`.
    pub uvs: Vec<FaceTextureCoords>,
    /// Partition the chart came from.
    pub partition: u32,
}

impl Chart {
    /// Build a chart from an island's source faces and its UV map.
    ///
    /// Filler faces past `island.num_source_faces()` are not part of the chart.
    pub fn from_island(island: &SubMesh, uv_map: &UVMap, partition: u32) -> Self {
        let count = island.num_source_faces();
        Self {
            faces: island.face_map.clone(),
            uvs: island.faces[..count]
                .iter()
                .map(|face| uv_map.face_coords(face))
                .collect(),
            partition,
        }
    }

    /// Number of faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the chart has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Bounding box of all UVs.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        uv_bounding_box(self.uvs.iter().flatten())
    }

    /// Total UV-space area.
    pub fn uv_area(&self) -> f64 {
        self.uvs
            .iter()
            .map(|[a, b, c]| uv_triangle_area(a, b, c))
            .sum()
    }

    /// Total 3D area of the chart's faces in `mesh`.
    pub fn surface_area(&self, mesh: &UvMesh) -> f64 {
        self.faces.iter().map(|&f| mesh.face_area(f)).sum()
    }

    /// Apply `f` to every UV.
    pub fn map_uvs<F>(&self, f: F) -> Self
    where
        F: Fn(Point2<f64>) -> Point2<f64>,
    {
        Self {
            faces: self.faces.clone(),
            uvs: self.uvs.iter().map(|coords| coords.map(&f)).collect(),
            partition: self.partition,
        }
    }

    /// Shift every UV by `offset`.
    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        self.map_uvs(|uv| uv + offset)
    }

    /// Rotate every UV by `radians` around `center`.
    pub fn rotated(&self, center: Point2<f64>, radians: f64) -> Self {
        let rotation = Rotation2::new(radians);
        self.map_uvs(|uv| center + rotation * (uv - center))
    }

    /// Map a chart with the given UV extent into its atlas placement.
    ///
    /// A rotated placement swaps U and V first. The result spans exactly the
    /// placement's rectangle.
    pub fn placed(&self, size: Vector2<f64>, placement: &ChartPlacement) -> Self {
        let (extent, rotated) = if placement.rotated {
            (Vector2::new(size.y, size.x), true)
        } else {
            (size, false)
        };
        let origin = placement.position;
        let target = placement.size;

        self.map_uvs(|uv| {
            let uv = if rotated { Point2::new(uv.y, uv.x) } else { uv };
            Point2::new(
                origin.x + uv.x / extent.x * target.x,
                origin.y + uv.y / extent.y * target.y,
            )
        })
    }

    /// The same chart with every UV at the origin.
    pub fn zeroed(&self) -> Self {
        self.map_uvs(|_| Point2::origin())
    }
}

/// A chart ready for packing.
#[derive(Debug, Clone)]
pub struct SizedChart {
    /// The chart, with its UV box starting at the origin.
    pub chart: Chart,
    /// Width and height of the UV box.
    pub size: Vector2<f64>,
    /// Size scaled to atlas units.
    pub scaled_size: Vector2<f64>,
}

/// Validate, normalize and size one chart.
///
/// Returns `None` if the chart's UV box has a non-positive, NaN or infinite
/// width or height. With `rotate` set, the chart is turned by each of
/// [`ROTATION_CANDIDATES`] around its box center, and the orientation with
/// the strictly smallest box area wins.
pub fn size_chart(
    chart: &Chart,
    mesh: &UvMesh,
    texel_size_per_unit: f64,
    rotate: bool,
) -> Option<SizedChart> {
    let (min, max) = chart.bounding_box()?;
    let mut size = max - min;
    if !is_valid_extent(size) {
        debug!(
            faces = chart.len(),
            width = size.x,
            height = size.y,
            "Rejecting chart with degenerate UV box"
        );
        return None;
    }

    let mut chart = chart.translated(-min.coords);
    let surface_area = chart.surface_area(mesh);
    let uv_area = chart.uv_area();

    if rotate {
        let center = Point2::from(size * 0.5);
        let mut best_area = size.x * size.y;
        let mut best = None;

        for degrees in ROTATION_CANDIDATES {
            let candidate = chart.rotated(center, degrees.to_radians());
            let Some((rot_min, rot_max)) = candidate.bounding_box() else {
                continue;
            };
            let rot_size = rot_max - rot_min;
            let area = rot_size.x * rot_size.y;
            if area < best_area {
                best_area = area;
                best = Some((candidate, rot_min, rot_size));
            }
        }

        if let Some((candidate, rot_min, rot_size)) = best {
            chart = candidate.translated(-rot_min.coords);
            size = rot_size;
        }
    }

    let ratio = if uv_area > 0.0 {
        surface_area / uv_area
    } else {
        1.0
    };
    let scale = ratio * texel_size_per_unit;

    Some(SizedChart {
        chart,
        size,
        scaled_size: size * scale,
    })
}

#[inline]
fn is_valid_extent(size: Vector2<f64>) -> bool {
    size.iter().all(|&s| s > 0.0 && s.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn create_square_mesh(side: f64) -> UvMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(side, 0.0, 0.0),
            Point3::new(side, side, 0.0),
            Point3::new(0.0, side, 0.0),
        ];
        UvMesh::new(positions, vec![[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    /// Unit-square chart at (`x`, `y`) covering both faces of the square mesh.
    fn square_chart(x: f64, y: f64, w: f64, h: f64) -> Chart {
        Chart {
            faces: vec![0, 1],
            uvs: vec![
                [p(x, y), p(x + w, y), p(x + w, y + h)],
                [p(x, y), p(x + w, y + h), p(x, y + h)],
            ],
            partition: 3,
        }
    }

    #[test]
    fn test_from_island_skips_fillers() {
        let mesh = create_square_mesh(1.0);
        let mut island = SubMesh::extract(&mesh, &[1]);
        island.faces.push([0, 1, 2]);
        let uv_map = UVMap::new(vec![p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);

        let chart = Chart::from_island(&island, &uv_map, 7);
        assert_eq!(chart.faces, vec![1]);
        assert_eq!(chart.uvs.len(), 1);
        assert_eq!(chart.uvs[0], [p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);
        assert_eq!(chart.partition, 7);
    }

    #[test]
    fn test_size_normalizes_to_origin() {
        let mesh = create_square_mesh(1.0);
        let chart = square_chart(2.0, 3.0, 0.5, 0.25);

        let sized = size_chart(&chart, &mesh, 1.0, false).unwrap();
        let (min, max) = sized.chart.bounding_box().unwrap();
        assert_eq!(min, p(0.0, 0.0));
        assert!((max - p(0.5, 0.25)).norm() < 1e-12);
        assert!((sized.size - Vector2::new(0.5, 0.25)).norm() < 1e-12);
        assert_eq!(sized.chart.faces, chart.faces);
        assert_eq!(sized.chart.partition, 3);
    }

    #[test]
    fn test_scale_uses_area_ratio() {
        // Surface area 4, UV area 1: sizes scale by 4 * texel size.
        let mesh = create_square_mesh(2.0);
        let chart = square_chart(0.0, 0.0, 1.0, 1.0);

        let sized = size_chart(&chart, &mesh, 0.5, false).unwrap();
        assert!((sized.scaled_size - Vector2::new(2.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_charts_rejected() {
        let mesh = create_square_mesh(1.0);

        let flat = square_chart(0.0, 0.0, 1.0, 0.0);
        assert!(size_chart(&flat, &mesh, 1.0, true).is_none());

        let nan = square_chart(0.0, f64::NAN, 1.0, 1.0);
        assert!(size_chart(&nan, &mesh, 1.0, true).is_none());

        let inf = square_chart(0.0, 0.0, f64::INFINITY, 1.0);
        assert!(size_chart(&inf, &mesh, 1.0, true).is_none());
    }

    #[test]
    fn test_axis_aligned_square_is_not_rotated() {
        let mesh = create_square_mesh(1.0);
        let chart = square_chart(0.0, 0.0, 1.0, 1.0);

        let sized = size_chart(&chart, &mesh, 1.0, true).unwrap();
        assert_eq!(sized.chart, chart);
        assert_eq!(sized.size, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn test_rotation_tightens_diamond() {
        // Unit square turned by 45 degrees: its box has area 2 until it is
        // turned back.
        let mesh = create_square_mesh(1.0);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let chart = Chart {
            faces: vec![0, 1],
            uvs: vec![
                [p(h, 0.0), p(2.0 * h, h), p(h, 2.0 * h)],
                [p(h, 0.0), p(h, 2.0 * h), p(0.0, h)],
            ],
            partition: 0,
        };

        let sized = size_chart(&chart, &mesh, 1.0, true).unwrap();
        assert!((sized.size.x * sized.size.y - 1.0).abs() < 1e-9);
        let (min, _) = sized.chart.bounding_box().unwrap();
        assert!(min.coords.norm() < 1e-12);

        let unrotated = size_chart(&chart, &mesh, 1.0, false).unwrap();
        assert!((unrotated.size.x * unrotated.size.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_placed_maps_into_rectangle() {
        let chart = square_chart(0.0, 0.0, 2.0, 1.0);
        let placement = ChartPlacement {
            position: p(0.5, 0.25),
            size: Vector2::new(0.4, 0.2),
            rotated: false,
        };

        let placed = chart.placed(Vector2::new(2.0, 1.0), &placement);
        let (min, max) = placed.bounding_box().unwrap();
        assert!((min - p(0.5, 0.25)).norm() < 1e-12);
        assert!((max - p(0.9, 0.45)).norm() < 1e-12);
    }

    #[test]
    fn test_placed_rotated_swaps_axes() {
        let chart = square_chart(0.0, 0.0, 2.0, 1.0);
        let placement = ChartPlacement {
            position: p(0.0, 0.0),
            size: Vector2::new(0.1, 0.2),
            rotated: true,
        };

        let placed = chart.placed(Vector2::new(2.0, 1.0), &placement);
        let (min, max) = placed.bounding_box().unwrap();
        assert!(min.coords.norm() < 1e-12);
        assert!((max - p(0.1, 0.2)).norm() < 1e-12);
        // The chart's (2, 0) corner lands at the bottom of the placement.
        assert!((placed.uvs[0][1] - p(0.0, 0.2)).norm() < 1e-12);
    }

    #[test]
    fn test_zeroed() {
        let chart = square_chart(1.0, 1.0, 1.0, 1.0).zeroed();
        assert!(chart.uvs.iter().flatten().all(|uv| *uv == Point2::origin()));
        assert_eq!(chart.faces, vec![0, 1]);
    }
}
