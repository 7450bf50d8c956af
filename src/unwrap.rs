//! The unwrap pipeline.
//!
//! [`unwrap`] runs the stages of [`UnwrapStage`] in order over one mesh:
//!
//! 1. **Partition**: group faces by partition id.
//! 2. **SplitIslands**: split each partition into connected, normal-coherent
//!    islands.
//! 3. **ResolveHoles**: fill all but the longest boundary loop and cut closed
//!    islands in two.
//! 4. **Parametrize**: map every resulting disk onto a circle and relax it.
//! 5. **SizeAndFilter**: drop charts with a degenerate UV box, normalize,
//!    search rotations, and scale by surface area.
//! 6. **Pack**: pack the scaled sizes into a square atlas.
//! 7. **Finalize**: map each chart into its rectangle and write per-face UVs.
//!
//! Failures inside a stage stay local: an island that cannot be resolved or
//! parametrized is logged and dropped, and a chart the packer could not place
//! gets a zero rectangle and zero UVs. Only invalid options are reported as
//! an error.

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::algo::chart::{size_chart, Chart, SizedChart};
use crate::algo::holes::{resolve_holes, HoleResolution};
use crate::algo::parameterize::{parametrize, ParametrizeOptions};
use crate::algo::segment::{partition_faces, split_islands, SegmentOptions};
use crate::algo::Progress;
use crate::atlas::{pack_charts, ChartPlacement, PackOptions, UvRect};
use crate::error::{MeshError, Result};
use crate::mesh::{FaceTextureCoords, SubMesh, UvMesh};

/// Options for [`unwrap`].
#[derive(Debug, Clone)]
pub struct UnwrapOptions {
    /// Atlas units per unit of surface area ratio; scales every chart.
    pub texel_size_per_unit: f64,

    /// Whether to break islands at normal discontinuities.
    pub segment_by_normal: bool,

    /// Neighbors join an island only if their normal dot product with the
    /// reference normal is strictly greater than this (0 = 90 degrees).
    pub normal_threshold: f64,

    /// Use the island's seed face as the reference normal instead of the
    /// face being expanded.
    pub prefer_more_pieces: bool,

    /// Whether charts may be rotated, both during sizing and packing.
    pub enable_rotation: bool,

    /// Whether to resolve islands and run packing heuristics in parallel.
    pub parallel: bool,

    /// Options for the per-island parametrization.
    pub parametrize: ParametrizeOptions,

    /// Options for the atlas packer.
    pub pack: PackOptions,
}

impl Default for UnwrapOptions {
    fn default() -> Self {
        Self {
            texel_size_per_unit: 1.0,
            segment_by_normal: true,
            normal_threshold: 0.0,
            prefer_more_pieces: true,
            enable_rotation: true,
            parallel: true,
            parametrize: ParametrizeOptions::default(),
            pack: PackOptions::default(),
        }
    }
}

impl UnwrapOptions {
    /// Set the texel size per unit.
    pub fn with_texel_size_per_unit(mut self, texel_size: f64) -> Self {
        self.texel_size_per_unit = texel_size;
        self
    }

    /// Set whether to segment by normal.
    pub fn with_segment_by_normal(mut self, enabled: bool) -> Self {
        self.segment_by_normal = enabled;
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

    /// Set whether charts may be rotated.
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.enable_rotation = enabled;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(self) -> Self {
        self.with_parallel(false)
    }

    /// Set the parametrization options.
    pub fn with_parametrize(mut self, options: ParametrizeOptions) -> Self {
        self.parametrize = options;
        self
    }

    /// Set the packing options.
    ///
    /// Rotation and parallelism are still taken from this struct.
    pub fn with_pack(mut self, options: PackOptions) -> Self {
        self.pack = options;
        self
    }

    /// Check that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] for a texel size that is not a
    /// positive finite number, a normal threshold outside `[-1, 1]`, or an
    /// invalid [`ParametrizeOptions`] or [`PackOptions`] value.
    pub fn validate(&self) -> Result<()> {
        if !(self.texel_size_per_unit.is_finite() && self.texel_size_per_unit > 0.0) {
            return Err(MeshError::invalid_param(
                "texel_size_per_unit",
                self.texel_size_per_unit,
                "must be positive",
            ));
        }
        if !(-1.0..=1.0).contains(&self.normal_threshold) {
            return Err(MeshError::invalid_param(
                "normal_threshold",
                self.normal_threshold,
                "must be in [-1, 1]",
            ));
        }
        self.parametrize.validate()?;
        self.pack.validate()
    }

    fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            by_normal: self.segment_by_normal,
            normal_threshold: self.normal_threshold,
            prefer_more_pieces: self.prefer_more_pieces,
        }
    }

    fn pack_options(&self) -> PackOptions {
        self.pack
            .clone()
            .with_rotation(self.enable_rotation)
            .with_parallel(self.parallel)
    }
}

/// Result of [`unwrap`].
#[derive(Debug, Clone, Default)]
pub struct UnwrapOutput {
    /// Side length of the square atlas.
    pub texture_size: f64,
    /// Placement of every chart in normalized atlas coordinates, parallel to
    /// `charts`. Unplaced charts have a zero rectangle.
    pub chart_rects: Vec<UvRect>,
    /// Packer placement of every chart, parallel to `charts`. `None` for
    /// charts that did not fit.
    pub placements: Vec<Option<ChartPlacement>>,
    /// Final charts, with UVs in atlas coordinates.
    pub charts: Vec<Chart>,
    /// UVs of every input face, in input order. Faces in no chart keep
    /// zero UVs.
    pub face_uvs: Vec<FaceTextureCoords>,
}

/// The stages of [`unwrap`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnwrapStage {
    /// Group faces by partition id.
    Partition,
    /// Split partitions into islands.
    SplitIslands,
    /// Fill holes and cut closed islands.
    ResolveHoles,
    /// Map every resolved island to UVs.
    Parametrize,
    /// Validate, rotate and size charts.
    SizeAndFilter,
    /// Pack charts into the atlas.
    Pack,
    /// Write final UVs.
    Finalize,
}

impl UnwrapStage {
    /// All stages, in execution order.
    pub const ALL: [UnwrapStage; 7] = [
        UnwrapStage::Partition,
        UnwrapStage::SplitIslands,
        UnwrapStage::ResolveHoles,
        UnwrapStage::Parametrize,
        UnwrapStage::SizeAndFilter,
        UnwrapStage::Pack,
        UnwrapStage::Finalize,
    ];

    /// Position of the stage in [`UnwrapStage::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable stage description.
    pub fn name(self) -> &'static str {
        match self {
            UnwrapStage::Partition => "Partitioning faces",
            UnwrapStage::SplitIslands => "Splitting islands",
            UnwrapStage::ResolveHoles => "Resolving holes",
            UnwrapStage::Parametrize => "Parametrizing islands",
            UnwrapStage::SizeAndFilter => "Sizing charts",
            UnwrapStage::Pack => "Packing charts",
            UnwrapStage::Finalize => "Finalizing UVs",
        }
    }

    fn report(self, progress: Option<&Progress>) {
        if let Some(p) = progress {
            p.report(self.index(), Self::ALL.len(), self.name());
        }
    }
}

/// Unwrap a mesh into packed UV charts.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if `options` fail
/// [`UnwrapOptions::validate`]. Every other failure is handled inside the
/// pipeline and shows up as missing or zero-sized charts.
///
/// # Example
///
/// ```
/// use texatlas::{unwrap, UnwrapOptions, UvMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = UvMesh::new(positions, vec![[0, 1, 2], [0, 2, 3]])
///     .unwrap()
///     .with_computed_normals();
///
/// let output = unwrap(&mesh, &UnwrapOptions::default()).unwrap();
/// assert_eq!(output.charts.len(), 1);
/// assert_eq!(output.face_uvs.len(), 2);
/// ```
pub fn unwrap(mesh: &UvMesh, options: &UnwrapOptions) -> Result<UnwrapOutput> {
    unwrap_internal(mesh, options, None)
}

/// Unwrap a mesh with progress reporting.
///
/// See [`unwrap`] for details. The callback receives one report per
/// [`UnwrapStage`] and, when running sequentially, sub-step reports per
/// island.
pub fn unwrap_with_progress(
    mesh: &UvMesh,
    options: &UnwrapOptions,
    progress: &Progress,
) -> Result<UnwrapOutput> {
    unwrap_internal(mesh, options, Some(progress))
}

fn unwrap_internal(
    mesh: &UvMesh,
    options: &UnwrapOptions,
    progress: Option<&Progress>,
) -> Result<UnwrapOutput> {
    options.validate()?;

    if mesh.num_faces() == 0 || mesh.num_vertices() == 0 {
        debug!("Empty mesh, nothing to unwrap");
        return Ok(UnwrapOutput {
            face_uvs: vec![zero_uvs(); mesh.num_faces()],
            ..UnwrapOutput::default()
        });
    }

    info!(
        vertices = mesh.num_vertices(),
        faces = mesh.num_faces(),
        "Starting unwrap"
    );

    UnwrapStage::Partition.report(progress);
    let partitions = partition_faces(mesh);

    UnwrapStage::SplitIslands.report(progress);
    let segment = options.segment_options();
    let islands: Vec<(u32, Vec<usize>)> = partitions
        .iter()
        .flat_map(|(&partition, group)| {
            split_islands(mesh, group, &segment)
                .into_iter()
                .map(move |island| (partition, island))
        })
        .collect();
    info!(
        partitions = partitions.len(),
        islands = islands.len(),
        "Segmented mesh"
    );

    UnwrapStage::ResolveHoles.report(progress);
    let resolved = resolve_islands(mesh, islands, options, progress);

    UnwrapStage::Parametrize.report(progress);
    let charts = parametrize_islands(resolved, options);

    UnwrapStage::SizeAndFilter.report(progress);
    let sized = size_charts(mesh, &charts, options);
    if sized.len() < charts.len() {
        warn!(
            dropped = charts.len() - sized.len(),
            "Dropped charts with degenerate UV bounds"
        );
    }

    UnwrapStage::Pack.report(progress);
    let scaled: Vec<Vector2<f64>> = sized.iter().map(|s| s.scaled_size).collect();
    let packed = pack_charts(&scaled, &options.pack_options());

    UnwrapStage::Finalize.report(progress);
    let mut output = UnwrapOutput {
        texture_size: packed.texture_size,
        chart_rects: Vec::with_capacity(sized.len()),
        placements: packed.placements.clone(),
        charts: Vec::with_capacity(sized.len()),
        face_uvs: vec![zero_uvs(); mesh.num_faces()],
    };

    for (sized_chart, placement) in sized.into_iter().zip(&packed.placements) {
        let (chart, rect) = match placement {
            Some(placement) => (
                sized_chart.chart.placed(sized_chart.size, placement),
                UvRect {
                    left: placement.position.x,
                    top: placement.position.y,
                    width: placement.size.x,
                    height: placement.size.y,
                },
            ),
            None => (sized_chart.chart.zeroed(), UvRect::default()),
        };

        for (&face, uvs) in chart.faces.iter().zip(&chart.uvs) {
            output.face_uvs[face] = *uvs;
        }
        output.chart_rects.push(rect);
        output.charts.push(chart);
    }

    info!(
        charts = output.charts.len(),
        texture_size = output.texture_size,
        "Unwrap complete"
    );

    if let Some(p) = progress {
        let total = UnwrapStage::ALL.len();
        p.report(total, total, "Unwrap complete");
    }

    Ok(output)
}

#[inline]
fn zero_uvs() -> FaceTextureCoords {
    [Point2::origin(); 3]
}

/// Whether an island still needs its boundary checked before parametrizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoleCheck {
    /// Fill extra holes or cut the island if it is closed.
    Check,
    /// Parametrize as is. Used for both halves of a seam cut, which are
    /// never cut again.
    Skip,
}

/// One unit of island work.
#[derive(Debug, Clone)]
struct IslandTask {
    faces: Vec<usize>,
    partition: u32,
    hole_check: HoleCheck,
}

/// An island ready for parametrization.
#[derive(Debug, Clone)]
struct ResolvedIsland {
    island: SubMesh,
    partition: u32,
}

/// What resolving one task produced.
enum IslandStep {
    Disk(ResolvedIsland),
    Split(IslandTask, IslandTask),
    Dropped,
}

/// Resolve every island into disks, keeping island order.
fn resolve_islands(
    mesh: &UvMesh,
    islands: Vec<(u32, Vec<usize>)>,
    options: &UnwrapOptions,
    progress: Option<&Progress>,
) -> Vec<ResolvedIsland> {
    let stage = UnwrapStage::ResolveHoles;
    let total = islands.len();

    let per_island: Vec<Vec<ResolvedIsland>> = if options.parallel {
        islands
            .into_par_iter()
            .map(|(partition, faces)| resolve_island(mesh, partition, faces))
            .collect()
    } else {
        islands
            .into_iter()
            .enumerate()
            .map(|(i, (partition, faces))| {
                if let Some(p) = progress {
                    p.report_sub(i, total, stage.index(), UnwrapStage::ALL.len(), stage.name());
                }
                resolve_island(mesh, partition, faces)
            })
            .collect()
    };

    let resolved: Vec<ResolvedIsland> = per_island.into_iter().flatten().collect();
    info!(islands = total, disks = resolved.len(), "Resolved holes");
    resolved
}

/// Parametrize every resolved island, dropping the ones that fail.
fn parametrize_islands(resolved: Vec<ResolvedIsland>, options: &UnwrapOptions) -> Vec<Chart> {
    let total = resolved.len();
    let charts: Vec<Chart> = if options.parallel {
        resolved
            .into_par_iter()
            .filter_map(|r| parametrize_island(r, &options.parametrize))
            .collect()
    } else {
        resolved
            .into_iter()
            .filter_map(|r| parametrize_island(r, &options.parametrize))
            .collect()
    };
    info!(islands = total, charts = charts.len(), "Parametrized islands");
    charts
}

fn parametrize_island(resolved: ResolvedIsland, options: &ParametrizeOptions) -> Option<Chart> {
    let ResolvedIsland { island, partition } = resolved;
    match parametrize(&island.positions, &island.faces, options) {
        Ok(uv_map) => Some(Chart::from_island(&island, &uv_map, partition)),
        Err(err) => {
            warn!(
                partition,
                faces = island.num_source_faces(),
                error = %err,
                "Dropping island that could not be parametrized"
            );
            None
        }
    }
}

/// Turn one island into disks, working through seam cuts depth first.
fn resolve_island(mesh: &UvMesh, partition: u32, faces: Vec<usize>) -> Vec<ResolvedIsland> {
    let mut stack = vec![IslandTask {
        faces,
        partition,
        hole_check: HoleCheck::Check,
    }];
    let mut resolved = Vec::new();

    while let Some(task) = stack.pop() {
        let face_count = task.faces.len();
        match resolve_task(mesh, task) {
            Ok(IslandStep::Disk(disk)) => resolved.push(disk),
            Ok(IslandStep::Split(first, second)) => {
                stack.push(second);
                stack.push(first);
            }
            Ok(IslandStep::Dropped) => {}
            Err(err) => {
                warn!(
                    partition,
                    faces = face_count,
                    error = %err,
                    "Dropping island"
                );
            }
        }
    }

    resolved
}

fn resolve_task(mesh: &UvMesh, task: IslandTask) -> Result<IslandStep> {
    if task.faces.is_empty() {
        return Ok(IslandStep::Dropped);
    }

    let island = SubMesh::extract(mesh, &task.faces);
    let island = match task.hole_check {
        HoleCheck::Skip => island,
        HoleCheck::Check => match resolve_holes(island)? {
            HoleResolution::Disk(island) => island,
            HoleResolution::SeamCut { first, second } => {
                if first.is_empty() || second.is_empty() {
                    warn!(
                        partition = task.partition,
                        faces = task.faces.len(),
                        "Seam cut left an empty half, dropping island"
                    );
                    return Ok(IslandStep::Dropped);
                }
                debug!(
                    first = first.len(),
                    second = second.len(),
                    "Cut closed island"
                );
                let half = |faces| IslandTask {
                    faces,
                    partition: task.partition,
                    hole_check: HoleCheck::Skip,
                };
                return Ok(IslandStep::Split(half(first), half(second)));
            }
        },
    };

    Ok(IslandStep::Disk(ResolvedIsland {
        island,
        partition: task.partition,
    }))
}

/// Size every chart, dropping the degenerate ones.
fn size_charts(mesh: &UvMesh, charts: &[Chart], options: &UnwrapOptions) -> Vec<SizedChart> {
    let size = |chart: &Chart| {
        size_chart(
            chart,
            mesh,
            options.texel_size_per_unit,
            options.enable_rotation,
        )
    };

    if options.parallel {
        charts.par_iter().filter_map(size).collect()
    } else {
        charts.iter().filter_map(size).collect()
    }
}
