//! Chart packing into a square atlas.
//!
//! Charts arrive as real-valued sizes. Every attempt converts them to the
//! bin packer's fixed-point space with padding on each side, runs all five
//! [`FreeRectChoiceHeuristic`]s on a square bin, and keeps the run with the
//! highest occupancy among those that placed every chart. When no run
//! succeeds, the texture grows by a fixed fraction of the initial guess and
//! the next attempt starts.
//!
//! # Example
//!
//! ```
//! use texatlas::atlas::{pack_charts, PackOptions};
//! use nalgebra::Vector2;
//!
//! let sizes = vec![Vector2::new(1.0, 1.0), Vector2::new(2.0, 1.0)];
//! let result = pack_charts(&sizes, &PackOptions::default());
//!
//! assert!(result.is_complete());
//! assert!(result.texture_size > 0.0);
//! ```

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::maxrects::{FreeRectChoiceHeuristic, MaxRectsBinPack, Placement};
use crate::error::{MeshError, Result};

/// Options for [`pack_charts`].
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Over-allocation applied to the total chart area for the first guess.
    pub initial_area_factor: f64,

    /// Fraction of the initial size added after every failed attempt.
    pub grow_step: f64,

    /// Scale from real units to the bin packer's integer space.
    pub fixed_point_scale: f64,

    /// Padding on each side of a chart, as a fraction of the bin width.
    pub padding: f64,

    /// Maximum number of texture sizes to try.
    pub max_attempts: usize,

    /// Whether charts may be turned 90 degrees.
    pub allow_rotation: bool,

    /// Whether to run the heuristics in parallel (default: true).
    pub parallel: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            initial_area_factor: 1.1,
            grow_step: 0.05,
            fixed_point_scale: 10_000.0,
            padding: 0.002,
            max_attempts: 100,
            allow_rotation: true,
            parallel: true,
        }
    }
}

impl PackOptions {
    /// Set the over-allocation factor for the initial size guess.
    pub fn with_initial_area_factor(mut self, factor: f64) -> Self {
        self.initial_area_factor = factor;
        self
    }

    /// Set the growth step between attempts.
    pub fn with_grow_step(mut self, step: f64) -> Self {
        self.grow_step = step;
        self
    }

    /// Set the per-side padding as a fraction of the bin width.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set whether charts may be rotated.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the numeric options can produce an atlas.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] for a non-positive or
    /// non-finite area factor, grow step or fixed-point scale, a negative or
    /// NaN padding, or zero attempts.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("initial_area_factor", self.initial_area_factor),
            ("grow_step", self.grow_step),
            ("fixed_point_scale", self.fixed_point_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(MeshError::invalid_param(name, value, "must be positive"));
            }
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(MeshError::invalid_param(
                "padding",
                self.padding,
                "must be non-negative",
            ));
        }
        if self.max_attempts == 0 {
            return Err(MeshError::invalid_param(
                "max_attempts",
                self.max_attempts,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Where one chart landed, in normalized atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPlacement {
    /// Top-left corner, padding removed.
    pub position: Point2<f64>,
    /// Size in the placed orientation, padding removed.
    pub size: Vector2<f64>,
    /// Whether the chart was turned 90 degrees.
    pub rotated: bool,
}

/// Outcome of [`pack_charts`].
#[derive(Debug, Clone)]
pub struct PackResult {
    /// Side length of the square atlas, in the units of the input sizes.
    pub texture_size: f64,
    /// One entry per input size; `None` when the chart was not placed.
    pub placements: Vec<Option<ChartPlacement>>,
    /// Number of texture sizes tried.
    pub attempts: usize,
    /// Heuristic of the kept run.
    pub heuristic: Option<FreeRectChoiceHeuristic>,
    /// Occupancy of the kept run.
    pub occupancy: f64,
}

impl PackResult {
    fn empty(count: usize) -> Self {
        Self {
            texture_size: 0.0,
            placements: vec![None; count],
            attempts: 0,
            heuristic: None,
            occupancy: 0.0,
        }
    }

    /// True when every chart received a placement.
    pub fn is_complete(&self) -> bool {
        self.placements.iter().all(Option::is_some)
    }

    /// Number of placed charts.
    pub fn num_placed(&self) -> usize {
        self.placements.iter().filter(|p| p.is_some()).count()
    }
}

/// One heuristic's run at one bin size.
struct Run {
    heuristic: FreeRectChoiceHeuristic,
    placements: Vec<Placement>,
    occupancy: f64,
}

/// Pack chart sizes into the smallest square atlas the grow loop finds.
///
/// The result is deterministic for the same input and options, whether or
/// not the heuristics run in parallel. If no attempt places every chart, the
/// best partial run at the last size is returned and the missing charts have
/// `None` placements.
pub fn pack_charts(sizes: &[Vector2<f64>], options: &PackOptions) -> PackResult {
    if sizes.is_empty() {
        return PackResult::empty(0);
    }

    let total_area: f64 = sizes.iter().map(|s| s.x * s.y).sum();
    let initial_size = (total_area * options.initial_area_factor).sqrt();
    if !initial_size.is_finite() || initial_size <= 0.0 {
        warn!(
            charts = sizes.len(),
            total_area, "Chart sizes have no usable area, nothing packed"
        );
        return PackResult::empty(sizes.len());
    }

    debug!(
        charts = sizes.len(),
        initial_size, "Starting chart packing"
    );

    let max_attempts = options.max_attempts.max(1);
    let mut size_factor = 1.0;

    for attempt in 1..=max_attempts {
        let texture_size = initial_size * size_factor;
        let best = try_pack(sizes, texture_size, options);

        let complete = best
            .as_ref()
            .is_some_and(|run| run.placements.len() == sizes.len());

        if complete || attempt == max_attempts {
            if complete {
                info!(
                    charts = sizes.len(),
                    attempts = attempt,
                    texture_size,
                    "Chart packing complete"
                );
            } else {
                warn!(
                    charts = sizes.len(),
                    placed = best.as_ref().map_or(0, |run| run.placements.len()),
                    attempts = attempt,
                    texture_size,
                    "Chart packing did not converge, keeping partial result"
                );
            }
            return finish(sizes.len(), texture_size, attempt, best, options);
        }

        size_factor += options.grow_step;
    }

    // max_attempts >= 1, so the loop always returns.
    PackResult::empty(sizes.len())
}

/// Largest bin side in fixed-point units. Coordinate sums stay far from
/// `i64::MAX` and stay exact in `f64`.
const MAX_BIN_WIDTH: f64 = (1u64 << 40) as f64;

/// Scale into fixed-point space for a texture size.
///
/// Large atlases get a coarser scale so that the bin side never exceeds
/// [`MAX_BIN_WIDTH`].
#[inline]
fn fixed_point_scale(texture_size: f64, options: &PackOptions) -> f64 {
    options.fixed_point_scale.min(MAX_BIN_WIDTH / texture_size)
}

/// Bin width in fixed-point units for a texture size.
#[inline]
fn bin_width(texture_size: f64, options: &PackOptions) -> i64 {
    (texture_size * fixed_point_scale(texture_size, options)) as i64
}

/// Run every heuristic at one size and keep the best run.
///
/// Runs are ranked by number of placements, then occupancy; earlier
/// heuristics win ties.
fn try_pack(sizes: &[Vector2<f64>], texture_size: f64, options: &PackOptions) -> Option<Run> {
    let scale = fixed_point_scale(texture_size, options);
    let width = bin_width(texture_size, options);
    let double_padding = options.padding * width as f64 * 2.0;

    let rects: Vec<(i64, i64)> = sizes
        .iter()
        .map(|s| {
            (
                (s.x * scale + double_padding) as i64,
                (s.y * scale + double_padding) as i64,
            )
        })
        .collect();

    let run = |heuristic: FreeRectChoiceHeuristic| {
        let mut bin = MaxRectsBinPack::new(width, width, options.allow_rotation);
        let placements = bin.insert_all(&rects, heuristic);
        Run {
            heuristic,
            placements,
            occupancy: bin.occupancy(),
        }
    };

    let runs: Vec<Run> = if options.parallel {
        FreeRectChoiceHeuristic::ALL
            .par_iter()
            .map(|&h| run(h))
            .collect()
    } else {
        FreeRectChoiceHeuristic::ALL.iter().map(|&h| run(h)).collect()
    };

    let mut best: Option<Run> = None;
    for candidate in runs {
        let better = match &best {
            None => !candidate.placements.is_empty(),
            Some(current) => {
                candidate.placements.len() > current.placements.len()
                    || (candidate.placements.len() == current.placements.len()
                        && candidate.occupancy > current.occupancy)
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Strip padding and normalize the kept run's placements.
fn finish(
    count: usize,
    texture_size: f64,
    attempts: usize,
    best: Option<Run>,
    options: &PackOptions,
) -> PackResult {
    let mut result = PackResult {
        texture_size,
        placements: vec![None; count],
        attempts,
        heuristic: None,
        occupancy: 0.0,
    };

    let Some(run) = best else {
        return result;
    };

    let width = bin_width(texture_size, options) as f64;
    let padding = options.padding * width;

    for placement in &run.placements {
        let rect = placement.rect;
        result.placements[placement.index] = Some(ChartPlacement {
            position: Point2::new(
                (rect.x as f64 + padding) / width,
                (rect.y as f64 + padding) / width,
            ),
            size: Vector2::new(
                (rect.width as f64 - 2.0 * padding) / width,
                (rect.height as f64 - 2.0 * padding) / width,
            ),
            rotated: placement.rotated,
        });
    }

    result.heuristic = Some(run.heuristic);
    result.occupancy = run.occupancy;
    result
}
