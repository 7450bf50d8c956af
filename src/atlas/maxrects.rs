//! MaxRects bin packing.
//!
//! The packer keeps a list of maximal free rectangles covering the unused part
//! of a fixed-size bin. Placing a rectangle splits every free rectangle it
//! touches into up to four remainders, after which free rectangles contained
//! in another one are pruned.
//!
//! The bin never grows; callers retry with a larger bin when
//! [`MaxRectsBinPack::insert_all`] returns fewer placements than requested.
//!
//! # References
//!
//! - Jylänki, J. (2010). "A Thousand Ways to Pack the Bin - A Practical
//!   Approach to Two-Dimensional Rectangle Bin Packing."

use super::rect::Rect;

/// Rule for choosing the free rectangle a new rectangle goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeRectChoiceHeuristic {
    /// Minimize the smaller leftover side, then the larger one.
    BestShortSideFit,
    /// Minimize the larger leftover side, then the smaller one.
    BestLongSideFit,
    /// Minimize the leftover area, then the smaller leftover side.
    BestAreaFit,
    /// Minimize the resulting top edge, then the left edge (Tetris placement).
    BottomLeftRule,
    /// Maximize the edge length shared with the bin walls and placed rectangles.
    ContactPointRule,
}

impl FreeRectChoiceHeuristic {
    /// All heuristics, in the order the chart packer tries them.
    pub const ALL: [FreeRectChoiceHeuristic; 5] = [
        FreeRectChoiceHeuristic::BestShortSideFit,
        FreeRectChoiceHeuristic::BestLongSideFit,
        FreeRectChoiceHeuristic::BestAreaFit,
        FreeRectChoiceHeuristic::BottomLeftRule,
        FreeRectChoiceHeuristic::ContactPointRule,
    ];
}

/// Placement score; lower is better, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(pub i128, pub i128);

/// A rectangle placed by [`MaxRectsBinPack::insert_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the requested size this placement belongs to.
    pub index: usize,
    /// Where the rectangle went, in its placed orientation.
    pub rect: Rect,
    /// Whether the rectangle was turned 90 degrees.
    pub rotated: bool,
}

/// MaxRects packer for one bin.
#[derive(Debug, Clone)]
pub struct MaxRectsBinPack {
    bin_width: i64,
    bin_height: i64,
    allow_rotation: bool,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl MaxRectsBinPack {
    /// Create an empty bin.
    pub fn new(width: i64, height: i64, allow_rotation: bool) -> Self {
        let mut bin = Self {
            bin_width: 0,
            bin_height: 0,
            allow_rotation,
            free: Vec::new(),
            used: Vec::new(),
        };
        bin.reset(width, height, allow_rotation);
        bin
    }

    /// Empty the bin and give it new dimensions.
    pub fn reset(&mut self, width: i64, height: i64, allow_rotation: bool) {
        self.bin_width = width;
        self.bin_height = height;
        self.allow_rotation = allow_rotation;
        self.used.clear();
        self.free.clear();
        self.free.push(Rect::new(0, 0, width, height));
    }

    /// Bin width.
    #[inline]
    pub fn width(&self) -> i64 {
        self.bin_width
    }

    /// Bin height.
    #[inline]
    pub fn height(&self) -> i64 {
        self.bin_height
    }

    /// Current free rectangles.
    #[inline]
    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Rectangles placed so far, in placement order.
    #[inline]
    pub fn used_rects(&self) -> &[Rect] {
        &self.used
    }

    /// Place a single rectangle with the given heuristic.
    ///
    /// Returns the placed rectangle, or `None` if it fits nowhere.
    pub fn insert(
        &mut self,
        width: i64,
        height: i64,
        heuristic: FreeRectChoiceHeuristic,
    ) -> Option<Rect> {
        let (node, _) = self.find_position(width, height, heuristic)?;
        self.place_rect(node);
        Some(node)
    }

    /// Place a batch of rectangles, best-scoring rectangle first.
    ///
    /// Every round scores all pending rectangles and commits only the single
    /// best (rectangle, position) pair. Ties go to the earlier rectangle.
    /// Stops when everything is placed or nothing pending fits; the result is
    /// in placement order, with [`Placement::index`] pointing into `sizes`.
    pub fn insert_all(
        &mut self,
        sizes: &[(i64, i64)],
        heuristic: FreeRectChoiceHeuristic,
    ) -> Vec<Placement> {
        let mut pending: Vec<usize> = (0..sizes.len()).collect();
        let mut placed = Vec::with_capacity(sizes.len());

        while !pending.is_empty() {
            let mut best: Option<(usize, Rect, Score)> = None;

            for (slot, &index) in pending.iter().enumerate() {
                let (w, h) = sizes[index];
                if let Some((node, score)) = self.find_position(w, h, heuristic) {
                    if best.map_or(true, |(_, _, s)| score < s) {
                        best = Some((slot, node, score));
                    }
                }
            }

            let Some((slot, node, _)) = best else {
                break;
            };

            let index = pending.remove(slot);
            self.place_rect(node);
            placed.push(Placement {
                index,
                rect: node,
                rotated: node.width != sizes[index].0,
            });
        }

        placed
    }

    /// Fraction of the bin area covered by placed rectangles.
    pub fn occupancy(&self) -> f64 {
        let bin_area = self.bin_width as f64 * self.bin_height as f64;
        if bin_area <= 0.0 {
            return 0.0;
        }
        let used: f64 = self.used.iter().map(|r| r.area() as f64).sum();
        used / bin_area
    }

    /// Best position for a `width` x `height` rectangle under `heuristic`.
    ///
    /// Both orientations are scored when rotation is allowed. Empty sizes
    /// never fit.
    pub fn find_position(
        &self,
        width: i64,
        height: i64,
        heuristic: FreeRectChoiceHeuristic,
    ) -> Option<(Rect, Score)> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let mut best: Option<(Rect, Score)> = None;
        let mut consider = |node: Rect, score: Score| {
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((node, score));
            }
        };

        for free in &self.free {
            if free.width >= width && free.height >= height {
                let score = self.score(heuristic, free, width, height);
                consider(Rect::new(free.x, free.y, width, height), score);
            }

            if self.allow_rotation && free.width >= height && free.height >= width {
                let score = self.score(heuristic, free, height, width);
                consider(Rect::new(free.x, free.y, height, width), score);
            }
        }

        best
    }

    fn score(&self, heuristic: FreeRectChoiceHeuristic, free: &Rect, w: i64, h: i64) -> Score {
        let leftover_horiz = i128::from(free.width - w).abs();
        let leftover_vert = i128::from(free.height - h).abs();
        let short_side = leftover_horiz.min(leftover_vert);
        let long_side = leftover_horiz.max(leftover_vert);

        match heuristic {
            FreeRectChoiceHeuristic::BestShortSideFit => Score(short_side, long_side),
            FreeRectChoiceHeuristic::BestLongSideFit => Score(long_side, short_side),
            FreeRectChoiceHeuristic::BestAreaFit => Score(
                free.area() - i128::from(w) * i128::from(h),
                short_side,
            ),
            FreeRectChoiceHeuristic::BottomLeftRule => {
                Score(i128::from(free.y + h), i128::from(free.x))
            }
            FreeRectChoiceHeuristic::ContactPointRule => Score(
                -i128::from(self.contact_point_score(free.x, free.y, w, h)),
                0,
            ),
        }
    }

    fn contact_point_score(&self, x: i64, y: i64, width: i64, height: i64) -> i64 {
        let mut score = 0;

        if x == 0 || x + width == self.bin_width {
            score += height;
        }
        if y == 0 || y + height == self.bin_height {
            score += width;
        }

        for used in &self.used {
            if used.x == x + width || used.right() == x {
                score += common_interval_length(used.y, used.bottom(), y, y + height);
            }
            if used.y == y + height || used.bottom() == y {
                score += common_interval_length(used.x, used.right(), x, x + width);
            }
        }

        score
    }

    fn place_rect(&mut self, node: Rect) {
        let mut remainders = Vec::new();
        self.free
            .retain(|free| !split_free_node(free, &node, &mut remainders));
        self.free.extend(remainders);

        self.prune_free_list();
        self.used.push(node);
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut removed = false;
            let mut j = i + 1;
            while j < self.free.len() {
                if self.free[i].is_contained_in(&self.free[j]) {
                    self.free.remove(i);
                    removed = true;
                    break;
                }
                if self.free[j].is_contained_in(&self.free[i]) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed {
                i += 1;
            }
        }
    }
}

/// Length of the overlap of two intervals, 0 when disjoint.
fn common_interval_length(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    if a_end < b_start || b_end < a_start {
        return 0;
    }
    a_end.min(b_end) - a_start.max(b_start)
}

/// Split `free` around `used`, pushing the remainders.
///
/// Returns false, pushing nothing, when the two do not intersect.
fn split_free_node(free: &Rect, used: &Rect, out: &mut Vec<Rect>) -> bool {
    if !used.intersects(free) {
        return false;
    }

    if used.x < free.right() && used.right() > free.x {
        // Above the used rectangle.
        if used.y > free.y && used.y < free.bottom() {
            out.push(Rect::new(free.x, free.y, free.width, used.y - free.y));
        }
        // Below.
        if used.bottom() < free.bottom() {
            out.push(Rect::new(
                free.x,
                used.bottom(),
                free.width,
                free.bottom() - used.bottom(),
            ));
        }
    }

    if used.y < free.bottom() && used.bottom() > free.y {
        // Left.
        if used.x > free.x && used.x < free.right() {
            out.push(Rect::new(free.x, free.y, used.x - free.x, free.height));
        }
        // Right.
        if used.right() < free.right() {
            out.push(Rect::new(
                used.right(),
                free.y,
                free.right() - used.right(),
                free.height,
            ));
        }
    }

    true
}
