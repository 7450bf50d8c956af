//! Texture atlas packing.
//!
//! [`MaxRectsBinPack`] places integer rectangles into one fixed bin.
//! [`pack_charts`] drives it: it scales real chart sizes into the bin's
//! fixed-point space, tries every [`FreeRectChoiceHeuristic`], and grows the
//! square atlas until all charts fit.

mod maxrects;
mod packer;
mod rect;

pub use maxrects::{FreeRectChoiceHeuristic, MaxRectsBinPack, Placement, Score};
pub use packer::{pack_charts, ChartPlacement, PackOptions, PackResult};
pub use rect::{Rect, UvRect};
