//! Annotation coordinate engine
//!
//! - [`geometry`]: pixel/percent conversions and content box defaults
//! - [`canvas`]: per-view layout and drag handling
//! - [`reorder`]: id-list permutation and drag-and-drop splice

pub mod canvas;
pub mod geometry;
pub mod reorder;

pub use canvas::{ArtworkCanvas, DragHandle, MarkerLayout};
pub use geometry::{
    ContainerSize, PixelPoint, click_to_percent, content_position, default_content_position,
    to_percent, to_pixels,
};
pub use reorder::{move_by_id, move_item, reorder_by_ids};
