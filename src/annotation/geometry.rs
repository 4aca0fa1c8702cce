//! Conversions between container pixels and stored percentages
//!
//! Positions are stored as percent of the rendered artwork container and only
//! turned into pixels at render time, so a marker stays on the same spot of
//! the artwork at any render size.

use serde::{Deserialize, Serialize};

use crate::core::detail::{Detail, Position};

/// Rendered size of an artwork container, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False until the container has been laid out
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A pixel offset, relative to whatever origin the caller picked
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel offset inside the container to percent, clamped to the container.
///
/// Returns `None` when the container has no usable size or the offset is not
/// a number; callers treat that as "no change".
pub fn to_percent(offset: PixelPoint, container: ContainerSize) -> Option<Position> {
    if !container.is_measurable() || !offset.is_finite() {
        return None;
    }
    Some(
        Position::new(
            100.0 * offset.x / container.width,
            100.0 * offset.y / container.height,
        )
        .clamped(),
    )
}

pub fn to_pixels(position: Position, container: ContainerSize) -> PixelPoint {
    PixelPoint::new(
        position.x * container.width / 100.0,
        position.y * container.height / 100.0,
    )
}

/// Convert a click given in page coordinates.
///
/// `container_origin` is the top-left corner of the container in the same
/// coordinate space as `click`.
pub fn click_to_percent(
    click: PixelPoint,
    container_origin: PixelPoint,
    container: ContainerSize,
) -> Option<Position> {
    to_percent(
        PixelPoint::new(click.x - container_origin.x, click.y - container_origin.y),
        container,
    )
}

/// Where a content box sits when it was never dragged: below the anchor
pub fn default_content_position(anchor: Position, offset_percent: f64) -> Position {
    Position::new(anchor.x, anchor.y + offset_percent).clamped()
}

/// The content box position to render for `detail`
pub fn content_position(detail: &Detail, offset_percent: f64) -> Position {
    detail
        .content_position
        .unwrap_or_else(|| default_content_position(detail.position, offset_percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: ContainerSize = ContainerSize::new(400.0, 400.0);

    #[test]
    fn test_drag_offset_to_percent() {
        let pos = to_percent(PixelPoint::new(100.0, 200.0), SQUARE).unwrap();
        assert_eq!(pos, Position::new(25.0, 50.0));
    }

    #[test]
    fn test_zero_container_is_ignored() {
        assert_eq!(
            to_percent(PixelPoint::new(10.0, 10.0), ContainerSize::default()),
            None
        );
        assert_eq!(
            to_percent(PixelPoint::new(10.0, 10.0), ContainerSize::new(300.0, 0.0)),
            None
        );
        assert_eq!(to_percent(PixelPoint::new(f64::NAN, 1.0), SQUARE), None);
    }

    #[test]
    fn test_out_of_bounds_offsets_are_clamped() {
        let pos = to_percent(PixelPoint::new(-20.0, 900.0), SQUARE).unwrap();
        assert_eq!(pos, Position::new(0.0, 100.0));
    }

    #[test]
    fn test_round_trip_is_identity_for_a_fixed_size() {
        let container = ContainerSize::new(733.0, 517.0);
        for (px, py) in [(0.0, 0.0), (1.0, 516.0), (366.5, 258.5), (733.0, 517.0)] {
            let pct = to_percent(PixelPoint::new(px, py), container).unwrap();
            let back = to_pixels(pct, container);
            assert!((back.x - px).abs() < 1e-9);
            assert!((back.y - py).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_keeps_relative_spot() {
        let pos = Position::new(25.0, 50.0);
        assert_eq!(to_pixels(pos, SQUARE), PixelPoint::new(100.0, 200.0));
        assert_eq!(
            to_pixels(pos, ContainerSize::new(800.0, 200.0)),
            PixelPoint::new(200.0, 100.0)
        );
    }

    #[test]
    fn test_click_is_relative_to_container_origin() {
        let pos = click_to_percent(
            PixelPoint::new(150.0, 260.0),
            PixelPoint::new(50.0, 60.0),
            SQUARE,
        )
        .unwrap();
        assert_eq!(pos, Position::new(25.0, 50.0));
    }

    #[test]
    fn test_default_content_box_sits_below_anchor() {
        assert_eq!(
            default_content_position(Position::new(30.0, 40.0), 10.0),
            Position::new(30.0, 50.0)
        );
        assert_eq!(
            default_content_position(Position::new(30.0, 95.0), 10.0),
            Position::new(30.0, 100.0)
        );
    }
}
