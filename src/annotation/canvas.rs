//! Render-side model of one artwork view
//!
//! An [`ArtworkCanvas`] tracks the container's current pixel size. Layout is
//! recomputed from stored percentages on every resize, and drag or click
//! events are converted back to percentages before they reach the store.

use serde::{Deserialize, Serialize};

use crate::annotation::geometry::{
    ContainerSize, PixelPoint, click_to_percent, content_position, to_percent, to_pixels,
};
use crate::core::detail::{ArtworkView, Detail, DetailType, Position};
use crate::core::error::WizardError;
use crate::core::order::DetailId;
use crate::store::OrderStore;

/// Which part of a detail is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragHandle {
    /// The anchor dot
    Marker,
    /// The content box
    Content,
}

/// Pixel placement of one detail at the current container size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayout {
    pub detail_id: DetailId,
    /// 1-based label shown on the marker
    pub number: usize,
    pub detail_type: DetailType,
    pub marker: PixelPoint,
    pub content: PixelPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkCanvas {
    view: ArtworkView,
    container: ContainerSize,
    content_offset_percent: f64,
}

impl ArtworkCanvas {
    /// A canvas that has not been laid out yet
    pub fn new(view: ArtworkView, content_offset_percent: f64) -> Self {
        Self {
            view,
            container: ContainerSize::default(),
            content_offset_percent,
        }
    }

    pub fn view(&self) -> ArtworkView {
        self.view
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// Record a new container size and lay the details out again
    pub fn resize(&mut self, container: ContainerSize, details: &[Detail]) -> Vec<MarkerLayout> {
        self.container = container;
        self.layout(details)
    }

    /// Pixel placement of this view's details, numbered in list order
    pub fn layout(&self, details: &[Detail]) -> Vec<MarkerLayout> {
        details
            .iter()
            .filter(|d| d.view == self.view)
            .enumerate()
            .map(|(index, detail)| MarkerLayout {
                detail_id: detail.id,
                number: index + 1,
                detail_type: detail.detail_type,
                marker: to_pixels(detail.position, self.container),
                content: to_pixels(
                    content_position(detail, self.content_offset_percent),
                    self.container,
                ),
            })
            .collect()
    }

    /// Percent position for a drag that ended at `offset`
    pub fn drag_stop(&self, offset: PixelPoint) -> Option<Position> {
        to_percent(offset, self.container)
    }

    /// Percent position for a click in page coordinates
    pub fn click(&self, click: PixelPoint, container_origin: PixelPoint) -> Option<Position> {
        click_to_percent(click, container_origin, self.container)
    }

    /// Convert a finished drag and write it to the store.
    ///
    /// Returns `Ok(false)` when the container is not laid out or the detail
    /// is gone.
    pub fn commit_drag(
        &self,
        store: &mut OrderStore,
        detail_id: DetailId,
        handle: DragHandle,
        offset: PixelPoint,
    ) -> Result<bool, WizardError> {
        let Some(position) = self.drag_stop(offset) else {
            tracing::debug!(detail_id = %detail_id, view = %self.view, "drag ignored, container not measured");
            return Ok(false);
        };
        match handle {
            DragHandle::Marker => store.update_detail_position(detail_id, position),
            DragHandle::Content => store.update_detail_content_position(detail_id, position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::detail::DetailDraft;

    fn store_with_detail(view: ArtworkView) -> (OrderStore, DetailId) {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();
        let id = store
            .add_detail(DetailDraft::new(
                DetailType::Number,
                "9\"/10\"",
                view,
                Position::new(50.0, 50.0),
            ))
            .unwrap()
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_commit_marker_drag() {
        let (mut store, id) = store_with_detail(ArtworkView::Front);
        let mut canvas = ArtworkCanvas::new(ArtworkView::Front, 10.0);
        canvas.resize(ContainerSize::new(400.0, 400.0), &[]);

        assert!(
            canvas
                .commit_drag(&mut store, id, DragHandle::Marker, PixelPoint::new(100.0, 200.0))
                .unwrap()
        );
        let detail = store.current_order().unwrap().detail(id).unwrap();
        assert_eq!(detail.position, Position::new(25.0, 50.0));
        assert_eq!(detail.content_position, None);
    }

    #[test]
    fn test_drag_before_layout_is_ignored() {
        let (mut store, id) = store_with_detail(ArtworkView::Front);
        let canvas = ArtworkCanvas::new(ArtworkView::Front, 10.0);
        assert!(
            !canvas
                .commit_drag(&mut store, id, DragHandle::Content, PixelPoint::new(5.0, 5.0))
                .unwrap()
        );
        let detail = store.current_order().unwrap().detail(id).unwrap();
        assert_eq!(detail.content_position, None);
    }

    #[test]
    fn test_layout_follows_resize() {
        let (store, id) = store_with_detail(ArtworkView::Back);
        let details = store.current_order().unwrap().details.clone();
        let mut canvas = ArtworkCanvas::new(ArtworkView::Back, 10.0);

        let small = canvas.resize(ContainerSize::new(200.0, 100.0), &details);
        assert_eq!(small[0].detail_id, id);
        assert_eq!(small[0].marker, PixelPoint::new(100.0, 50.0));
        assert_eq!(small[0].content, PixelPoint::new(100.0, 60.0));

        let large = canvas.resize(ContainerSize::new(800.0, 400.0), &details);
        assert_eq!(large[0].marker, PixelPoint::new(400.0, 200.0));
        assert_eq!(large[0].content, PixelPoint::new(400.0, 240.0));
    }

    #[test]
    fn test_layout_only_shows_own_view() {
        let (store, _) = store_with_detail(ArtworkView::Back);
        let details = store.current_order().unwrap().details.clone();
        let mut canvas = ArtworkCanvas::new(ArtworkView::Front, 10.0);
        assert!(
            canvas
                .resize(ContainerSize::new(100.0, 100.0), &details)
                .is_empty()
        );
    }
}
