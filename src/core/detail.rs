//! Positioned annotations on the front or back artwork

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Size tokens offered for number details
pub const NUMBER_SIZES: [&str; 2] = ["9\"/10\"", "10\"/12\""];

/// Which artwork a detail (or an image) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkView {
    Front,
    Back,
}

impl ArtworkView {
    pub const ALL: [ArtworkView; 2] = [ArtworkView::Front, ArtworkView::Back];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkView::Front => "front",
            ArtworkView::Back => "back",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "front" => Some(ArtworkView::Front),
            "back" => Some(ArtworkView::Back),
            _ => None,
        }
    }
}

impl fmt::Display for ArtworkView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailType {
    #[serde(alias = "Graphic")]
    Graphic,
    #[serde(alias = "Number")]
    Number,
    #[serde(alias = "Description")]
    Description,
    #[serde(alias = "Notes")]
    Notes,
}

impl DetailType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailType::Graphic => "graphic",
            DetailType::Number => "number",
            DetailType::Description => "description",
            DetailType::Notes => "notes",
        }
    }

    /// Graphic details carry an image payload as their value
    pub fn carries_image(&self) -> bool {
        matches!(self, DetailType::Graphic)
    }
}

impl fmt::Display for DetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in percent of the artwork container (0..=100 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both axes into the container
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
        }
    }
}

/// Physical print size of a graphic, in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// One annotation on one artwork view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub detail_type: DetailType,
    pub value: String,
    pub view: ArtworkView,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// A detail before the store assigns its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailDraft {
    #[serde(rename = "type")]
    pub detail_type: DetailType,
    pub value: String,
    pub view: ArtworkView,
    pub position: Position,
    #[serde(default)]
    pub content_position: Option<Position>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl DetailDraft {
    pub fn new(
        detail_type: DetailType,
        value: impl Into<String>,
        view: ArtworkView,
        position: Position,
    ) -> Self {
        Self {
            detail_type,
            value: value.into(),
            view,
            position,
            content_position: None,
            dimensions: None,
        }
    }

    pub fn with_content_position(mut self, position: Position) -> Self {
        self.content_position = Some(position);
        self
    }

    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.dimensions = Some(Dimensions { width, height });
        self
    }

    /// Build the stored detail.
    ///
    /// Positions are clamped into the container and dimensions are only
    /// kept for graphics.
    pub fn into_detail(self, id: Uuid) -> Detail {
        let dimensions = if self.detail_type.carries_image() {
            self.dimensions
        } else {
            None
        };
        Detail {
            id,
            detail_type: self.detail_type,
            value: self.value,
            view: self.view,
            position: sanitize(self.position),
            content_position: self.content_position.map(sanitize),
            dimensions,
        }
    }
}

fn sanitize(position: Position) -> Position {
    if position.is_finite() {
        position.clamped()
    } else {
        Position::default()
    }
}
