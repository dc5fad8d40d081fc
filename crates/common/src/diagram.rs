//! Vehicle diagram parts and their interaction state
//!
//! The diagram exposes a fixed set of parts drawn on an 800x400 canvas. Part
//! ids are used verbatim as selection keys; they are not derived from the
//! result tree and may not resolve to any node in it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 400;

const BASE_FILL: &str = "#6b7280";
const ACTIVE_FILL: &str = "#ef4444";
const BASE_OPACITY: f32 = 0.6;
const ACTIVE_OPACITY: f32 = 0.9;

/// Interactive region of the vehicle diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Body,
    Front,
    Battery,
    Motor,
    Wheels,
    Autopilot,
    Infotainment,
}

/// Geometry of one drawn shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect { x: u32, y: u32, width: u32, height: u32, rx: u32 },
    Circle { cx: u32, cy: u32, r: u32 },
}

impl Part {
    /// Draw order: later parts paint over earlier ones.
    pub const ALL: [Part; 7] = [
        Part::Body,
        Part::Front,
        Part::Battery,
        Part::Motor,
        Part::Wheels,
        Part::Autopilot,
        Part::Infotainment,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Part::Body => "body",
            Part::Front => "front",
            Part::Battery => "battery",
            Part::Motor => "motor",
            Part::Wheels => "wheels",
            Part::Autopilot => "autopilot",
            Part::Infotainment => "infotainment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Part::Body => "Vehicle Body",
            Part::Front => "Front Systems",
            Part::Battery => "Battery Pack",
            Part::Motor => "Electric Motor",
            Part::Wheels => "Wheel Systems",
            Part::Autopilot => "Autopilot Sensors",
            Part::Infotainment => "Infotainment System",
        }
    }

    pub fn shapes(&self) -> &'static [Shape] {
        match self {
            Part::Body => &[Shape::Rect { x: 150, y: 150, width: 500, height: 100, rx: 20 }],
            Part::Front => &[Shape::Rect { x: 100, y: 170, width: 60, height: 60, rx: 10 }],
            Part::Battery => &[Shape::Rect { x: 200, y: 260, width: 400, height: 40, rx: 5 }],
            Part::Motor => &[Shape::Circle { cx: 500, cy: 280, r: 25 }],
            Part::Wheels => &[
                Shape::Circle { cx: 200, cy: 320, r: 30 },
                Shape::Circle { cx: 600, cy: 320, r: 30 },
            ],
            Part::Autopilot => &[Shape::Rect { x: 120, y: 180, width: 20, height: 10, rx: 2 }],
            Part::Infotainment => &[Shape::Rect { x: 350, y: 160, width: 100, height: 60, rx: 5 }],
        }
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Part {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| Error::UnknownPart(s.to_string()))
    }
}

/// Event the diagram raises toward the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramEvent {
    Select(String),
}

/// Resolved appearance of a part
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartStyle {
    pub fill: &'static str,
    pub opacity: f32,
    /// Only the externally highlighted part pulses, never a hovered one.
    pub pulse: bool,
}

/// Pointer state local to the diagram
#[derive(Debug, Clone, Default)]
pub struct DiagramState {
    hovered: Option<Part>,
}

impl DiagramState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<Part> {
        self.hovered
    }

    /// Entering a part replaces any previous hover target.
    pub fn pointer_enter(&mut self, part: Part) {
        self.hovered = Some(part);
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    pub fn click(&self, part: Part) -> DiagramEvent {
        debug!("Diagram part {} clicked", part);
        DiagramEvent::Select(part.id().to_string())
    }

    /// Label shown while a part is hovered
    pub fn tooltip(&self) -> Option<&'static str> {
        self.hovered.map(|p| p.label())
    }

    pub fn is_active(&self, part: Part, highlighted: Option<&str>) -> bool {
        highlighted == Some(part.id()) || self.hovered == Some(part)
    }

    pub fn style(&self, part: Part, highlighted: Option<&str>) -> PartStyle {
        if self.is_active(part, highlighted) {
            PartStyle {
                fill: ACTIVE_FILL,
                opacity: ACTIVE_OPACITY,
                pulse: highlighted == Some(part.id()),
            }
        } else {
            PartStyle {
                fill: BASE_FILL,
                opacity: BASE_OPACITY,
                pulse: false,
            }
        }
    }
}
