//! Selection variants and the drawing state machine.
//!
//! A selection is drawn in three steps driven by pointer events:
//!
//! 1. `begin` on pointer-down records the anchor (and, for freehand, the
//!    first stroke point).
//! 2. `preview` on every pointer-move returns the transient shape for the
//!    overlay. Freehand strokes accumulate points here.
//! 3. `commit` on pointer-up appends a finished copy to the [`SelectionList`].
//!
//! Committed selections are never mutated. `undo_last` and `clear` are only
//! accepted while idle.

use std::fmt;
use std::str::FromStr;

use log::debug;

use super::{DisplaySpace, GeometryError, Point};

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Rectangle,
    Circle,
    Freehand,
}

impl Tool {
    /// Lowercase identifier, as used by the toolbar.
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Freehand => "freehand",
        }
    }

    /// Capitalized name for status text.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Freehand => "Freehand",
        }
    }
}

impl FromStr for Tool {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" => Ok(Tool::Rectangle),
            "circle" => Ok(Tool::Circle),
            "freehand" => Ok(Tool::Freehand),
            other => Err(GeometryError::UnknownTool(other.to_string())),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-drawn region proposal.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<S = DisplaySpace> {
    /// Two opposite corners, in drawing order. Not normalized.
    Rectangle { start: Point<S>, end: Point<S> },
    /// Circle around `center`; `radius` is never negative.
    Circle { center: Point<S>, radius: f64 },
    /// Stroke points in insertion order.
    Freehand { points: Vec<Point<S>> },
}

impl<S> Selection<S> {
    /// Circle whose edge passes through `edge`.
    pub fn circle_through(center: Point<S>, edge: Point<S>) -> Self {
        let radius = center.distance(&edge);
        Selection::Circle { center, radius }
    }

    /// The tool that produces this variant.
    pub fn tool(&self) -> Tool {
        match self {
            Selection::Rectangle { .. } => Tool::Rectangle,
            Selection::Circle { .. } => Tool::Circle,
            Selection::Freehand { .. } => Tool::Freehand,
        }
    }
}

/// Finalized selections in drawing order.
///
/// Only the first selection is turned into a crop; later ones are kept for
/// display and undo but are never merged with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionList {
    items: Vec<Selection>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, selection: Selection) {
        self.items.push(selection);
    }

    fn pop_last(&mut self) -> Option<Selection> {
        self.items.pop()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    /// The selection used as the crop source.
    pub fn first(&self) -> Option<&Selection> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Selection> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Selection] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a SelectionList {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// State of a selection that has been started but not committed.
#[derive(Debug, Clone)]
struct InProgress {
    tool: Tool,
    anchor: Point<DisplaySpace>,
    points: Vec<Point<DisplaySpace>>,
}

impl InProgress {
    fn new(tool: Tool, anchor: Point<DisplaySpace>) -> Self {
        let points = match tool {
            Tool::Freehand => vec![anchor],
            Tool::Rectangle | Tool::Circle => Vec::new(),
        };
        Self {
            tool,
            anchor,
            points,
        }
    }

    /// Build the shape for the pointer at `current`, extending a freehand stroke.
    fn extend(&mut self, current: Point<DisplaySpace>) -> Selection {
        match self.tool {
            Tool::Rectangle => Selection::Rectangle {
                start: self.anchor,
                end: current,
            },
            Tool::Circle => Selection::circle_through(self.anchor, current),
            Tool::Freehand => {
                self.points.push(current);
                Selection::Freehand {
                    points: self.points.clone(),
                }
            }
        }
    }
}

/// Tracks the selection being drawn and the finalized list.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    in_progress: Option<InProgress>,
    committed: SelectionList,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `begin` and `commit`.
    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Tool of the selection being drawn, if any.
    pub fn drawing_tool(&self) -> Option<Tool> {
        self.in_progress.as_ref().map(|p| p.tool)
    }

    pub fn selections(&self) -> &SelectionList {
        &self.committed
    }

    /// Start a new selection at `point`.
    ///
    /// A selection already in progress is discarded.
    pub fn begin(&mut self, tool: Tool, point: Point<DisplaySpace>) {
        if let Some(previous) = self.in_progress.take() {
            debug!(
                "Discarding unfinished {} selection before starting a new one",
                previous.tool
            );
        }
        debug!("Started {} selection at {}", tool, point);
        self.in_progress = Some(InProgress::new(tool, point));
    }

    /// Transient shape for the pointer at `current`.
    ///
    /// Returns `None` while idle. Freehand strokes keep every point passed
    /// here, so this is not idempotent for that tool.
    pub fn preview(&mut self, current: Point<DisplaySpace>) -> Option<Selection> {
        self.in_progress.as_mut().map(|p| p.extend(current))
    }

    /// Finalize the selection in progress at `end` and return it.
    ///
    /// Freehand strokes only gain `end` if it differs from the last recorded
    /// point. Returns `None` without touching the list while idle.
    pub fn commit(&mut self, end: Point<DisplaySpace>) -> Option<&Selection> {
        let mut in_progress = self.in_progress.take()?;

        let selection = match in_progress.tool {
            Tool::Freehand if in_progress.points.last() == Some(&end) => Selection::Freehand {
                points: in_progress.points,
            },
            _ => in_progress.extend(end),
        };

        self.committed.push(selection);
        debug!(
            "Selection completed. Total selections: {}",
            self.committed.len()
        );
        self.committed.last()
    }

    /// Remove the most recently committed selection.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DrawingInProgress`] while a selection is being drawn.
    pub fn undo_last(&mut self) -> Result<Option<Selection>, GeometryError> {
        if self.is_drawing() {
            return Err(GeometryError::DrawingInProgress);
        }
        Ok(self.committed.pop_last())
    }

    /// Remove every committed selection.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DrawingInProgress`] while a selection is being drawn.
    pub fn clear(&mut self) -> Result<(), GeometryError> {
        if self.is_drawing() {
            return Err(GeometryError::DrawingInProgress);
        }
        self.committed.clear();
        Ok(())
    }
}
