//! Per-image editor state.
//!
//! An [`EditorSession`] is created whenever an image is loaded and owns
//! everything the editor needs until the next load: the two coordinate
//! spaces, the active tool, the crop options and the selections drawn so far.
//! Loading another image means building a new session, which starts with an
//! empty selection list.

use log::{debug, info};

use crate::config::DisplayLimits;
use crate::geometry::{
    fit_display, CoordinateTransform, Dimensions, DisplayPoint, GeometryError, Selection,
    SelectionList, SelectionModel, Tool,
};
use crate::request::{CropOptions, CropRequest, CropRequestBuilder};

/// Editor state for one loaded image.
#[derive(Debug, Clone)]
pub struct EditorSession {
    builder: CropRequestBuilder,
    tool: Tool,
    model: SelectionModel,
}

impl EditorSession {
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDimensions`] if either space has a zero extent.
    pub fn new(display: Dimensions, source: Dimensions) -> Result<Self, GeometryError> {
        let builder = CropRequestBuilder::new(display, source)?;
        info!("Editor session opened: display {display}, source {source}");

        Ok(Self {
            builder,
            tool: Tool::default(),
            model: SelectionModel::new(),
        })
    }

    /// Session for a source image drawn at the largest size `limits` allow.
    pub fn for_image(source: Dimensions, limits: &DisplayLimits) -> Result<Self, GeometryError> {
        let display = fit_display(source, limits)?;
        Self::new(display, source)
    }

    pub fn transform(&self) -> &CoordinateTransform {
        self.builder.transform()
    }

    pub fn display(&self) -> Dimensions {
        self.transform().display()
    }

    pub fn source(&self) -> Dimensions {
        self.transform().source()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Change the tool used for the next selection.
    ///
    /// A selection already being drawn keeps the tool it started with.
    pub fn set_tool(&mut self, tool: Tool) {
        debug!("Tool changed to {tool}");
        self.tool = tool;
    }

    pub fn options(&self) -> CropOptions {
        self.builder.options()
    }

    pub fn set_options(&mut self, options: CropOptions) {
        self.builder = self.builder.with_options(options);
    }

    pub fn is_drawing(&self) -> bool {
        self.model.is_drawing()
    }

    pub fn pointer_down(&mut self, point: DisplayPoint) {
        self.model.begin(self.tool, point);
    }

    /// Preview shape for the overlay, or `None` while idle.
    pub fn pointer_move(&mut self, point: DisplayPoint) -> Option<Selection> {
        self.model.preview(point)
    }

    /// Commit the selection in progress. Returns `None` while idle.
    pub fn pointer_up(&mut self, point: DisplayPoint) -> Option<&Selection> {
        self.model.commit(point)
    }

    /// The pointer left the canvas. Treated exactly like releasing it.
    pub fn pointer_leave(&mut self, point: DisplayPoint) -> Option<&Selection> {
        self.pointer_up(point)
    }

    pub fn undo_last(&mut self) -> Result<Option<Selection>, GeometryError> {
        self.model.undo_last()
    }

    pub fn clear(&mut self) -> Result<(), GeometryError> {
        self.model.clear()
    }

    pub fn selections(&self) -> &SelectionList {
        self.model.selections()
    }

    /// One-line status for the toolbar.
    pub fn status_line(&self) -> String {
        format!(
            "{} tool selected. {} selection(s) made. Click and drag to select area.",
            self.tool.label(),
            self.selections().len()
        )
    }

    /// Source-space request for the first committed selection.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptySelectionList`] if nothing has been drawn.
    pub fn crop_request(&self) -> Result<CropRequest, GeometryError> {
        self.builder.build_from_selections(self.selections())
    }
}
