//! Org chart interaction state: pan/zoom, click delegation and drag-and-drop reparenting.

mod actions;
mod reparent;

pub use actions::*;
pub use reparent::*;

use crate::models::DepartmentMove;

/// Zoom bounds and step, in percent.
pub const ZOOM_MIN_PERCENT: u32 = 50;
pub const ZOOM_MAX_PERCENT: u32 = 200;
pub const ZOOM_STEP_PERCENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanState {
    Idle,
    Dragging {
        start_x: i32,
        start_y: i32,
        origin_left: i32,
        origin_top: i32,
    },
}

/// Scale and scroll state of the tree container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    scale_percent: u32,
    pub scroll_left: i32,
    pub scroll_top: i32,
    pan: PanState,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale_percent: 100,
            scroll_left: 0,
            scroll_top: 0,
            pan: PanState::Idle,
        }
    }
}

impl Viewport {
    pub fn scale(&self) -> f64 {
        f64::from(self.scale_percent) / 100.0
    }

    pub fn scale_percent(&self) -> u32 {
        self.scale_percent
    }

    pub fn zoom_in(&mut self) {
        self.scale_percent = (self.scale_percent + ZOOM_STEP_PERCENT).min(ZOOM_MAX_PERCENT);
    }

    pub fn zoom_out(&mut self) {
        self.scale_percent = self
            .scale_percent
            .saturating_sub(ZOOM_STEP_PERCENT)
            .max(ZOOM_MIN_PERCENT);
    }

    /// Back to scale 1 with the viewport at the origin.
    pub fn reset(&mut self) {
        self.scale_percent = 100;
        self.scroll_left = 0;
        self.scroll_top = 0;
        self.pan = PanState::Idle;
    }

    /// CSS transform for the tree element.
    pub fn transform(&self) -> String {
        format!("scale({})", self.scale())
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pan, PanState::Dragging { .. })
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.pan = PanState::Dragging {
            start_x: x,
            start_y: y,
            origin_left: self.scroll_left,
            origin_top: self.scroll_top,
        };
    }

    /// Scroll by the pointer delta since `pointer_down`. Ignored when not dragging.
    pub fn pointer_move(&mut self, x: i32, y: i32) {
        if let PanState::Dragging {
            start_x,
            start_y,
            origin_left,
            origin_top,
        } = self.pan
        {
            self.scroll_left = (origin_left - (x - start_x)).max(0);
            self.scroll_top = (origin_top - (y - start_y)).max(0);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pan = PanState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pan = PanState::Idle;
    }
}

/// One element on the path from a click target up to the tree container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub classes: Vec<String>,
    pub data_action: Option<String>,
    pub department_id: Option<i64>,
}

impl ElementInfo {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// What a click inside the tree resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    ViewDetails(i64),
    Export(i64),
    ShowEmployees(i64),
}

fn closest<'a>(
    path: &'a [ElementInfo],
    matches: impl Fn(&ElementInfo) -> bool,
) -> Option<&'a ElementInfo> {
    path.iter().find(|el| matches(el))
}

/// Resolve a click from the innermost element outwards.
///
/// A view button wins over an export button, and both win over the enclosing node.
pub fn delegate_click(path: &[ElementInfo]) -> Option<TreeAction> {
    if let Some(id) =
        closest(path, |el| el.data_action.as_deref() == Some("view")).and_then(|el| el.department_id)
    {
        return Some(TreeAction::ViewDetails(id));
    }
    if let Some(id) = closest(path, |el| el.data_action.as_deref() == Some("export"))
        .and_then(|el| el.department_id)
    {
        return Some(TreeAction::Export(id));
    }
    closest(path, |el| el.has_class("org-node"))
        .and_then(|el| el.department_id)
        .map(TreeAction::ShowEmployees)
}

/// Why a drop did not produce a reparent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropRejected {
    #[error("no department is being dragged")]
    NothingDragged,
    #[error("department {0} cannot be moved under itself")]
    SelfParent(i64),
}

/// Tracks the department currently being dragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    dragged: Option<i64>,
}

impl DragSession {
    pub fn start(&mut self, department_id: i64) {
        self.dragged = Some(department_id);
    }

    pub fn dragged(&self) -> Option<i64> {
        self.dragged
    }

    /// End the drag over `target`, producing the move to request.
    pub fn drop_on(&mut self, target_id: i64) -> Result<DepartmentMove, DropRejected> {
        let dragged = self.dragged.take().ok_or(DropRejected::NothingDragged)?;
        if dragged == target_id {
            return Err(DropRejected::SelfParent(dragged));
        }
        Ok(DepartmentMove {
            department_id: dragged,
            new_parent_id: Some(target_id),
        })
    }
}
