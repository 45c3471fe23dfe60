use crate::catalog::RenderLayer;

use super::geometry::{Rect, Size};

/// Horizontal scroll shared by every non-overlay entity. Screen x is world x
/// plus `world_shift`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Camera {
    world_shift: i32,
    viewport: Size,
}

impl Camera {
    pub fn new(viewport: Size) -> Self {
        Self {
            world_shift: 0,
            viewport,
        }
    }

    pub fn world_shift(&self) -> i32 {
        self.world_shift
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn shift(&mut self, delta: i32) {
        self.world_shift += delta;
    }

    /// Puts `target` in the horizontal middle of the viewport.
    pub fn center_on(&mut self, target: Rect) {
        self.world_shift = (self.viewport.w / 2 - target.w / 2) - target.x;
    }

    pub fn to_screen(&self, rect: Rect, layer: RenderLayer) -> Rect {
        if layer == RenderLayer::Overlay {
            rect
        } else {
            rect.translated(self.world_shift, 0)
        }
    }
}
