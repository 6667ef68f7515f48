pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;

/// Pan offset and zoom of the graph image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub(crate) fn pan(&mut self, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.offset_x += dx;
        self.offset_y += dy;
        true
    }

    /// Multiplies the scale by `factor`, clamped to [`MIN_ZOOM`, `MAX_ZOOM`].
    pub(crate) fn zoom_by(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let next = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = next != self.scale;
        self.scale = next;
        changed
    }

    pub(crate) fn reset(&mut self) -> bool {
        let changed = *self != Self::default();
        *self = Self::default();
        changed
    }
}
