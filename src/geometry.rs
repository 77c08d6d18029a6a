/// `BoundingBox` defines an axis-aligned rectangular region in user coordinates.
///
/// Boxes built from path points always satisfy `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// Accumulates points and boxes into an optional `BoundingBox`.
///
/// Starts uninitialized; the first point (or box) seeds the extent, and
/// `build()` returns `None` if nothing was ever observed, so "no geometry"
/// stays distinguishable from a degenerate single-point box.
#[derive(Debug, Clone, Default)]
pub struct BoundingBoxBuilder {
    bbox: Option<BoundingBox>,
}

impl BoundingBoxBuilder {
    pub fn new() -> Self {
        Self { bbox: None }
    }

    /// Widen the extent to include the given point.
    pub fn point(&mut self, (x, y): (f32, f32)) -> &Self {
        self.extend(BoundingBox::new(x, y, x, y))
    }

    pub fn extend(&mut self, bbox: BoundingBox) -> &Self {
        if let Some(ref mut b) = self.bbox {
            *b = b.combine(&bbox);
        } else {
            self.bbox = Some(bbox);
        }
        self
    }

    pub fn build(self) -> Option<BoundingBox> {
        self.bbox
    }
}
