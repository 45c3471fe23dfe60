/// Sub-pixel units per screen pixel. Every movement delta is a whole number
/// of units, so positions never accumulate rounding error.
pub const SUBPIXELS_PER_PIXEL: i32 = 6;
/// Source art is drawn at this integer scale.
pub const SCALE_UP: i32 = 2;
pub const TILE_SOURCE_PX: i32 = 16;
pub const TILE_UNITS: i32 = TILE_SOURCE_PX * SCALE_UP * SUBPIXELS_PER_PIXEL;

/// Converts whole screen pixels to units.
pub const fn px(pixels: i32) -> i32 {
    pixels * SUBPIXELS_PER_PIXEL
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub fn transposed(self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
}

/// Axis-aligned rectangle with `y` growing downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Same rectangle expressed in whole screen pixels, rounded toward the origin.
    pub fn to_pixels(&self) -> Self {
        Self::new(
            self.x.div_euclid(SUBPIXELS_PER_PIXEL),
            self.y.div_euclid(SUBPIXELS_PER_PIXEL),
            self.w / SUBPIXELS_PER_PIXEL,
            self.h / SUBPIXELS_PER_PIXEL,
        )
    }
}
