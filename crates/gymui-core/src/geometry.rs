#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle. Borders are part of the box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x2(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    pub fn y2(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Inclusive on every edge: a point exactly on `x2`/`y2` is inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x2() && p.y >= self.y && p.y <= self.y2()
    }

    /// Euclidean distance to the closest point of the box, 0 when inside.
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = (self.x - p.x).max(0).max(p.x - self.x2()) as f64;
        let dy = (self.y - p.y).max(0).max(p.y - self.y2()) as f64;
        dx.hypot(dy)
    }

    /// Smallest box containing every member, `None` for an empty group.
    pub fn union<'a>(group: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
        let mut it = group.into_iter();
        let first = *it.next()?;
        let (mut x, mut y, mut x2, mut y2) = (first.x, first.y, first.x2(), first.y2());
        for b in it {
            x = x.min(b.x);
            y = y.min(b.y);
            x2 = x2.max(b.x2());
            y2 = y2.max(b.y2());
        }
        Some(BoundingBox {
            x,
            y,
            width: x2.abs_diff(x),
            height: y2.abs_diff(y),
        })
    }

    /// Same size, moved by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> BoundingBox {
        BoundingBox {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x.saturating_add_unsigned(self.width / 2),
            y: self.y.saturating_add_unsigned(self.height / 2),
        }
    }
}
