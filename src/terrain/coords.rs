// src/terrain/coords.rs

use nalgebra::{Vector2, Vector3};

/// World distance between two neighboring cell centers.
pub const CELL_PITCH: f32 = 2.0;

/// Half of the cell footprint; a cell spans `center ± CELL_RADIUS`.
pub const CELL_RADIUS: f32 = CELL_PITCH / 2.0;

/// Radius of the flat center square used by the tapered and indented styles.
pub const INNER_RADIUS: f32 = CELL_RADIUS / 2.0;

/// World height of one level increment.
pub const HEIGHT_STEP: f32 = 0.5;

pub const MIN_LEVEL: i32 = -15;
pub const MAX_LEVEL: i32 = 15;

/// Level that sealed terrain borders skirt down to.
pub const DEEP_EDGE_LEVEL: i32 = MIN_LEVEL - 1;

/// Which material (sand, grass, rock…) a vertex belongs to.
pub type MaterialId = u8;

/// World height of a level.
pub fn level_to_z(level: i32) -> f32 {
    level as f32 * HEIGHT_STEP
}

/// Integer cell indices on the terrain grid. Signed so neighbor offsets can
/// step outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoords {
    pub i: i32,
    pub j: i32,
}

impl GridCoords {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    pub fn offset(self, heading: Heading) -> Self {
        let (di, dj) = heading.offset();
        Self { i: self.i + di, j: self.j + dj }
    }
}

/// The four direct neighbor directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    XNeg,
    YNeg,
    XPos,
    YPos,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::XNeg, Side::YNeg, Side::XPos, Side::YPos];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::XNeg => (-1, 0),
            Side::YNeg => (0, -1),
            Side::XPos => (1, 0),
            Side::YPos => (0, 1),
        }
    }

    /// Unit vector pointing out of the cell through this side.
    pub fn normal(self) -> Vector2<f32> {
        let (dx, dy) = self.offset();
        Vector2::new(dx as f32, dy as f32)
    }

    /// Direction along the side in which the edge parameter `t` grows.
    /// X sides run along +y, Y sides along +x.
    pub fn tangent(self) -> Vector2<f32> {
        match self {
            Side::XNeg | Side::XPos => Vector2::new(0.0, 1.0),
            Side::YNeg | Side::YPos => Vector2::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::XNeg => Side::XPos,
            Side::YNeg => Side::YPos,
            Side::XPos => Side::XNeg,
            Side::YPos => Side::YNeg,
        }
    }

    /// Corner at the low (`t = -R`) and high (`t = +R`) end of this side.
    pub fn corners(self) -> [Corner; 2] {
        match self {
            Side::XNeg => [Corner::XnYn, Corner::XnYp],
            Side::YNeg => [Corner::XnYn, Corner::XpYn],
            Side::XPos => [Corner::XpYn, Corner::XpYp],
            Side::YPos => [Corner::XnYp, Corner::XpYp],
        }
    }

    pub fn heading(self) -> Heading {
        match self {
            Side::XNeg => Heading::XNeg,
            Side::YNeg => Heading::YNeg,
            Side::XPos => Heading::XPos,
            Side::YPos => Heading::YPos,
        }
    }
}

/// The four diagonal neighbor directions, counter-clockwise from (-x, -y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    XnYn,
    XpYn,
    XpYp,
    XnYp,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::XnYn, Corner::XpYn, Corner::XpYp, Corner::XnYp];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn signs(self) -> (i32, i32) {
        match self {
            Corner::XnYn => (-1, -1),
            Corner::XpYn => (1, -1),
            Corner::XpYp => (1, 1),
            Corner::XnYp => (-1, 1),
        }
    }

    pub fn from_signs(sx: i32, sy: i32) -> Corner {
        match (sx >= 0, sy >= 0) {
            (false, false) => Corner::XnYn,
            (true, false) => Corner::XpYn,
            (true, true) => Corner::XpYp,
            (false, true) => Corner::XnYp,
        }
    }

    /// Direct side sharing this corner along x.
    pub fn x_side(self) -> Side {
        if self.signs().0 > 0 { Side::XPos } else { Side::XNeg }
    }

    /// Direct side sharing this corner along y.
    pub fn y_side(self) -> Side {
        if self.signs().1 > 0 { Side::YPos } else { Side::YNeg }
    }

    pub fn heading(self) -> Heading {
        match self {
            Corner::XnYn => Heading::XnYn,
            Corner::XpYn => Heading::XpYn,
            Corner::XpYp => Heading::XpYp,
            Corner::XnYp => Heading::XnYp,
        }
    }
}

/// All eight neighbor directions. Per-direction data is stored in
/// `[T; 8]` arrays indexed by [`Heading::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    XNeg,
    YNeg,
    XPos,
    YPos,
    XnYn,
    XpYn,
    XpYp,
    XnYp,
}

impl Heading {
    pub const ALL: [Heading; 8] = [
        Heading::XNeg,
        Heading::YNeg,
        Heading::XPos,
        Heading::YPos,
        Heading::XnYn,
        Heading::XpYn,
        Heading::XpYp,
        Heading::XnYp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Heading::XNeg => Side::XNeg.offset(),
            Heading::YNeg => Side::YNeg.offset(),
            Heading::XPos => Side::XPos.offset(),
            Heading::YPos => Side::YPos.offset(),
            Heading::XnYn => Corner::XnYn.signs(),
            Heading::XpYn => Corner::XpYn.signs(),
            Heading::XpYp => Corner::XpYp.signs(),
            Heading::XnYp => Corner::XnYp.signs(),
        }
    }

    /// Heading for a unit offset; `None` for `(0, 0)` and anything further.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.offset() == (dx, dy))
    }
}

/// Lifts a horizontal point to 3D at the given level.
pub fn at_level(xy: Vector2<f32>, level: i32) -> Vector3<f32> {
    Vector3::new(xy.x, xy.y, level_to_z(level))
}
