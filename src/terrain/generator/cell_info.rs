use crate::terrain::{
    config::{EdgeMode, FoldPolicy},
    coords::{Corner, GridCoords, Heading, Side, DEEP_EDGE_LEVEL, INNER_RADIUS},
    generator::heightmap::HeightField,
};

/// A cell's level and the levels of its eight neighbors, indexed by
/// [`Heading::index`]. `None` marks a neighbor outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborInfo {
    pub level: i32,
    pub neighbors: [Option<i32>; 8],
}

impl NeighborInfo {
    pub fn gather(field: &HeightField, cell: GridCoords) -> Option<Self> {
        let level = field.level(cell.i, cell.j)?;
        let neighbors = Heading::ALL.map(|h| {
            let n = cell.offset(h);
            field.level(n.i, n.j)
        });
        Some(Self { level, neighbors })
    }

    /// Builds the info from a 3x3 window indexed `window[dy + 1][dx + 1]`.
    /// The center must be present.
    pub fn from_window(window: [[Option<i32>; 3]; 3]) -> Option<Self> {
        let level = window[1][1]?;
        let neighbors = Heading::ALL.map(|h| {
            let (dx, dy) = h.offset();
            window[(dy + 1) as usize][(dx + 1) as usize]
        });
        Some(Self { level, neighbors })
    }

    /// Fully surrounded cell, window indexed `levels[dy + 1][dx + 1]`.
    pub fn from_levels(levels: [[i32; 3]; 3]) -> Self {
        Self {
            level: levels[1][1],
            neighbors: Heading::ALL.map(|h| {
                let (dx, dy) = h.offset();
                Some(levels[(dy + 1) as usize][(dx + 1) as usize])
            }),
        }
    }

    pub fn neighbor(&self, heading: Heading) -> Option<i32> {
        self.neighbors[heading.index()]
    }

    /// Level at a window offset; `(0, 0)` is the cell itself.
    pub fn at(&self, dx: i32, dy: i32) -> Option<i32> {
        if (dx, dy) == (0, 0) {
            return Some(self.level);
        }
        Heading::from_offset(dx, dy).and_then(|h| self.neighbor(h))
    }

    pub fn rise(&self, heading: Heading) -> Option<i32> {
        self.neighbor(heading).map(|n| n - self.level)
    }

    pub fn drop(&self, heading: Heading) -> Option<i32> {
        self.neighbor(heading).map(|n| self.level - n)
    }

    /// Level a neighbor counts as once the edge mode is applied.
    pub fn effective_level(&self, heading: Heading, edges: EdgeMode) -> i32 {
        self.neighbor(heading).unwrap_or(match edges {
            EdgeMode::Open => self.level,
            EdgeMode::Sealed => DEEP_EDGE_LEVEL,
        })
    }

    pub fn effective_drop(&self, heading: Heading, edges: EdgeMode) -> i32 {
        self.level - self.effective_level(heading, edges)
    }

    /// The neighbor at `heading` as seen from its own position. Cells past
    /// this window are reported as absent, so only the directions facing
    /// back toward this cell carry real levels.
    pub fn shifted(&self, heading: Heading) -> Option<NeighborInfo> {
        let level = self.neighbor(heading)?;
        let (ox, oy) = heading.offset();
        let neighbors = Heading::ALL.map(|h| {
            let (dx, dy) = h.offset();
            let (x, y) = (ox + dx, oy + dy);
            if x.abs() <= 1 && y.abs() <= 1 {
                self.at(x, y)
            } else {
                None
            }
        });
        Some(NeighborInfo { level, neighbors })
    }

    /// Diagonal level when `corner` is cut away: both direct neighbors at
    /// that corner are flush and the diagonal one is lower.
    pub fn notch_level(&self, corner: Corner) -> Option<i32> {
        let (sx, sy) = corner.signs();
        let x = self.at(sx, 0)?;
        let y = self.at(0, sy)?;
        let diagonal = self.at(sx, sy)?;
        (x == self.level && y == self.level && diagonal < self.level).then_some(diagonal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideSlope {
    Flat,
    /// One step down toward the neighbor.
    Tapered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideComponent {
    pub slope: SideSlope,
    pub drop: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerSlope {
    Flat,
    /// Slopes along x only.
    TaperedX,
    /// Slopes along y only.
    TaperedY,
    /// The corner point is lowered and the quad folds on a diagonal.
    FoldedNormal,
    /// Only the diagonal neighbor is lower and the corner stays flat.
    FoldedTangential,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerComponent {
    pub slope: CornerSlope,
    pub x_drop: i32,
    pub y_drop: i32,
    pub diag_drop: i32,
}

impl CornerComponent {
    /// Whether the outer corner point sits one step below the cell.
    pub fn drops(&self) -> bool {
        match self.slope {
            CornerSlope::TaperedX | CornerSlope::TaperedY | CornerSlope::FoldedNormal => true,
            CornerSlope::Flat | CornerSlope::FoldedTangential => false,
        }
    }
}

pub fn classify_corner(x_drop: i32, y_drop: i32, diag_drop: i32, policy: FoldPolicy) -> CornerSlope {
    match (x_drop > 0, y_drop > 0) {
        (true, false) => CornerSlope::TaperedX,
        (false, true) => CornerSlope::TaperedY,
        (true, true) => CornerSlope::FoldedNormal,
        (false, false) if diag_drop > 0 => match policy {
            FoldPolicy::Tangential => CornerSlope::FoldedTangential,
            FoldPolicy::Normal => CornerSlope::FoldedNormal,
        },
        (false, false) => CornerSlope::Flat,
    }
}

/// Center/side/corner decomposition of one cell for the tapered style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMeshInfo {
    pub level: i32,
    pub center_half: f32,
    pub sides: [SideComponent; 4],
    pub corners: [CornerComponent; 4],
}

impl CellMeshInfo {
    pub fn classify(info: &NeighborInfo, edges: EdgeMode, policy: FoldPolicy) -> Self {
        let sides = Side::ALL.map(|side| {
            let drop = info.effective_drop(side.heading(), edges);
            let slope = if drop > 0 { SideSlope::Tapered } else { SideSlope::Flat };
            SideComponent { slope, drop }
        });
        let corners = Corner::ALL.map(|corner| {
            let x_drop = sides[corner.x_side().index()].drop;
            let y_drop = sides[corner.y_side().index()].drop;
            let diag_drop = info.effective_drop(corner.heading(), edges);
            CornerComponent {
                slope: classify_corner(x_drop, y_drop, diag_drop, policy),
                x_drop,
                y_drop,
                diag_drop,
            }
        });
        Self { level: info.level, center_half: INNER_RADIUS, sides, corners }
    }

    pub fn side(&self, side: Side) -> &SideComponent {
        &self.sides[side.index()]
    }

    pub fn corner(&self, corner: Corner) -> &CornerComponent {
        &self.corners[corner.index()]
    }

    /// Level of the side piece's outer edge.
    pub fn side_outer_level(&self, side: Side) -> i32 {
        match self.side(side).slope {
            SideSlope::Tapered => self.level - 1,
            SideSlope::Flat => self.level,
        }
    }

    /// Level of the outer corner point.
    pub fn corner_level(&self, corner: Corner) -> i32 {
        if self.corner(corner).drops() {
            self.level - 1
        } else {
            self.level
        }
    }
}
