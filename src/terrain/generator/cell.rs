use nalgebra::Vector2;

use crate::terrain::{
    config::{EdgeMode, FoldPolicy, MeshConfig, MeshStyle},
    coords::{at_level, Corner, Side, CELL_PITCH, CELL_RADIUS, DEEP_EDGE_LEVEL, INNER_RADIUS},
    generator::{
        cell_info::{CellMeshInfo, NeighborInfo},
        face::{Face, FaceKind},
        walls::{edge_walls, wall_bands, EdgeProfile},
    },
    material::MaterialClassifier,
};

const R: f32 = CELL_RADIUS;
const RI: f32 = INNER_RADIUS;

/// Turns one cell and its neighborhood into faces.
///
/// Every style keeps the cell's footprint inside `center ± R` and closes
/// height differences across each edge with walls owned by the higher
/// side, so neighboring cells stitch together without gaps.
#[derive(Clone, Debug, Default)]
pub struct CellGeometryBuilder {
    classifier: MaterialClassifier,
    edges: EdgeMode,
    fold_policy: FoldPolicy,
}

impl CellGeometryBuilder {
    pub fn new(config: &MeshConfig) -> Self {
        Self {
            classifier: MaterialClassifier::new(config.steep_threshold),
            edges: config.edges,
            fold_policy: config.fold_policy,
        }
    }

    pub fn build(&self, style: MeshStyle, center: Vector2<f32>, info: &NeighborInfo) -> Vec<Face> {
        let faces = match style {
            MeshStyle::Block => self.block_faces(center, info, false),
            MeshStyle::Indented => self.block_faces(center, info, true),
            MeshStyle::Tapered => self.tapered_faces(center, info),
        };
        faces.into_iter().map(|f| f.classify(&self.classifier)).collect()
    }

    /// Profile of the cell across `side`, or `None` when nothing should be
    /// emitted against it.
    fn across<F>(&self, info: &NeighborInfo, side: Side, profile: F) -> Option<EdgeProfile>
    where
        F: Fn(&NeighborInfo, Side) -> EdgeProfile,
    {
        match info.shifted(side.heading()) {
            Some(neighbor) => Some(profile(&neighbor, side.opposite())),
            None => match self.edges {
                EdgeMode::Sealed => Some(EdgeProfile::flat(DEEP_EDGE_LEVEL)),
                EdgeMode::Open => None,
            },
        }
    }

    fn block_faces(&self, center: Vector2<f32>, info: &NeighborInfo, indented: bool) -> Vec<Face> {
        let a = info.level;
        let notches = if indented {
            Corner::ALL.map(|c| info.notch_level(c))
        } else {
            [None; 4]
        };
        let mut faces = Vec::new();

        // Split points on each side where the cell across is notched.
        let splits = Side::ALL.map(|side| {
            side.corners().map(|corner| {
                indented
                    && notches[corner.index()].is_none()
                    && info
                        .shifted(side.heading())
                        .and_then(|n| n.notch_level(facing_corner(corner, side)))
                        .is_some()
            })
        });

        let plain = notches.iter().all(Option::is_none) && splits.iter().flatten().all(|s| !s);
        if plain {
            let ring = Corner::ALL.map(|c| {
                let (sx, sy) = signs(c);
                Vector2::new(sx * R, sy * R)
            });
            let verts = ring.iter().map(|&p| at_level(center + p, a)).collect();
            let uvs = ring.iter().map(|&p| planar_uv(p)).collect();
            faces.push(Face::polygon(FaceKind::Top, verts, uvs));
        } else {
            let mut ring = Vec::new();
            for (k, &corner) in Corner::ALL.iter().enumerate() {
                let (sx, sy) = signs(corner);
                if notches[k].is_some() {
                    let on_x = Vector2::new(sx * R, sy * RI);
                    let on_y = Vector2::new(sx * RI, sy * R);
                    if sx * sy > 0.0 {
                        ring.extend([on_x, on_y]);
                    } else {
                        ring.extend([on_y, on_x]);
                    }
                } else {
                    ring.push(Vector2::new(sx * R, sy * R));
                }

                let next = Corner::ALL[(k + 1) % 4];
                let side = shared_side(corner, next);
                let [low, high] = side.corners();
                let (near, far) = if low == corner { (0, 1) } else { (1, 0) };
                let split = splits[side.index()];
                if split[near] {
                    ring.push(split_point(corner, side));
                }
                if split[far] {
                    ring.push(split_point(if far == 0 { low } else { high }, side));
                }
            }
            faces.push(Face::anchored_fan(
                FaceKind::Top,
                (at_level(center, a), planar_uv(Vector2::zeros())),
                ring.into_iter().map(|p| (at_level(center + p, a), planar_uv(p))).collect(),
            ));
        }

        for (corner, notch) in Corner::ALL.into_iter().zip(notches) {
            let Some(d) = notch else { continue };
            let (sx, sy) = signs(corner);
            let floor = [
                Vector2::new(sx * R, sy * RI),
                Vector2::new(sx * R, sy * R),
                Vector2::new(sx * RI, sy * R),
            ];
            faces.push(Face::upward(
                FaceKind::Top,
                floor.iter().map(|&p| at_level(center + p, d)).collect(),
                floor.iter().map(|&p| planar_uv(p)).collect(),
            ));
            faces.extend(wall_bands(
                center + floor[0],
                center + floor[2],
                (d, d),
                (a, a),
                Vector2::new(sx, sy),
            ));
        }

        let profile = |n: &NeighborInfo, side: Side| block_profile(n, side, indented);
        for side in Side::ALL {
            if let Some(other) = self.across(info, side, profile) {
                faces.extend(edge_walls(center, side, &profile(info, side), &other));
            }
        }
        faces
    }

    fn tapered_faces(&self, center: Vector2<f32>, info: &NeighborInfo) -> Vec<Face> {
        let cell = CellMeshInfo::classify(info, self.edges, self.fold_policy);
        let a = cell.level;
        let mut faces = Vec::new();

        let inner = Corner::ALL.map(|c| {
            let (sx, sy) = signs(c);
            Vector2::new(sx * cell.center_half, sy * cell.center_half)
        });
        faces.push(Face::upward(
            FaceKind::Top,
            inner.iter().map(|&p| at_level(center + p, a)).collect(),
            inner.iter().map(|&p| planar_uv(p)).collect(),
        ));

        for side in Side::ALL {
            let outer = cell.side_outer_level(side);
            let (n, t) = (side.normal(), side.tangent());
            let pts = [n * RI - t * RI, n * RI + t * RI, n * R + t * RI, n * R - t * RI];
            let levels = [a, a, outer, outer];
            faces.push(Face::upward(
                if outer == a { FaceKind::Top } else { FaceKind::Slope },
                pts.iter().zip(levels).map(|(&p, k)| at_level(center + p, k)).collect(),
                pts.iter().map(|&p| planar_uv(p)).collect(),
            ));
        }

        for corner in Corner::ALL {
            faces.extend(corner_piece(center, &cell, corner));
        }

        let edges = self.edges;
        let policy = self.fold_policy;
        let profile = |n: &NeighborInfo, side: Side| {
            tapered_profile(&CellMeshInfo::classify(n, edges, policy), side)
        };
        for side in Side::ALL {
            if let Some(other) = self.across(info, side, profile) {
                faces.extend(edge_walls(center, side, &tapered_profile(&cell, side), &other));
            }
        }
        faces
    }
}

/// Flat profile, dropping to the diagonal's level along a notched corner.
fn block_profile(info: &NeighborInfo, side: Side, indented: bool) -> EdgeProfile {
    let a = info.level;
    let [low, high] = side.corners().map(|c| if indented { info.notch_level(c) } else { None });
    let mut breaks = vec![-R];
    let mut levels = Vec::new();
    if let Some(d) = low {
        breaks.push(-RI);
        levels.push((d, d));
    }
    if let Some(d) = high {
        breaks.extend([RI, R]);
        levels.extend([(a, a), (d, d)]);
    } else {
        breaks.push(R);
        levels.push((a, a));
    }
    EdgeProfile::new(&breaks, &levels)
}

/// Corner point, side outer edge, side outer edge, corner point.
fn tapered_profile(cell: &CellMeshInfo, side: Side) -> EdgeProfile {
    let [low, high] = side.corners();
    let mid = cell.side_outer_level(side);
    EdgeProfile::new(
        &[-R, -RI, RI, R],
        &[(cell.corner_level(low), mid), (mid, mid), (mid, cell.corner_level(high))],
    )
}

/// The quad between the center square and the outer corner. Non-planar
/// quads are split along the diagonal with the smaller height difference.
fn corner_piece(center: Vector2<f32>, cell: &CellMeshInfo, corner: Corner) -> Vec<Face> {
    let (sx, sy) = signs(corner);
    let a = cell.level;
    let vin = (Vector2::new(sx * RI, sy * RI), a);
    let vx = (Vector2::new(sx * R, sy * RI), cell.side_outer_level(corner.x_side()));
    let vy = (Vector2::new(sx * RI, sy * R), cell.side_outer_level(corner.y_side()));
    let vc = (Vector2::new(sx * R, sy * R), cell.corner_level(corner));

    let piece = |pts: &[(Vector2<f32>, i32)]| {
        let flat = pts.iter().all(|&(_, k)| k == pts[0].1);
        Face::upward(
            if flat { FaceKind::Top } else { FaceKind::Slope },
            pts.iter().map(|&(p, k)| at_level(center + p, k)).collect(),
            pts.iter().map(|&(p, _)| planar_uv(p)).collect(),
        )
    };

    if vin.1 + vc.1 == vx.1 + vy.1 {
        vec![piece(&[vin, vx, vc, vy])]
    } else if (vx.1 - vy.1).abs() < (vin.1 - vc.1).abs() {
        vec![piece(&[vin, vx, vy]), piece(&[vx, vc, vy])]
    } else {
        vec![piece(&[vin, vx, vc]), piece(&[vin, vc, vy])]
    }
}

fn signs(corner: Corner) -> (f32, f32) {
    let (sx, sy) = corner.signs();
    (sx as f32, sy as f32)
}

/// The side two adjacent corners have in common.
fn shared_side(a: Corner, b: Corner) -> Side {
    if a.x_side() == b.x_side() {
        a.x_side()
    } else {
        a.y_side()
    }
}

/// The neighbor's corner that touches `corner` of this cell across `side`.
fn facing_corner(corner: Corner, side: Side) -> Corner {
    let (sx, sy) = corner.signs();
    let (ox, oy) = side.offset();
    Corner::from_signs(sx - 2 * ox, sy - 2 * oy)
}

/// Point on `side` at inner radius from `corner`.
fn split_point(corner: Corner, side: Side) -> Vector2<f32> {
    let (sx, sy) = signs(corner);
    match side {
        Side::XNeg | Side::XPos => Vector2::new(sx * R, sy * RI),
        Side::YNeg | Side::YPos => Vector2::new(sx * RI, sy * R),
    }
}

/// Top-down projection of a cell-local point onto the material tile.
fn planar_uv(p: Vector2<f32>) -> Vector2<f32> {
    (p + Vector2::new(R, R)) / CELL_PITCH
}
