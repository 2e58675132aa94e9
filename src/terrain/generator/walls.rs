use nalgebra::Vector2;

use crate::terrain::{
    coords::{at_level, level_to_z, Side, CELL_PITCH, CELL_RADIUS},
    generator::face::{Face, FaceKind},
};

/// One linear piece of an edge profile, from `t0` at level `start` to `t1`
/// at level `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSegment {
    pub t0: f32,
    pub t1: f32,
    pub start: i32,
    pub end: i32,
}

/// Level of a cell's surface along one of its edges, as a function of the
/// edge parameter `t ∈ [-R, R]` running along [`Side::tangent`].
///
/// Two cells sharing an edge produce profiles in the same `t`, so the
/// higher one can close the gap with [`edge_walls`].
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeProfile {
    segments: Vec<ProfileSegment>,
}

impl EdgeProfile {
    pub fn flat(level: i32) -> Self {
        Self::new(&[-CELL_RADIUS, CELL_RADIUS], &[(level, level)])
    }

    /// `levels[k]` spans `breaks[k]..breaks[k + 1]`.
    pub fn new(breaks: &[f32], levels: &[(i32, i32)]) -> Self {
        debug_assert_eq!(breaks.len(), levels.len() + 1, "one level pair per segment");
        let segments = breaks
            .windows(2)
            .zip(levels)
            .map(|(w, &(start, end))| {
                debug_assert!(w[0] < w[1], "breakpoints must increase");
                debug_assert!((start - end).abs() <= 1, "a segment spans at most one step");
                ProfileSegment { t0: w[0], t1: w[1], start, end }
            })
            .collect();
        Self { segments }
    }

    /// Levels at both ends of `t0..t1`. The interval must lie in one
    /// segment, and may only be a strict part of it if that segment is flat.
    pub fn span(&self, t0: f32, t1: f32) -> (i32, i32) {
        let mid = (t0 + t1) * 0.5;
        let Some(seg) = self.segments.iter().find(|s| s.t0 <= mid && mid <= s.t1) else {
            debug_assert!(false, "interval {t0}..{t1} is off the edge");
            return (0, 0);
        };
        if seg.start == seg.end {
            (seg.start, seg.start)
        } else {
            debug_assert!(
                seg.t0 == t0 && seg.t1 == t1,
                "sloped segment {seg:?} split at {t0}..{t1}"
            );
            (seg.start, seg.end)
        }
    }
}

fn merged_breaks(a: &EdgeProfile, b: &EdgeProfile) -> Vec<f32> {
    let mut breaks: Vec<f32> = a
        .segments
        .iter()
        .chain(&b.segments)
        .flat_map(|s| [s.t0, s.t1])
        .collect();
    breaks.sort_by(f32::total_cmp);
    breaks.dedup();
    breaks
}

/// Point on a cell edge, relative to the cell center.
pub fn edge_point(center: Vector2<f32>, side: Side, t: f32) -> Vector2<f32> {
    center + side.normal() * CELL_RADIUS + side.tangent() * t
}

/// Walls a cell owes along `side`: wherever `own` lies above `other`, the
/// gap is closed by bands facing out of the cell. Where `other` is higher
/// nothing is emitted; the neighbor covers that stretch.
pub fn edge_walls(center: Vector2<f32>, side: Side, own: &EdgeProfile, other: &EdgeProfile) -> Vec<Face> {
    let mut faces = Vec::new();
    for w in merged_breaks(own, other).windows(2) {
        let (t0, t1) = (w[0], w[1]);
        let (p0, p1) = own.span(t0, t1);
        let (q0, q1) = other.span(t0, t1);
        if p0 < q0 || p1 < q1 {
            debug_assert!(p0 <= q0 && p1 <= q1, "edge profiles cross on {side:?} at {t0}..{t1}");
            continue;
        }
        if (p0, p1) == (q0, q1) {
            continue;
        }
        faces.extend(wall_bands(
            edge_point(center, side, t0),
            edge_point(center, side, t1),
            (q0, q1),
            (p0, p1),
            side.normal(),
        ));
    }
    faces
}

/// Vertical wall between two points, from the `lower` levels up to the
/// `upper` levels at each end, cut into one-step bands so every vertical
/// edge is one step long. A band whose ends differ in height becomes a
/// triangular wedge.
pub fn wall_bands(
    a: Vector2<f32>,
    b: Vector2<f32>,
    lower: (i32, i32),
    upper: (i32, i32),
    facing: Vector2<f32>,
) -> Vec<Face> {
    let right = Vector2::new(-facing.y, facing.x);
    let (left, right_pt, lower, upper) = if (b - a).dot(&right) >= 0.0 {
        (a, b, lower, upper)
    } else {
        (b, a, (lower.1, lower.0), (upper.1, upper.0))
    };

    let (h0, h1) = (upper.0 - lower.0, upper.1 - lower.1);
    debug_assert!(
        h0 >= 0 && h1 >= 0 && (h0 - h1).abs() <= 1,
        "wall from {lower:?} to {upper:?} is not a stack of bands"
    );

    let width = (right_pt - left).norm() / CELL_PITCH;
    let mut faces = Vec::new();
    for band in 0..h0.max(h1) {
        let (b0, b1) = (lower.0 + band, lower.1 + band);
        let (t0, t1) = ((b0 + 1).min(upper.0), (b1 + 1).min(upper.1));
        let floor = b0.min(b1);
        let v = |level: i32| level_to_z(level - floor) / CELL_PITCH;

        let bl = (at_level(left, b0), Vector2::new(0.0, v(b0)));
        let br = (at_level(right_pt, b1), Vector2::new(width, v(b1)));
        let tr = (at_level(right_pt, t1), Vector2::new(width, v(t1)));
        let tl = (at_level(left, t0), Vector2::new(0.0, v(t0)));
        let corners = if t0 == b0 {
            vec![bl, br, tr]
        } else if t1 == b1 {
            vec![bl, br, tl]
        } else {
            vec![bl, br, tr, tl]
        };
        let (verts, uvs) = corners.into_iter().unzip();
        faces.push(Face::polygon(FaceKind::Skirt, verts, uvs));
    }
    faces
}
