//! Cross-link routing between laid-out node boxes.
//!
//! A link leaves its source box where the ray from the source center to the
//! target center crosses the box border, enters the target box the same way,
//! and runs as an elbow: horizontal to the midpoint column, vertical to the
//! target row, horizontal into the target.

use crate::id::{LinkId, NodeId};
use crate::layout::NodeBox;
use crate::model::CrossLink;
use serde::Serialize;
use smallvec::{SmallVec, smallvec};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Connector geometry for one visible cross-link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedLink {
    pub id: LinkId,
    pub source: NodeId,
    pub target: NodeId,
    /// Elbow polyline: start, two corners, end.
    pub points: SmallVec<[Point; 4]>,
}

impl RoutedLink {
    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// The polyline as SVG path data (`M x y L x y …`).
    pub fn svg_path_data(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                d.push(' ');
            }
            let _ = write!(d, "{cmd} {} {}", p.x, p.y);
        }
        d
    }
}

/// Where the ray from `center` toward `toward` leaves a `width` × `height`
/// box centered on `center`. Returns `center` when the two points coincide.
pub fn perimeter_point(center: Point, width: f32, height: f32, toward: Point) -> Point {
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    // Exit parameter against the vertical sides, then the horizontal ones.
    let tx = if dx != 0.0 { half_w / dx.abs() } else { f32::INFINITY };
    let ty = if dy != 0.0 { half_h / dy.abs() } else { f32::INFINITY };
    let t = tx.min(ty);
    if !t.is_finite() || t <= 0.0 {
        return center;
    }
    Point::new(center.x + t * dx, center.y + t * dy)
}

/// Route one link between two visible boxes.
pub fn route_link(link: &CrossLink, from: &NodeBox, to: &NodeBox) -> RoutedLink {
    let from_center = from.center();
    let to_center = to.center();
    let start = perimeter_point(from_center, from.width, from.height, to_center);
    let end = perimeter_point(to_center, to.width, to.height, from_center);
    let mid_x = (start.x + end.x) / 2.0;

    RoutedLink {
        id: link.id,
        source: link.source,
        target: link.target,
        points: smallvec![
            start,
            Point::new(mid_x, start.y),
            Point::new(mid_x, end.y),
            end
        ],
    }
}

/// Route every link whose endpoints are both visible. Links touching a
/// hidden node are skipped, not removed from the document.
pub fn route_links<'a>(
    links: &[CrossLink],
    lookup: impl Fn(NodeId) -> Option<&'a NodeBox>,
) -> Vec<RoutedLink> {
    links
        .iter()
        .filter_map(|link| {
            let from = lookup(link.source)?;
            let to = lookup(link.target)?;
            Some(route_link(link, from, to))
        })
        .collect()
}
