//! Hit-testing helpers for resolving drop targets from on-screen boxes

use serde::{Deserialize, Serialize};

/// A position in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Point; 4] {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            Point::new(self.x, self.y),
            Point::new(right, self.y),
            Point::new(self.x, bottom),
            Point::new(right, bottom),
        ]
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The same box moved by `(dx, dy)`
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Sum of the distances between matching corners of two boxes.
///
/// Symmetric: `corner_distance(a, b) == corner_distance(b, a)`.
pub fn corner_distance(a: &Rect, b: &Rect) -> f64 {
    a.corners()
        .iter()
        .zip(b.corners().iter())
        .map(|(p, q)| p.distance(*q))
        .sum()
}

/// The candidate whose corners are nearest the dragged box.
///
/// Equal distances go to the smallest id, so the answer never depends on
/// the order candidates are listed in.
pub fn closest_corners<'a, K>(dragged: &Rect, candidates: &'a [(K, Rect)]) -> Option<&'a K>
where
    K: Ord,
{
    candidates
        .iter()
        .map(|(id, rect)| (corner_distance(dragged, rect), id))
        .min_by(|(da, ia), (db, ib)| da.total_cmp(db).then_with(|| ia.cmp(ib)))
        .map(|(_, id)| id)
}

/// Index a dragged column lands on: one past every other column whose
/// midpoint its center has crossed.
///
/// `columns` are the boxes in current display order and `dragged` the index
/// of the column being moved within them.
pub fn column_index_for(center_x: f64, columns: &[Rect], dragged: usize) -> usize {
    columns
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != dragged)
        .filter(|(_, rect)| rect.center().x < center_x)
        .count()
}
