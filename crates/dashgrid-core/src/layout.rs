//! Layout engine: turns the layout tree into one bounding box per component.
//!
//! Containers split their extent among children proportionally to `flex`.
//! Every child but the last gets `floor(available * weight / total)` cells;
//! the last child absorbs the remainder so the partition always covers the
//! parent exactly.

use std::collections::BTreeMap;

use crate::config::{ComponentId, Direction, LayoutNode};

/// A component's area in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Returns true if the cell `(x, y)` lies inside the box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Bounding boxes keyed by component id.
pub type BoxMap = BTreeMap<ComponentId, BoundingBox>;

/// Computes the bounding box of every component under `root`.
///
/// Degenerate extents (width or height ≤ 0) and empty containers assign no
/// boxes for their subtree. The result only depends on the inputs.
pub fn compute_boxes(root: &LayoutNode, x: i32, y: i32, w: i32, h: i32) -> BoxMap {
    let mut boxes = BoxMap::new();
    place(root, BoundingBox::new(x, y, w, h), &mut boxes);
    boxes
}

fn place(node: &LayoutNode, area: BoundingBox, boxes: &mut BoxMap) {
    if area.w <= 0 || area.h <= 0 {
        return;
    }

    match node {
        LayoutNode::Component { component, .. } => {
            boxes.insert(component.id.clone(), area);
        }
        LayoutNode::Container {
            direction,
            children,
            ..
        } => {
            let available = match direction {
                Direction::Row => area.w,
                Direction::Column => area.h,
            };
            let weights: Vec<i32> = children.iter().map(LayoutNode::weight).collect();
            for (child, (offset, extent)) in children.iter().zip(partition(available, &weights)) {
                let child_area = match direction {
                    Direction::Row => BoundingBox::new(area.x + offset, area.y, extent, area.h),
                    Direction::Column => BoundingBox::new(area.x, area.y + offset, area.w, extent),
                };
                place(child, child_area, boxes);
            }
        }
    }
}

/// Splits `available` cells among `weights`, returning `(offset, extent)` per entry.
///
/// The last entry receives whatever the others left over.
pub fn partition(available: i32, weights: &[i32]) -> Vec<(i32, i32)> {
    let total: i64 = weights.iter().map(|w| i64::from(*w)).sum::<i64>().max(1);
    let mut spans = Vec::with_capacity(weights.len());
    let mut offset = 0i32;
    for (i, weight) in weights.iter().enumerate() {
        let extent = if i + 1 == weights.len() {
            available - offset
        } else {
            (i64::from(available) * i64::from(*weight) / total) as i32
        };
        spans.push((offset, extent));
        offset += extent;
    }
    spans
}
