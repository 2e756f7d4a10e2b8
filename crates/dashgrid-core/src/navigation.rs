//! Spatial navigation graph.
//!
//! For every component, finds the nearest neighbor in each direction among
//! the components whose boxes overlap it on the cross axis. Distance is the
//! gap between the facing edges; ties go to the smaller id so the graph is
//! reproducible.

use std::collections::BTreeMap;

use crate::config::ComponentId;
use crate::layout::{BoundingBox, BoxMap};

/// A direction of spatial navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Nearest neighbor of one component in each direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationEntry {
    pub up: Option<ComponentId>,
    pub down: Option<ComponentId>,
    pub left: Option<ComponentId>,
    pub right: Option<ComponentId>,
}

impl NavigationEntry {
    pub fn get(&self, direction: NavDirection) -> Option<&ComponentId> {
        match direction {
            NavDirection::Up => self.up.as_ref(),
            NavDirection::Down => self.down.as_ref(),
            NavDirection::Left => self.left.as_ref(),
            NavDirection::Right => self.right.as_ref(),
        }
    }

    fn slot(&mut self, direction: NavDirection) -> &mut Option<ComponentId> {
        match direction {
            NavDirection::Up => &mut self.up,
            NavDirection::Down => &mut self.down,
            NavDirection::Left => &mut self.left,
            NavDirection::Right => &mut self.right,
        }
    }
}

/// Navigation entries keyed by component id.
pub type NavGraph = BTreeMap<ComponentId, NavigationEntry>;

/// Builds the navigation graph from a bounding-box map.
///
/// O(n²) in the number of components.
pub fn build_nav(boxes: &BoxMap) -> NavGraph {
    boxes
        .iter()
        .map(|(source_id, source)| {
            let mut entry = NavigationEntry::default();
            for direction in [
                NavDirection::Up,
                NavDirection::Down,
                NavDirection::Left,
                NavDirection::Right,
            ] {
                *entry.slot(direction) = nearest(source_id, source, boxes, direction);
            }
            (source_id.clone(), entry)
        })
        .collect()
}

fn nearest(
    source_id: &ComponentId,
    source: &BoundingBox,
    boxes: &BoxMap,
    direction: NavDirection,
) -> Option<ComponentId> {
    let mut best: Option<(i32, &ComponentId)> = None;
    for (target_id, target) in boxes {
        if target_id == source_id {
            continue;
        }
        let Some(distance) = edge_gap(source, target, direction) else {
            continue;
        };
        let candidate = (distance, target_id);
        if best.is_none_or(|current| candidate < current) {
            best = Some(candidate);
        }
    }
    best.map(|(_, id)| id.clone())
}

/// Gap between facing edges if `target` is a candidate in `direction`.
fn edge_gap(source: &BoundingBox, target: &BoundingBox, direction: NavDirection) -> Option<i32> {
    let vertical_overlap = source.y.max(target.y) < source.bottom().min(target.bottom());
    let horizontal_overlap = source.x.max(target.x) < source.right().min(target.right());

    match direction {
        NavDirection::Right if vertical_overlap && target.x >= source.right() => {
            Some(target.x - source.right())
        }
        NavDirection::Left if vertical_overlap && target.right() <= source.x => {
            Some(source.x - target.right())
        }
        NavDirection::Down if horizontal_overlap && target.y >= source.bottom() => {
            Some(target.y - source.bottom())
        }
        NavDirection::Up if horizontal_overlap && target.bottom() <= source.y => {
            Some(source.y - target.bottom())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    fn boxes(entries: &[(&str, BoundingBox)]) -> BoxMap {
        entries.iter().map(|(k, b)| (id(k), *b)).collect()
    }

    #[test]
    fn test_side_by_side_is_mutual() {
        let map = boxes(&[
            ("a", BoundingBox::new(0, 0, 50, 20)),
            ("b", BoundingBox::new(50, 0, 50, 20)),
        ]);
        let nav = build_nav(&map);
        assert_eq!(nav[&id("a")].right, Some(id("b")));
        assert_eq!(nav[&id("b")].left, Some(id("a")));
        assert_eq!(nav[&id("a")].left, None);
        assert_eq!(nav[&id("a")].up, None);
        assert_eq!(nav[&id("a")].down, None);
        assert_eq!(nav[&id("b")].right, None);
    }

    #[test]
    fn test_grid_neighbors() {
        // a b
        // c d
        let map = boxes(&[
            ("a", BoundingBox::new(0, 0, 10, 10)),
            ("b", BoundingBox::new(10, 0, 10, 10)),
            ("c", BoundingBox::new(0, 10, 10, 10)),
            ("d", BoundingBox::new(10, 10, 10, 10)),
        ]);
        let nav = build_nav(&map);
        assert_eq!(nav[&id("a")].down, Some(id("c")));
        assert_eq!(nav[&id("c")].up, Some(id("a")));
        assert_eq!(nav[&id("c")].right, Some(id("d")));
        assert_eq!(nav[&id("d")].up, Some(id("b")));
        assert_eq!(nav[&id("a")].right, Some(id("b")));
        // No diagonal moves.
        assert_eq!(nav[&id("a")].get(NavDirection::Right), Some(&id("b")));
        assert_ne!(nav[&id("a")].down, Some(id("d")));
    }

    #[test]
    fn test_nearest_wins_over_farther() {
        let map = boxes(&[
            ("src", BoundingBox::new(0, 0, 10, 10)),
            ("far", BoundingBox::new(30, 0, 10, 10)),
            ("near", BoundingBox::new(15, 0, 10, 10)),
        ]);
        let nav = build_nav(&map);
        assert_eq!(nav[&id("src")].right, Some(id("near")));
    }

    #[test]
    fn test_tie_breaks_by_smaller_id() {
        // Left panel spans two stacked panels on the right.
        let map = boxes(&[
            ("left", BoundingBox::new(0, 0, 10, 20)),
            ("zeta", BoundingBox::new(10, 0, 10, 10)),
            ("alpha", BoundingBox::new(10, 10, 10, 10)),
        ]);
        let nav = build_nav(&map);
        assert_eq!(nav[&id("left")].right, Some(id("alpha")));
        assert_eq!(nav[&id("zeta")].left, Some(id("left")));
        assert_eq!(nav[&id("alpha")].left, Some(id("left")));
    }

    #[test]
    fn test_touching_corners_do_not_overlap() {
        let map = boxes(&[
            ("a", BoundingBox::new(0, 0, 10, 10)),
            ("b", BoundingBox::new(10, 10, 10, 10)),
        ]);
        let nav = build_nav(&map);
        assert_eq!(nav[&id("a")], NavigationEntry::default());
        assert_eq!(nav[&id("b")], NavigationEntry::default());
    }

    #[test]
    fn test_single_component_has_no_neighbors() {
        let map = boxes(&[("only", BoundingBox::new(0, 0, 80, 24))]);
        let nav = build_nav(&map);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[&id("only")], NavigationEntry::default());
    }
}
