use bracket_geometry::prelude::{DistanceAlg, Point};
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, a_star_search};
use smallvec::SmallVec;
use specs::prelude::{Join, WorldExt};

use crate::{
    ecs::components::{BlocksTile, Position},
    map::DungeonMap,
};

/// Extra cost for stepping onto a tile held by a blocking entity, so paths
/// route around crowds when a detour exists.
const OCCUPIED_COST: f32 = 10.0;

const STEPS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Snapshot of walkability and occupancy taken at the start of one actor's
/// decision.
#[derive(Clone)]
pub struct NavGrid {
    pub width: i32,
    pub height: i32,
    walkable: Vec<bool>,
    occupied: Vec<bool>,
}

impl NavGrid {
    pub fn from_map(map: &DungeonMap) -> Self {
        let walkable = map.tiles().iter().map(|tile| tile.walkable).collect::<Vec<bool>>();
        let mut grid = Self {
            width: map.width,
            height: map.height,
            occupied: vec![false; walkable.len()],
            walkable,
        };
        let positions = map.ecs().read_storage::<Position>();
        let blockers = map.ecs().read_storage::<BlocksTile>();
        for (pos, _) in (&positions, &blockers).join() {
            if let Some(idx) = grid.index(pos.point) {
                grid.occupied[idx] = true;
            }
        }
        grid
    }

    fn index(&self, point: Point) -> Option<usize> {
        if self.contains(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    /// First step of an A* path from `from` to `to`, if one exists.
    pub fn next_step(&self, from: Point, to: Point) -> Option<Point> {
        let start = self.index(from)?;
        let end = self.index(to)?;
        let path = a_star_search(start, end, self);
        if !path.success || path.steps.len() < 2 {
            return None;
        }
        Some(self.index_to_point2d(path.steps[1]))
    }
}

impl BaseMap for NavGrid {
    fn is_opaque(&self, idx: usize) -> bool {
        !self.walkable.get(idx).copied().unwrap_or(false)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for (dx, dy) in STEPS {
            let dest = Point::new(point.x + dx, point.y + dy);
            let Some(dest_idx) = self.index(dest) else {
                continue;
            };
            if !self.walkable[dest_idx] {
                continue;
            }
            let base = if dx != 0 && dy != 0 { 1.45 } else { 1.0 };
            let cost = if self.occupied[dest_idx] {
                base + OCCUPIED_COST
            } else {
                base
            };
            exits.push((dest_idx, cost));
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for NavGrid {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        self.contains(point)
    }
}
