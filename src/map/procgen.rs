use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use tracing::{debug, info, trace};

use super::{DungeonMap, Tile, TileBlock};
use crate::{
    config::GameConfig,
    data::{
        items::ConsumableTemplate,
        monsters::{MonsterTemplate, PlayerTemplate},
    },
    ecs,
    error::GenerationError,
};

/// Generation-time rectangle. `bounds` spans `x1..x2` by `y1..y2`, the far
/// edges exclusive; the outermost ring of tiles is wall.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub bounds: Rect,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            bounds: Rect::with_size(x, y, width, height),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.bounds.x1, self.bounds.y1)
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Inclusive box test with a one-tile margin: rooms that merely touch
    /// still count as overlapping.
    pub fn intersects(&self, other: &Room) -> bool {
        self.bounds.intersect(&other.bounds)
    }

    /// Last column and row of the room's tiles, inclusive.
    #[cfg(test)]
    pub fn far_corner(&self) -> Point {
        Point::new(self.bounds.x2 - 1, self.bounds.y2 - 1)
    }

    pub fn tiles(&self) -> TileBlock {
        let (width, height) = (self.width(), self.height());
        let mut tiles = Vec::with_capacity((width * height).max(0) as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                tiles.push(if border { Tile::wall() } else { Tile::floor() });
            }
        }
        TileBlock {
            width,
            height,
            tiles,
        }
    }

    fn random_interior_point(&self, rng: &mut RandomNumberGenerator) -> Option<Point> {
        let (x_min, x_max) = (self.bounds.x1 + 1, self.bounds.x2 - 1);
        let (y_min, y_max) = (self.bounds.y1 + 1, self.bounds.y2 - 1);
        if x_min >= x_max || y_min >= y_max {
            return None;
        }
        Some(Point::new(rng.range(x_min, x_max), rng.range(y_min, y_max)))
    }
}

/// Rejection-samples up to `max_rooms` rooms. A candidate that overlaps an
/// accepted room is dropped without retry, so fewer rooms (even none) may
/// come back.
pub fn generate_rooms(
    map_width: i32,
    map_height: i32,
    max_rooms: usize,
    min_size: i32,
    max_size: i32,
    rng: &mut RandomNumberGenerator,
) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..max_rooms {
        let width = rng.range(min_size, max_size + 1);
        let height = rng.range(min_size, max_size + 1);
        if width >= map_width || height >= map_height {
            continue;
        }
        let x = rng.range(0, map_width - width);
        let y = rng.range(0, map_height - height);
        let candidate = Room::new(x, y, width, height);

        if rooms.iter().any(|room| room.intersects(&candidate)) {
            continue;
        }
        rooms.push(candidate);
    }
    rooms
}

/// Single-bend corridor walk from one point to another. Cloning restarts it.
#[derive(Clone, Debug)]
pub struct Tunnel {
    current: Point,
    end: Point,
    horizontal: bool,
}

impl Tunnel {
    pub fn new(start: Point, end: Point, horizontal_first: bool) -> Self {
        Self {
            current: start,
            end,
            horizontal: horizontal_first,
        }
    }
}

impl Iterator for Tunnel {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.current == self.end {
            return None;
        }
        let aligned = if self.horizontal {
            self.current.x == self.end.x
        } else {
            self.current.y == self.end.y
        };
        if aligned {
            self.horizontal = !self.horizontal;
        }
        if self.horizontal {
            self.current.x += (self.end.x - self.current.x).signum();
        } else {
            self.current.y += (self.end.y - self.current.y).signum();
        }
        Some(self.current)
    }
}

/// Corridor from the centre of `from` to the centre of `to`, starting on a
/// coin-flipped axis.
pub fn carve(from: &Room, to: &Room, rng: &mut RandomNumberGenerator) -> Tunnel {
    let horizontal_first = rng.range(0, 2) == 0;
    Tunnel::new(from.center(), to.center(), horizontal_first)
}

/// Spawns up to `max_monsters` monsters and `max_items` items on the room's
/// interior. A draw landing on an occupied tile is skipped.
pub fn populate(
    room: &Room,
    map: &mut DungeonMap,
    max_monsters: usize,
    max_items: usize,
    rng: &mut RandomNumberGenerator,
) {
    let monster_count = rng.range(0, max_monsters as i32 + 1);
    let item_count = rng.range(0, max_items as i32 + 1);

    for _ in 0..monster_count {
        let Some(point) = room.random_interior_point(rng) else {
            return;
        };
        if !map.entities_at(point).is_empty() {
            continue;
        }
        ecs::spawn_monster(map, &monster_for(rng.rand::<f64>()), point);
    }

    for _ in 0..item_count {
        let Some(point) = room.random_interior_point(rng) else {
            return;
        };
        if !map.entities_at(point).is_empty() {
            continue;
        }
        ecs::spawn_item(map, &item_for(rng.rand::<f64>()), point);
    }
}

/// Monster for a uniform roll in `[0, 1)`.
fn monster_for(roll: f64) -> MonsterTemplate {
    if roll < 0.8 {
        MonsterTemplate::orc()
    } else {
        MonsterTemplate::troll()
    }
}

/// Item for a uniform roll in `[0, 1)`.
fn item_for(roll: f64) -> ConsumableTemplate {
    if roll < 0.70 {
        ConsumableTemplate::health_potion()
    } else if roll < 0.80 {
        ConsumableTemplate::fireball_scroll()
    } else if roll < 0.90 {
        ConsumableTemplate::confusion_scroll()
    } else {
        ConsumableTemplate::lightning_scroll()
    }
}

/// Builds a full level: rooms stamped in, the player dropped in the first
/// room, each room populated, then every consecutive pair of rooms joined.
pub fn generate_dungeon(
    config: &GameConfig,
    rng: &mut RandomNumberGenerator,
) -> Result<DungeonMap, GenerationError> {
    let rooms = generate_rooms(
        config.map_width,
        config.map_height,
        config.max_rooms,
        config.min_room_size,
        config.max_room_size,
        rng,
    );
    let Some(first) = rooms.first() else {
        return Err(GenerationError::NoRooms {
            attempts: config.max_rooms,
        });
    };

    let mut map = DungeonMap::new(
        config.map_width,
        config.map_height,
        &PlayerTemplate::default(),
        config.inventory_capacity,
    );
    let player = map.player();
    map.set_position(player, first.center());

    for room in &rooms {
        map.add_room(room.origin(), &room.tiles());
        populate(
            room,
            &mut map,
            config.max_monsters_per_room,
            config.max_items_per_room,
            rng,
        );
    }

    for pair in rooms.windows(2) {
        let tunnel = carve(&pair[0], &pair[1], rng);
        debug!(
            from = ?pair[0].center(),
            to = ?pair[1].center(),
            "carving corridor"
        );
        for point in tunnel {
            trace!(x = point.x, y = point.y, "floor");
            map.set_tile(point, Tile::floor());
        }
    }

    info!(
        rooms = rooms.len(),
        entities = map.entities().len(),
        "dungeon generated"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;

    fn reachable_from(map: &DungeonMap, start: Point) -> HashSet<Point> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(point) = queue.pop_front() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let next = Point::new(point.x + dx, point.y + dy);
                if map.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn spawn_tables_split_the_unit_interval() {
        assert_eq!(monster_for(0.0).name, "Orc");
        assert_eq!(monster_for(0.799).name, "Orc");
        assert_eq!(monster_for(0.8).name, "Troll");
        let items: Vec<&str> = [0.0, 0.699, 0.70, 0.799, 0.80, 0.899, 0.90, 0.999]
            .into_iter()
            .map(|roll| item_for(roll).name)
            .collect();
        assert_eq!(
            items,
            vec![
                "Health Potion",
                "Health Potion",
                "Fireball Scroll",
                "Fireball Scroll",
                "Confusion Scroll",
                "Confusion Scroll",
                "Lightning Scroll",
                "Lightning Scroll",
            ]
        );
    }

    #[test]
    fn rooms_fit_and_never_overlap() {
        for seed in 0..50 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let rooms = generate_rooms(80, 43, 30, 6, 10, &mut rng);
            assert!(!rooms.is_empty());
            for (i, room) in rooms.iter().enumerate() {
                let corner = room.far_corner();
                assert!(room.origin().x >= 0 && room.origin().y >= 0);
                assert!(corner.x < 80 && corner.y < 43, "room {room:?} leaves the map");
                for other in &rooms[i + 1..] {
                    assert!(!room.intersects(other));
                }
            }
        }
    }

    #[test]
    fn touching_rooms_count_as_overlapping() {
        let a = Room::new(0, 0, 5, 5);
        let b = Room::new(5, 0, 5, 5);
        let c = Room::new(6, 0, 5, 5);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn overlap_uses_height_on_the_vertical_axis() {
        // Wide and short: a width-based vertical bound would reach y = 10.
        let wide = Room::new(0, 0, 10, 4);
        let below = Room::new(0, 6, 4, 4);
        assert!(!wide.intersects(&below));
    }

    #[test]
    fn tiny_map_can_yield_no_rooms() {
        let mut rng = RandomNumberGenerator::seeded(3);
        assert!(generate_rooms(5, 5, 10, 6, 10, &mut rng).is_empty());
    }

    #[test]
    fn tunnel_steps_one_axis_at_a_time() {
        let a = Room::new(2, 2, 5, 5);
        let b = Room::new(20, 15, 7, 6);
        for horizontal_first in [true, false] {
            let path: Vec<Point> = Tunnel::new(a.center(), b.center(), horizontal_first).collect();
            let first = path[0];
            assert_eq!((first.x - a.center().x).abs() + (first.y - a.center().y).abs(), 1);
            assert_eq!(*path.last().unwrap(), b.center());
            let mut bends = 0;
            for window in path.windows(3) {
                let first_step = (window[1].x - window[0].x, window[1].y - window[0].y);
                let second_step = (window[2].x - window[1].x, window[2].y - window[1].y);
                if first_step != second_step {
                    bends += 1;
                }
            }
            for window in path.windows(2) {
                let dx = (window[1].x - window[0].x).abs();
                let dy = (window[1].y - window[0].y).abs();
                assert_eq!(dx + dy, 1);
            }
            assert!(bends <= 1);
        }
    }

    #[test]
    fn tunnel_switches_axis_when_already_aligned() {
        let path: Vec<Point> = Tunnel::new(Point::new(3, 3), Point::new(3, 7), true).collect();
        assert_eq!(
            path,
            vec![
                Point::new(3, 4),
                Point::new(3, 5),
                Point::new(3, 6),
                Point::new(3, 7)
            ]
        );
    }

    #[test]
    fn tunnel_restarts_when_cloned() {
        let tunnel = Tunnel::new(Point::new(1, 1), Point::new(4, 6), false);
        let once: Vec<Point> = tunnel.clone().collect();
        let twice: Vec<Point> = tunnel.collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 8);
    }

    #[test]
    fn populate_never_stacks_new_entities() {
        let room = Room::new(1, 1, 6, 6);
        for seed in 0..200 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let mut map = DungeonMap::new(20, 20, &PlayerTemplate::default(), 26);
            map.add_room(room.origin(), &room.tiles());
            let player = map.player();
            map.set_position(player, Point::new(15, 15));
            populate(&room, &mut map, 8, 8, &mut rng);

            let mut occupied = HashSet::new();
            for &entity in map.entities() {
                let point = map.position_of(entity).unwrap();
                assert!(occupied.insert(point), "seed {seed}: two entities on {point:?}");
                if entity != player {
                    assert!(point.x > 1 && point.x < 6 && point.y > 1 && point.y < 6);
                }
            }
        }
    }

    #[test]
    fn populate_respects_existing_occupants() {
        let room = Room::new(0, 0, 3, 3);
        let mut rng = RandomNumberGenerator::seeded(11);
        let mut map = DungeonMap::new(5, 5, &PlayerTemplate::default(), 26);
        let player = map.player();
        map.set_position(player, Point::new(1, 1));
        populate(&room, &mut map, 5, 5, &mut rng);
        assert_eq!(map.entities(), &[player]);
    }

    #[test]
    fn every_floor_tile_is_reachable_from_spawn() {
        let config = GameConfig::default();
        for seed in 0..25 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let map = generate_dungeon(&config, &mut rng).unwrap();
            let spawn = map.position_of(map.player()).unwrap();
            assert!(map.is_walkable(spawn));
            let reachable = reachable_from(&map, spawn);
            for point in map.walkable_points() {
                assert!(reachable.contains(&point), "seed {seed}: {point:?} is cut off");
            }
        }
    }

    #[test]
    fn generated_entities_stay_in_bounds_and_apart() {
        let config = GameConfig::default();
        let mut rng = RandomNumberGenerator::seeded(99);
        let map = generate_dungeon(&config, &mut rng).unwrap();
        let mut blocked = HashSet::new();
        for &entity in map.entities() {
            let point = map.position_of(entity).unwrap();
            assert!(map.is_in_bounds(point));
            assert!(map.is_walkable(point));
            if map.get_blocking_entity_at(point) == Some(entity) {
                assert!(blocked.insert(point));
            }
        }
    }

    #[test]
    fn generation_without_rooms_is_an_error() {
        let config = GameConfig {
            map_width: 6,
            map_height: 6,
            min_room_size: 6,
            max_room_size: 6,
            ..GameConfig::default()
        };
        let mut rng = RandomNumberGenerator::seeded(1);
        assert!(matches!(
            generate_dungeon(&config, &mut rng),
            Err(GenerationError::NoRooms { .. })
        ));
    }
}
