pub mod procgen;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, field_of_view};
use bracket_terminal::prelude::{BLACK, RGB};
use specs::prelude::{Entity, World as SpecsWorld, WorldExt};

use crate::{
    data::monsters::PlayerTemplate,
    ecs::{
        self,
        components::{BlocksTile, Fighter, Name, Position},
    },
};

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub walkable: bool,
    pub transparent: bool,
    pub visible: bool,
    pub explored: bool,
    pub glyph: u16,
    pub fg: RGB,
    pub bg: RGB,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub fn wall() -> Self {
        Self {
            walkable: false,
            transparent: false,
            visible: false,
            explored: false,
            glyph: b'#' as u16,
            fg: RGB::from_u8(128, 128, 128),
            bg: RGB::named(BLACK),
        }
    }

    pub fn floor() -> Self {
        Self {
            walkable: true,
            transparent: true,
            visible: false,
            explored: false,
            glyph: b'.' as u16,
            fg: RGB::from_u8(96, 96, 128),
            bg: RGB::named(BLACK),
        }
    }
}

/// A rectangular patch of tiles stamped onto the map by [`DungeonMap::add_room`].
#[derive(Clone, Debug)]
pub struct TileBlock {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
}

impl TileBlock {
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize)
    }
}

/// The level: a fixed-size tile grid plus the ordered registry of entities
/// standing on it. Component data lives in the embedded specs world; the
/// registry decides iteration order for turns and spawns.
pub struct DungeonMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    ecs: SpecsWorld,
    entities: Vec<Entity>,
    player: Entity,
}

impl DungeonMap {
    /// An all-wall map holding only the player, placed at the map centre
    /// until generation moves it.
    pub fn new(width: i32, height: i32, player: &PlayerTemplate, inventory_capacity: usize) -> Self {
        let mut world = SpecsWorld::new();
        ecs::register_components(&mut world);
        let start = Point::new(width / 2, height / 2);
        let player = ecs::spawn_player(&mut world, player, start, inventory_capacity);
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); size],
            ecs: world,
            entities: vec![player],
            player,
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.is_in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn is_in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point).map(|idx| &self.tiles[idx])
    }

    pub fn tile_at_mut(&mut self, point: Point) -> Option<&mut Tile> {
        self.idx(point).map(|idx| &mut self.tiles[idx])
    }

    pub fn set_tile(&mut self, point: Point, tile: Tile) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx] = tile;
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| tile.walkable)
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| tile.visible)
    }

    #[cfg(test)]
    pub fn walkable_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    /// Overwrites the rectangle starting at `origin` with `block`; cells
    /// falling outside the map are dropped.
    pub fn add_room(&mut self, origin: Point, block: &TileBlock) {
        for y in 0..block.height {
            for x in 0..block.width {
                if let Some(tile) = block.get(x, y) {
                    self.set_tile(Point::new(origin.x + x, origin.y + y), tile.clone());
                }
            }
        }
    }

    /// Recomputes the visible set from `observer`. Every tile seen this turn
    /// is also marked explored; nothing else ever clears `explored`.
    pub fn update_fov(&mut self, observer: Entity, radius: i32) {
        for tile in &mut self.tiles {
            tile.visible = false;
        }
        let Some(origin) = self.position_of(observer) else {
            return;
        };
        let seen = field_of_view(origin, radius, &*self);
        for point in seen {
            if let Some(tile) = self.tile_at_mut(point) {
                tile.visible = true;
                tile.explored = true;
            }
        }
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn ecs(&self) -> &SpecsWorld {
        &self.ecs
    }

    pub fn ecs_mut(&mut self) -> &mut SpecsWorld {
        &mut self.ecs
    }

    /// Entities on the map, in registry order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn register(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn unregister(&mut self, entity: Entity) {
        self.entities.retain(|&registered| registered != entity);
    }

    pub fn position_of(&self, entity: Entity) -> Option<Point> {
        let positions = self.ecs.read_component::<Position>();
        positions.get(entity).map(|pos| pos.point)
    }

    pub fn set_position(&mut self, entity: Entity, point: Point) {
        let mut positions = self.ecs.write_component::<Position>();
        let _ = positions.insert(entity, Position { point });
    }

    pub fn name_of(&self, entity: Entity) -> String {
        let names = self.ecs.read_component::<Name>();
        names
            .get(entity)
            .map(|name| name.name.clone())
            .unwrap_or_else(|| "something".to_string())
    }

    pub fn is_player(&self, entity: Entity) -> bool {
        entity == self.player
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let fighters = self.ecs.read_component::<Fighter>();
        fighters.get(entity).is_some_and(Fighter::is_alive)
    }

    pub fn get_blocking_entity_at(&self, point: Point) -> Option<Entity> {
        let positions = self.ecs.read_component::<Position>();
        let blockers = self.ecs.read_component::<BlocksTile>();
        self.entities.iter().copied().find(|&entity| {
            blockers.get(entity).is_some()
                && positions.get(entity).is_some_and(|pos| pos.point == point)
        })
    }

    pub fn get_actor_at(&self, point: Point) -> Option<Entity> {
        let positions = self.ecs.read_component::<Position>();
        let fighters = self.ecs.read_component::<Fighter>();
        self.entities.iter().copied().find(|&entity| {
            fighters.get(entity).is_some_and(Fighter::is_alive)
                && positions.get(entity).is_some_and(|pos| pos.point == point)
        })
    }

    pub fn entities_at(&self, point: Point) -> Vec<Entity> {
        let positions = self.ecs.read_component::<Position>();
        self.entities
            .iter()
            .copied()
            .filter(|&entity| positions.get(entity).is_some_and(|pos| pos.point == point))
            .collect()
    }

    /// Living fighters in registry order, the player included.
    pub fn actors(&self) -> Vec<Entity> {
        let fighters = self.ecs.read_component::<Fighter>();
        self.entities
            .iter()
            .copied()
            .filter(|&entity| fighters.get(entity).is_some_and(Fighter::is_alive))
            .collect()
    }
}

impl BaseMap for DungeonMap {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| !tile.transparent)
    }
}

impl Algorithm2D for DungeonMap {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        self.is_in_bounds(point)
    }
}
