pub mod components;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{BLACK, RGB, WHITE};
use specs::prelude::{Builder, Entity, World as SpecsWorld, WorldExt};

use crate::{
    data::{items::ConsumableTemplate, monsters::MonsterTemplate, monsters::PlayerTemplate},
    map::DungeonMap,
};

use self::components::{
    Ai, BlocksTile, Consumable, Fighter, Inventory, Name, Position, RenderOrder,
    Renderable,
};

pub fn register_components(world: &mut SpecsWorld) {
    world.register::<Position>();
    world.register::<Renderable>();
    world.register::<Name>();
    world.register::<BlocksTile>();
    world.register::<Fighter>();
    world.register::<Ai>();
    world.register::<Inventory>();
    world.register::<Consumable>();
}

pub fn spawn_player(
    world: &mut SpecsWorld,
    template: &PlayerTemplate,
    point: Point,
    inventory_capacity: usize,
) -> Entity {
    world
        .create_entity()
        .with(Position { point })
        .with(Renderable {
            glyph: b'@' as u16,
            fg: RGB::named(WHITE),
            bg: RGB::named(BLACK),
            order: RenderOrder::Actor,
        })
        .with(Name {
            name: template.name.to_string(),
        })
        .with(BlocksTile)
        .with(Fighter::new(template.hp, template.defence, template.power))
        .with(Inventory::with_capacity(inventory_capacity))
        .build()
}

pub fn spawn_monster(map: &mut DungeonMap, template: &MonsterTemplate, point: Point) -> Entity {
    let entity = map
        .ecs_mut()
        .create_entity()
        .with(Position { point })
        .with(Renderable {
            glyph: template.glyph as u16,
            fg: template.color,
            bg: RGB::named(BLACK),
            order: RenderOrder::Actor,
        })
        .with(Name {
            name: template.name.to_string(),
        })
        .with(BlocksTile)
        .with(Fighter::new(template.hp, template.defence, template.power))
        .with(Ai::Hostile)
        .with(Inventory::with_capacity(0))
        .build();
    map.register(entity);
    entity
}

pub fn spawn_item(map: &mut DungeonMap, template: &ConsumableTemplate, point: Point) -> Entity {
    let entity = map
        .ecs_mut()
        .create_entity()
        .with(Position { point })
        .with(Renderable {
            glyph: template.glyph as u16,
            fg: template.color,
            bg: RGB::named(BLACK),
            order: RenderOrder::Item,
        })
        .with(Name {
            name: template.name.to_string(),
        })
        .with(Consumable {
            effect: template.effect.clone(),
        })
        .build();
    map.register(entity);
    entity
}
