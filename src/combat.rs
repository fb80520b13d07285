use bracket_terminal::prelude::RGB;
use specs::prelude::{Entity, WorldExt};
use tracing::{debug, info};

use crate::{
    data::colors,
    ecs::components::{Ai, BlocksTile, Fighter, Name, RenderOrder, Renderable},
    log::MessageLog,
    map::DungeonMap,
};

/// Subtracts `amount` from the target's HP, running the death transition if
/// this blow is the one that kills it.
pub fn take_damage(map: &mut DungeonMap, log: &mut MessageLog, target: Entity, amount: i32) {
    let died = {
        let mut fighters = map.ecs().write_component::<Fighter>();
        fighters
            .get_mut(target)
            .is_some_and(|fighter| fighter.take_damage(amount))
    };
    if died {
        die(map, log, target);
    }
}

/// HP actually restored; `0` when the target was already at full health.
pub fn heal(map: &mut DungeonMap, target: Entity, amount: i32) -> i32 {
    let mut fighters = map.ecs().write_component::<Fighter>();
    fighters
        .get_mut(target)
        .map_or(0, |fighter| fighter.heal(amount))
}

/// One melee exchange. Zero or negative damage still logs a miss.
pub fn melee(map: &mut DungeonMap, log: &mut MessageLog, attacker: Entity, target: Entity) {
    let (power, defence) = {
        let fighters = map.ecs().read_component::<Fighter>();
        let power = fighters.get(attacker).map_or(0, |fighter| fighter.power);
        let defence = fighters.get(target).map_or(0, |fighter| fighter.defence);
        (power, defence)
    };
    let damage = power - defence;
    let description = format!("{} attacks {}", map.name_of(attacker), map.name_of(target));
    let color = if map.is_player(attacker) {
        colors::PLAYER_ATTACK
    } else {
        colors::ENEMY_ATTACK
    };
    debug!(power, defence, damage, "melee");

    if damage > 0 {
        log.add(format!("{description} for {damage} hit points."), color);
        take_damage(map, log, target, damage);
    } else {
        log.add(format!("{description} but does no damage."), color);
    }
}

/// Turns a freshly killed actor into inert remains: no longer blocking, no
/// AI, drawn below items.
fn die(map: &mut DungeonMap, log: &mut MessageLog, entity: Entity) {
    let name = map.name_of(entity);
    let (message, color) = if map.is_player(entity) {
        ("You died!".to_string(), colors::PLAYER_DIE)
    } else {
        (format!("{name} is dead!"), colors::ENEMY_DIE)
    };

    let ecs = map.ecs();
    ecs.write_component::<BlocksTile>().remove(entity);
    ecs.write_component::<Ai>().remove(entity);
    if let Some(renderable) = ecs.write_component::<Renderable>().get_mut(entity) {
        renderable.glyph = b'%' as u16;
        renderable.fg = RGB::named(colors::REMAINS);
        renderable.order = RenderOrder::Corpse;
    }
    let _ = ecs.write_component::<Name>().insert(
        entity,
        Name {
            name: format!("Remains of {name}"),
        },
    );

    info!(%name, "actor died");
    log.add(message, color);
}
