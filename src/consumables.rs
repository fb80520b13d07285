use bracket_geometry::prelude::{DistanceAlg, Point};
use specs::prelude::{Entity, WorldExt};
use tracing::debug;

use crate::{
    combat,
    data::{colors, items::ConsumableEffect},
    ecs::components::{Ai, Consumable, Inventory},
    error::ActionError,
    log::MessageLog,
    map::DungeonMap,
};

/// Applies `item`'s effect on behalf of `consumer`. The item is used up only
/// when the effect went through.
pub fn activate(
    map: &mut DungeonMap,
    log: &mut MessageLog,
    consumer: Entity,
    item: Entity,
    target: Option<Point>,
) -> Result<(), ActionError> {
    let effect = map
        .ecs()
        .read_component::<Consumable>()
        .get(item)
        .map(|consumable| consumable.effect.clone())
        .ok_or_else(|| ActionError::impossible("That cannot be used."))?;
    debug!(?effect, ?target, "activate");

    match effect {
        ConsumableEffect::Heal { amount } => {
            let recovered = combat::heal(map, consumer, amount);
            if recovered == 0 {
                return Err(ActionError::impossible("Your health is already full."));
            }
            log.add(
                format!(
                    "You consume the {}, and recover {recovered} HP!",
                    map.name_of(item)
                ),
                colors::HEALTH_RECOVERED,
            );
        }
        ConsumableEffect::Lightning { damage, range } => {
            let victim = closest_visible_actor(map, consumer, range)
                .ok_or_else(|| ActionError::impossible("No enemy is close enough to strike."))?;
            log.add(
                format!(
                    "A lightning bolt strikes the {} with a loud thunder, for {damage} damage!",
                    map.name_of(victim)
                ),
                colors::WHITE,
            );
            combat::take_damage(map, log, victim, damage);
        }
        ConsumableEffect::Confusion { turns } => {
            let point = visible_target(map, target)?;
            let victim = map
                .get_actor_at(point)
                .ok_or_else(|| ActionError::impossible("You must select an enemy to target."))?;
            if victim == consumer {
                return Err(ActionError::impossible("You cannot confuse yourself!"));
            }
            {
                let mut brains = map.ecs().write_component::<Ai>();
                let previous = brains
                    .get(victim)
                    .cloned()
                    .ok_or_else(|| ActionError::impossible("You must select an enemy to target."))?;
                let _ = brains.insert(
                    victim,
                    Ai::Confused {
                        previous: Box::new(previous),
                        turns_remaining: turns,
                    },
                );
            }
            log.add(
                format!(
                    "The eyes of the {} look vacant, as it starts to stumble around!",
                    map.name_of(victim)
                ),
                colors::STATUS_EFFECT_APPLIED,
            );
        }
        ConsumableEffect::Fireball { damage, radius } => {
            let point = visible_target(map, target)?;
            let caught: Vec<Entity> = map
                .actors()
                .into_iter()
                .filter(|&actor| {
                    map.position_of(actor).is_some_and(|pos| {
                        DistanceAlg::Pythagoras.distance2d(pos, point) <= radius as f32
                    })
                })
                .collect();
            if caught.is_empty() {
                return Err(ActionError::impossible("There are no targets in the radius."));
            }
            for victim in caught {
                log.add(
                    format!(
                        "The {} is engulfed in a fiery explosion, taking {damage} damage!",
                        map.name_of(victim)
                    ),
                    colors::WHITE,
                );
                combat::take_damage(map, log, victim, damage);
            }
        }
    }

    consume(map, consumer, item);
    Ok(())
}

fn visible_target(map: &DungeonMap, target: Option<Point>) -> Result<Point, ActionError> {
    let point = target.ok_or_else(|| ActionError::impossible("You must select a target."))?;
    if !map.is_visible(point) {
        return Err(ActionError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    Ok(point)
}

fn closest_visible_actor(map: &DungeonMap, consumer: Entity, range: i32) -> Option<Entity> {
    let origin = map.position_of(consumer)?;
    let mut closest: Option<(Entity, f32)> = None;
    for actor in map.actors() {
        if actor == consumer {
            continue;
        }
        let Some(pos) = map.position_of(actor) else {
            continue;
        };
        if !map.is_visible(pos) {
            continue;
        }
        let distance = DistanceAlg::Pythagoras.distance2d(origin, pos);
        if distance > range as f32 {
            continue;
        }
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((actor, distance));
        }
    }
    closest.map(|(actor, _)| actor)
}

fn consume(map: &mut DungeonMap, owner: Entity, item: Entity) {
    {
        let mut inventories = map.ecs().write_component::<Inventory>();
        if let Some(inventory) = inventories.get_mut(owner) {
            inventory.items.retain(|&held| held != item);
        }
    }
    map.unregister(item);
    let _ = map.ecs_mut().delete_entity(item);
}
