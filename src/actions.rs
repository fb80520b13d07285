use bracket_geometry::prelude::Point;
use specs::prelude::{Entity, WorldExt};
use tracing::debug;

use crate::{
    combat, consumables,
    data::colors,
    ecs::components::{Consumable, Inventory, Position},
    error::ActionError,
    log::MessageLog,
    map::DungeonMap,
};

/// Everything an actor can do with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Attack whatever stands in the way, otherwise step there.
    Bump { dx: i32, dy: i32 },
    Movement { dx: i32, dy: i32 },
    Melee { dx: i32, dy: i32 },
    Wait,
    Pickup,
    DropItem { item: Entity },
    UseItem { item: Entity, target: Option<Point> },
}

/// Resolves `action` for `performer`. An `Err` means nothing happened and
/// the turn does not count.
pub fn perform(
    action: &Action,
    performer: Entity,
    map: &mut DungeonMap,
    log: &mut MessageLog,
) -> Result<(), ActionError> {
    debug!(?action, ?performer, "perform");
    match *action {
        Action::Bump { dx, dy } => {
            let dest = destination(map, performer, dx, dy)?;
            if map.get_actor_at(dest).is_some() {
                perform(&Action::Melee { dx, dy }, performer, map, log)
            } else {
                perform(&Action::Movement { dx, dy }, performer, map, log)
            }
        }
        Action::Movement { dx, dy } => {
            let dest = destination(map, performer, dx, dy)?;
            if !map.is_in_bounds(dest)
                || !map.is_walkable(dest)
                || map.get_blocking_entity_at(dest).is_some()
            {
                return Err(ActionError::Blocked(dest));
            }
            map.set_position(performer, dest);
            Ok(())
        }
        Action::Melee { dx, dy } => {
            let dest = destination(map, performer, dx, dy)?;
            let target = map
                .get_actor_at(dest)
                .filter(|&target| target != performer)
                .ok_or_else(|| ActionError::impossible("Nothing to attack."))?;
            combat::melee(map, log, performer, target);
            Ok(())
        }
        Action::Wait => Ok(()),
        Action::Pickup => pickup(performer, map, log),
        Action::DropItem { item } => drop_item(performer, item, map, log),
        Action::UseItem { item, target } => {
            consumables::activate(map, log, performer, item, target)
        }
    }
}

fn destination(map: &DungeonMap, performer: Entity, dx: i32, dy: i32) -> Result<Point, ActionError> {
    map.position_of(performer)
        .map(|pos| Point::new(pos.x + dx, pos.y + dy))
        .ok_or_else(|| ActionError::impossible("Nothing happens."))
}

fn pickup(performer: Entity, map: &mut DungeonMap, log: &mut MessageLog) -> Result<(), ActionError> {
    let here = map
        .position_of(performer)
        .ok_or_else(|| ActionError::impossible("Nothing happens."))?;
    let item = {
        let consumables = map.ecs().read_component::<Consumable>();
        map.entities_at(here)
            .into_iter()
            .find(|&entity| consumables.get(entity).is_some())
    }
    .ok_or_else(|| ActionError::impossible("There is nothing here to pick up."))?;

    {
        let mut inventories = map.ecs().write_component::<Inventory>();
        let inventory = inventories
            .get_mut(performer)
            .ok_or_else(|| ActionError::impossible("You cannot carry anything."))?;
        if inventory.is_full() {
            return Err(ActionError::impossible("Your inventory is full."));
        }
        inventory.items.push(item);
    }
    map.ecs().write_component::<Position>().remove(item);
    map.unregister(item);

    log.add(
        format!("You picked up the {}!", map.name_of(item)),
        colors::ITEM_PICKUP,
    );
    Ok(())
}

fn drop_item(
    performer: Entity,
    item: Entity,
    map: &mut DungeonMap,
    log: &mut MessageLog,
) -> Result<(), ActionError> {
    let here = map
        .position_of(performer)
        .ok_or_else(|| ActionError::impossible("Nothing happens."))?;
    {
        let mut inventories = map.ecs().write_component::<Inventory>();
        let inventory = inventories
            .get_mut(performer)
            .ok_or_else(|| ActionError::impossible("You have nothing to drop."))?;
        let Some(slot) = inventory.items.iter().position(|&held| held == item) else {
            return Err(ActionError::impossible("You do not carry that."));
        };
        inventory.items.remove(slot);
    }
    map.set_position(item, here);
    map.register(item);

    log.add(format!("You dropped the {}.", map.name_of(item)), colors::WHITE);
    Ok(())
}
