pub mod navigation;

use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{Entity, WorldExt};
use tracing::debug;

use crate::{
    actions::{self, Action},
    data::colors,
    ecs::components::Ai,
    log::MessageLog,
    map::DungeonMap,
};

use self::navigation::NavGrid;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Runs one decide-and-act step for `entity`. Actions that fail are simply
/// dropped; an enemy never gets a second try in the same turn.
pub fn take_turn(
    map: &mut DungeonMap,
    log: &mut MessageLog,
    rng: &mut RandomNumberGenerator,
    entity: Entity,
) {
    let brain = map.ecs().read_component::<Ai>().get(entity).cloned();
    let action = match brain {
        Some(Ai::Hostile) => hostile_action(map, entity),
        Some(Ai::Confused {
            previous,
            turns_remaining,
        }) => confused_action(map, log, rng, entity, *previous, turns_remaining),
        None => None,
    };
    let Some(action) = action else {
        return;
    };
    if let Err(err) = actions::perform(&action, entity, map, log) {
        debug!(?entity, %err, "enemy action dropped");
    }
}

/// Closes in on the player while the player can see this actor, attacking
/// once adjacent.
fn hostile_action(map: &DungeonMap, entity: Entity) -> Option<Action> {
    let player = map.player();
    if !map.is_alive(player) {
        return Some(Action::Wait);
    }
    let here = map.position_of(entity)?;
    let target = map.position_of(player)?;
    if !map.is_visible(here) {
        return Some(Action::Wait);
    }

    let (dx, dy) = (target.x - here.x, target.y - here.y);
    if dx.abs().max(dy.abs()) <= 1 {
        return Some(Action::Melee { dx, dy });
    }
    match NavGrid::from_map(map).next_step(here, target) {
        Some(step) => Some(Action::Movement {
            dx: step.x - here.x,
            dy: step.y - here.y,
        }),
        None => Some(Action::Wait),
    }
}

fn confused_action(
    map: &mut DungeonMap,
    log: &mut MessageLog,
    rng: &mut RandomNumberGenerator,
    entity: Entity,
    previous: Ai,
    turns_remaining: i32,
) -> Option<Action> {
    let mut brains = map.ecs().write_component::<Ai>();
    if turns_remaining <= 0 {
        let _ = brains.insert(entity, previous);
        drop(brains);
        log.add(
            format!("The {} is no longer confused.", map.name_of(entity)),
            colors::WHITE,
        );
        return None;
    }
    let _ = brains.insert(
        entity,
        Ai::Confused {
            previous: Box::new(previous),
            turns_remaining: turns_remaining - 1,
        },
    );
    let (dx, dy) = DIRECTIONS[rng.range(0, DIRECTIONS.len() as i32) as usize];
    Some(Action::Bump { dx, dy })
}
