use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{Entity, WorldExt};
use tracing::{debug, info, info_span};

use crate::{
    actions::{self, Action},
    ai,
    config::GameConfig,
    data::colors,
    ecs::components::{Ai, Fighter},
    error::{ActionError, GenerationError},
    input::{self, InputMode, KeyEvent},
    log::MessageLog,
    map::{DungeonMap, procgen},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The key produced no action; only the mode (if anything) changed.
    NoAction,
    /// The action was refused; enemies did not move.
    Aborted,
    /// The action resolved, enemies acted, visibility was refreshed.
    Completed,
}

/// Owns one running session: the level, the message log, the input mode and
/// the random stream everything draws from.
pub struct Engine {
    pub map: DungeonMap,
    pub log: MessageLog,
    pub mode: InputMode,
    pub turn: u64,
    pub seed: u64,
    config: GameConfig,
    rng: RandomNumberGenerator,
}

impl Engine {
    pub fn new(config: GameConfig) -> Result<Self, GenerationError> {
        let seed = config
            .seed
            .unwrap_or_else(|| RandomNumberGenerator::new().next_u64());
        let mut rng = RandomNumberGenerator::seeded(seed);
        let map = procgen::generate_dungeon(&config, &mut rng)?;
        info!(seed, "new session");
        let mut engine = Self::from_parts(map, config, seed, rng);
        engine.log.add(
            "Hello and welcome, adventurer, to yet another dungeon!",
            colors::WELCOME_TEXT,
        );
        Ok(engine)
    }

    /// Wraps an already built map; visibility is computed immediately.
    pub fn from_parts(
        mut map: DungeonMap,
        config: GameConfig,
        seed: u64,
        rng: RandomNumberGenerator,
    ) -> Self {
        let player = map.player();
        map.update_fov(player, config.fov_radius);
        Self {
            map,
            log: MessageLog::default(),
            mode: InputMode::Game,
            turn: 0,
            seed,
            config,
            rng,
        }
    }

    pub fn player_stats(&self) -> Option<Fighter> {
        let fighters = self.map.ecs().read_component::<Fighter>();
        fighters.get(self.map.player()).cloned()
    }

    /// Feeds one key through the input machine and, if it yields an action,
    /// plays the resulting turn to completion.
    pub fn handle_key(&mut self, event: KeyEvent) -> TurnOutcome {
        let transition = input::handle_key(&self.mode, event, &self.map, &self.log);
        if transition.mode != self.mode {
            debug!(from = ?self.mode, to = ?transition.mode, "mode change");
        }
        self.mode = transition.mode;
        if let Some((text, color)) = transition.message {
            self.log.add(text, color);
        }
        match transition.action {
            Some(action) => self.play_turn(&action),
            None => TurnOutcome::NoAction,
        }
    }

    /// Player action first, then every living enemy in registry order, then
    /// a fresh field of view. A refused action ends the turn on the spot.
    pub fn play_turn(&mut self, action: &Action) -> TurnOutcome {
        let span = info_span!("turn", turn = self.turn);
        let _entered = span.enter();
        let player = self.map.player();

        match actions::perform(action, player, &mut self.map, &mut self.log) {
            Ok(()) => {}
            Err(ActionError::Impossible(message)) => {
                debug!(%message, "impossible action");
                self.log.add(message, colors::IMPOSSIBLE);
                return TurnOutcome::Aborted;
            }
            Err(err @ ActionError::Blocked(_)) => {
                debug!(%err, "action blocked");
                return TurnOutcome::Aborted;
            }
        }

        if !self.map.is_alive(player) {
            self.mode = InputMode::GameOver;
        }
        if self.mode.is_play() {
            self.handle_enemy_turns();
        }
        if !self.map.is_alive(player) {
            info!(turn = self.turn, "player died");
            self.mode = InputMode::GameOver;
        }
        self.map.update_fov(player, self.config.fov_radius);
        self.turn += 1;
        TurnOutcome::Completed
    }

    fn handle_enemy_turns(&mut self) {
        let enemies: Vec<Entity> = {
            let brains = self.map.ecs().read_component::<Ai>();
            self.map
                .entities()
                .iter()
                .copied()
                .filter(|&entity| brains.get(entity).is_some())
                .collect()
        };
        for enemy in enemies {
            if !self.map.is_alive(enemy) {
                continue;
            }
            ai::take_turn(&mut self.map, &mut self.log, &mut self.rng, enemy);
        }
    }
}
