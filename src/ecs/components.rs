use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, Entity, NullStorage, VecStorage};

use crate::data::items::ConsumableEffect;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub fg: RGB,
    pub bg: RGB,
    pub order: RenderOrder,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name {
    pub name: String,
}

impl Component for Name {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct BlocksTile;

impl Component for BlocksTile {
    type Storage = NullStorage<Self>;
}

/// Combat capability. `hp` stays within `0..=max_hp`; once it reaches zero
/// the fighter is dead for good and ignores further heals and damage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fighter {
    hp: i32,
    pub max_hp: i32,
    pub defence: i32,
    pub power: i32,
    alive: bool,
}

impl Component for Fighter {
    type Storage = VecStorage<Self>;
}

impl Fighter {
    pub fn new(max_hp: i32, defence: i32, power: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            defence,
            power,
            alive: max_hp > 0,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns the HP actually restored; `0` means the fighter was already
    /// at full health (or is dead) and nothing changed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.alive || self.hp == self.max_hp {
            return 0;
        }
        let recovered = amount.min(self.max_hp - self.hp).max(0);
        self.set_hp(self.hp + recovered);
        recovered
    }

    /// Returns `true` exactly once: on the call that kills the fighter.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.set_hp(self.hp - amount)
    }

    fn set_hp(&mut self, value: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = value.clamp(0, self.max_hp);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ai {
    Hostile,
    Confused {
        previous: Box<Ai>,
        turns_remaining: i32,
    },
}

impl Component for Ai {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct Inventory {
    pub items: Vec<Entity>,
    pub capacity: usize,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn slot(&self, index: usize) -> Option<Entity> {
        self.items.get(index).copied()
    }
}

impl Component for Inventory {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Consumable {
    pub effect: ConsumableEffect,
}

impl Component for Consumable {
    type Storage = VecStorage<Self>;
}
