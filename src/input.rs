use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::VirtualKeyCode;
use specs::prelude::{Entity, WorldExt};

use crate::{
    actions::Action,
    data::{colors, items::TargetRequest},
    ecs::components::{Consumable, Inventory},
    log::MessageLog,
    map::DungeonMap,
};

/// One key press plus the modifiers held with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKeyCode,
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: VirtualKeyCode) -> Self {
        Self {
            key,
            shift: false,
            control: false,
            alt: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[cfg(test)]
    pub fn with_control(mut self) -> Self {
        self.control = true;
        self
    }

    #[cfg(test)]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Cursor step multiplier; the strongest held modifier wins.
    fn multiplier(&self) -> i32 {
        if self.alt {
            20
        } else if self.control {
            10
        } else if self.shift {
            5
        } else {
            1
        }
    }
}

/// What a confirmed target is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetingKind {
    Look,
    SingleRanged { item: Entity },
    AreaAttack { radius: i32, item: Entity },
}

impl TargetingKind {
    /// Half-width of the highlighted square around the cursor.
    pub fn radius(&self) -> i32 {
        match self {
            TargetingKind::AreaAttack { radius, .. } => *radius,
            TargetingKind::Look | TargetingKind::SingleRanged { .. } => 0,
        }
    }

    fn confirm(&self, cursor: Point) -> Option<Action> {
        match *self {
            TargetingKind::Look => None,
            TargetingKind::SingleRanged { item } | TargetingKind::AreaAttack { item, .. } => {
                Some(Action::UseItem {
                    item,
                    target: Some(cursor),
                })
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Game,
    Log { cursor: usize },
    UseInventory,
    DropInventory,
    Targeting { cursor: Point, kind: TargetingKind },
    GameOver,
}

impl InputMode {
    pub fn is_play(&self) -> bool {
        matches!(self, InputMode::Game)
    }
}

/// Outcome of feeding one key to the machine: the next mode, at most one
/// action, and an optional line for the message log.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub mode: InputMode,
    pub action: Option<Action>,
    pub message: Option<(String, (u8, u8, u8))>,
}

impl Transition {
    fn to(mode: InputMode) -> Self {
        Self {
            mode,
            action: None,
            message: None,
        }
    }

    fn act(mode: InputMode, action: Action) -> Self {
        Self {
            mode,
            action: Some(action),
            message: None,
        }
    }

    fn with_message<S: Into<String>>(mut self, text: S, color: (u8, u8, u8)) -> Self {
        self.message = Some((text.into(), color));
        self
    }
}

pub fn direction(key: VirtualKeyCode) -> Option<(i32, i32)> {
    use VirtualKeyCode::*;
    match key {
        Up | K | Numpad8 => Some((0, -1)),
        Down | J | Numpad2 => Some((0, 1)),
        Left | H | Numpad4 => Some((-1, 0)),
        Right | L | Numpad6 => Some((1, 0)),
        Home | Y | Numpad7 => Some((-1, -1)),
        PageUp | U | Numpad9 => Some((1, -1)),
        End | B | Numpad1 => Some((-1, 1)),
        PageDown | N | Numpad3 => Some((1, 1)),
        _ => None,
    }
}

fn is_modifier(key: VirtualKeyCode) -> bool {
    use VirtualKeyCode::*;
    matches!(key, LShift | RShift | LControl | RControl | LAlt | RAlt)
}

fn is_confirm(key: VirtualKeyCode) -> bool {
    matches!(key, VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter)
}

/// `a` is slot 0, `b` slot 1, and so on.
pub fn letter_index(key: VirtualKeyCode) -> Option<usize> {
    use VirtualKeyCode::*;
    let index = match key {
        A => 0,
        B => 1,
        C => 2,
        D => 3,
        E => 4,
        F => 5,
        G => 6,
        H => 7,
        I => 8,
        J => 9,
        K => 10,
        L => 11,
        M => 12,
        N => 13,
        O => 14,
        P => 15,
        Q => 16,
        R => 17,
        S => 18,
        T => 19,
        U => 20,
        V => 21,
        W => 22,
        X => 23,
        Y => 24,
        Z => 25,
        _ => return None,
    };
    Some(index)
}

/// Decodes `event` under `mode`. Reads the map and log for context but
/// never changes them.
pub fn handle_key(
    mode: &InputMode,
    event: KeyEvent,
    map: &DungeonMap,
    log: &MessageLog,
) -> Transition {
    if is_modifier(event.key) {
        return Transition::to(mode.clone());
    }
    match mode {
        InputMode::Game => game_key(event, map, log),
        InputMode::Log { cursor } => log_key(*cursor, event, map, log),
        InputMode::UseInventory | InputMode::DropInventory => inventory_key(mode, event, map),
        InputMode::Targeting { cursor, kind } => targeting_key(*cursor, kind, event, map),
        InputMode::GameOver => match event.key {
            VirtualKeyCode::V => Transition::to(InputMode::Log {
                cursor: log.last_index(),
            }),
            _ => Transition::to(InputMode::GameOver),
        },
    }
}

fn game_key(event: KeyEvent, map: &DungeonMap, log: &MessageLog) -> Transition {
    if let Some((dx, dy)) = direction(event.key) {
        return Transition::act(InputMode::Game, Action::Bump { dx, dy });
    }
    match event.key {
        VirtualKeyCode::Period | VirtualKeyCode::Numpad5 => {
            Transition::act(InputMode::Game, Action::Wait)
        }
        VirtualKeyCode::G => Transition::act(InputMode::Game, Action::Pickup),
        VirtualKeyCode::I => Transition::to(InputMode::UseInventory),
        VirtualKeyCode::D => Transition::to(InputMode::DropInventory),
        VirtualKeyCode::V => Transition::to(InputMode::Log {
            cursor: log.last_index(),
        }),
        VirtualKeyCode::Slash => {
            let cursor = map
                .position_of(map.player())
                .unwrap_or_else(|| Point::new(0, 0));
            Transition::to(InputMode::Targeting {
                cursor,
                kind: TargetingKind::Look,
            })
        }
        _ => Transition::to(InputMode::Game),
    }
}

fn exit_mode(map: &DungeonMap) -> InputMode {
    if map.is_alive(map.player()) {
        InputMode::Game
    } else {
        InputMode::GameOver
    }
}

fn log_key(cursor: usize, event: KeyEvent, map: &DungeonMap, log: &MessageLog) -> Transition {
    let last = log.last_index();
    let cursor = match event.key {
        VirtualKeyCode::Up => {
            if cursor == 0 {
                last
            } else {
                cursor - 1
            }
        }
        VirtualKeyCode::Down => {
            if cursor >= last {
                0
            } else {
                cursor + 1
            }
        }
        VirtualKeyCode::Home => 0,
        VirtualKeyCode::End => last,
        _ => return Transition::to(exit_mode(map)),
    };
    Transition::to(InputMode::Log { cursor })
}

fn inventory_key(mode: &InputMode, event: KeyEvent, map: &DungeonMap) -> Transition {
    let Some(slot) = letter_index(event.key) else {
        return Transition::to(InputMode::Game);
    };
    let player = map.player();
    let item = map
        .ecs()
        .read_component::<Inventory>()
        .get(player)
        .and_then(|inventory| inventory.slot(slot));
    let Some(item) = item else {
        return Transition::to(InputMode::Game).with_message("Invalid entry", colors::INVALID);
    };

    if *mode == InputMode::DropInventory {
        return Transition::act(InputMode::Game, Action::DropItem { item });
    }

    let request = map
        .ecs()
        .read_component::<Consumable>()
        .get(item)
        .map(|consumable| consumable.effect.target_request());
    let cursor = map
        .position_of(player)
        .unwrap_or_else(|| Point::new(0, 0));
    match request {
        Some(TargetRequest::None) | None => Transition::act(
            InputMode::Game,
            Action::UseItem { item, target: None },
        ),
        Some(TargetRequest::Single) => Transition::to(InputMode::Targeting {
            cursor,
            kind: TargetingKind::SingleRanged { item },
        })
        .with_message("Select a target location.", colors::NEEDS_TARGET),
        Some(TargetRequest::Area { radius }) => Transition::to(InputMode::Targeting {
            cursor,
            kind: TargetingKind::AreaAttack { radius, item },
        })
        .with_message("Select a target location.", colors::NEEDS_TARGET),
    }
}

fn targeting_key(
    cursor: Point,
    kind: &TargetingKind,
    event: KeyEvent,
    map: &DungeonMap,
) -> Transition {
    if let Some((dx, dy)) = direction(event.key) {
        let step = event.multiplier();
        let moved = Point::new(
            (cursor.x + dx * step).clamp(0, map.width - 1),
            (cursor.y + dy * step).clamp(0, map.height - 1),
        );
        return Transition::to(InputMode::Targeting {
            cursor: moved,
            kind: kind.clone(),
        });
    }
    if is_confirm(event.key) {
        return Transition {
            mode: InputMode::Game,
            action: kind.confirm(cursor),
            message: None,
        };
    }
    Transition::to(InputMode::Game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::perform,
        data::{colors::WHITE, items::ConsumableTemplate},
        ecs,
        map::tests::open_map,
    };

    fn key(key: VirtualKeyCode) -> KeyEvent {
        KeyEvent::new(key)
    }

    fn world() -> (DungeonMap, MessageLog) {
        (
            open_map(40, 30, &[(1, 1, 38, 28)], Point::new(10, 10)),
            MessageLog::default(),
        )
    }

    fn stock(map: &mut DungeonMap, log: &mut MessageLog, template: &ConsumableTemplate) -> Entity {
        let player = map.player();
        let here = map.position_of(player).unwrap();
        let item = ecs::spawn_item(map, template, here);
        perform(&Action::Pickup, player, map, log).unwrap();
        item
    }

    #[test]
    fn directions_bump_in_game_mode() {
        let (map, log) = world();
        for (code, delta) in [
            (VirtualKeyCode::Up, (0, -1)),
            (VirtualKeyCode::J, (0, 1)),
            (VirtualKeyCode::Numpad4, (-1, 0)),
            (VirtualKeyCode::U, (1, -1)),
            (VirtualKeyCode::Numpad1, (-1, 1)),
        ] {
            let t = handle_key(&InputMode::Game, key(code), &map, &log);
            assert_eq!(t.mode, InputMode::Game);
            assert_eq!(
                t.action,
                Some(Action::Bump {
                    dx: delta.0,
                    dy: delta.1
                })
            );
        }
    }

    #[test]
    fn game_mode_commands() {
        let (map, log) = world();
        let wait = handle_key(&InputMode::Game, key(VirtualKeyCode::Period), &map, &log);
        assert_eq!(wait.action, Some(Action::Wait));
        let pickup = handle_key(&InputMode::Game, key(VirtualKeyCode::G), &map, &log);
        assert_eq!(pickup.action, Some(Action::Pickup));

        for (code, mode) in [
            (VirtualKeyCode::I, InputMode::UseInventory),
            (VirtualKeyCode::D, InputMode::DropInventory),
            (VirtualKeyCode::V, InputMode::Log { cursor: 0 }),
            (
                VirtualKeyCode::Slash,
                InputMode::Targeting {
                    cursor: Point::new(10, 10),
                    kind: TargetingKind::Look,
                },
            ),
        ] {
            let t = handle_key(&InputMode::Game, key(code), &map, &log);
            assert_eq!(t.mode, mode);
            assert_eq!(t.action, None);
        }
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let (map, log) = world();
        let t = handle_key(&InputMode::Game, key(VirtualKeyCode::F5), &map, &log);
        assert_eq!(t, Transition::to(InputMode::Game));
    }

    #[test]
    fn modifiers_alone_do_nothing() {
        let (map, log) = world();
        let targeting = InputMode::Targeting {
            cursor: Point::new(3, 3),
            kind: TargetingKind::Look,
        };
        let t = handle_key(&targeting, key(VirtualKeyCode::LShift), &map, &log);
        assert_eq!(t.mode, targeting);
        let t = handle_key(&InputMode::UseInventory, key(VirtualKeyCode::RAlt), &map, &log);
        assert_eq!(t.mode, InputMode::UseInventory);
    }

    #[test]
    fn log_scroll_wraps_both_ways() {
        let (map, mut log) = world();
        for text in ["one", "two", "three"] {
            log.add(text, WHITE);
        }
        let up = handle_key(&InputMode::Log { cursor: 0 }, key(VirtualKeyCode::Up), &map, &log);
        assert_eq!(up.mode, InputMode::Log { cursor: 2 });
        let down = handle_key(&InputMode::Log { cursor: 2 }, key(VirtualKeyCode::Down), &map, &log);
        assert_eq!(down.mode, InputMode::Log { cursor: 0 });
        let mid = handle_key(&InputMode::Log { cursor: 1 }, key(VirtualKeyCode::Up), &map, &log);
        assert_eq!(mid.mode, InputMode::Log { cursor: 0 });
        let home = handle_key(&InputMode::Log { cursor: 1 }, key(VirtualKeyCode::Home), &map, &log);
        assert_eq!(home.mode, InputMode::Log { cursor: 0 });
        let end = handle_key(&InputMode::Log { cursor: 0 }, key(VirtualKeyCode::End), &map, &log);
        assert_eq!(end.mode, InputMode::Log { cursor: 2 });
        let exit = handle_key(&InputMode::Log { cursor: 1 }, key(VirtualKeyCode::Escape), &map, &log);
        assert_eq!(exit, Transition::to(InputMode::Game));
    }

    #[test]
    fn entering_log_starts_at_newest() {
        let (map, mut log) = world();
        log.add("first", WHITE);
        log.add("second", WHITE);
        let t = handle_key(&InputMode::Game, key(VirtualKeyCode::V), &map, &log);
        assert_eq!(t.mode, InputMode::Log { cursor: 1 });
    }

    #[test]
    fn invalid_slot_logs_and_returns_to_game() {
        let (mut map, mut log) = world();
        stock(&mut map, &mut log, &ConsumableTemplate::health_potion());
        for mode in [InputMode::UseInventory, InputMode::DropInventory] {
            let t = handle_key(&mode, key(VirtualKeyCode::B), &map, &log);
            assert_eq!(t.mode, InputMode::Game);
            assert_eq!(t.action, None);
            assert_eq!(t.message, Some(("Invalid entry".to_string(), colors::INVALID)));
        }
    }

    #[test]
    fn non_letter_cancels_inventory_silently() {
        let (map, log) = world();
        let t = handle_key(&InputMode::DropInventory, key(VirtualKeyCode::Escape), &map, &log);
        assert_eq!(t, Transition::to(InputMode::Game));
    }

    #[test]
    fn inventory_letters_select_items() {
        let (mut map, mut log) = world();
        let potion = stock(&mut map, &mut log, &ConsumableTemplate::health_potion());
        let fireball = stock(&mut map, &mut log, &ConsumableTemplate::fireball_scroll());
        let confusion = stock(&mut map, &mut log, &ConsumableTemplate::confusion_scroll());

        let drop = handle_key(&InputMode::DropInventory, key(VirtualKeyCode::A), &map, &log);
        assert_eq!(drop.mode, InputMode::Game);
        assert_eq!(drop.action, Some(Action::DropItem { item: potion }));

        let quaff = handle_key(&InputMode::UseInventory, key(VirtualKeyCode::A), &map, &log);
        assert_eq!(
            quaff.action,
            Some(Action::UseItem {
                item: potion,
                target: None
            })
        );

        let area = handle_key(&InputMode::UseInventory, key(VirtualKeyCode::B), &map, &log);
        assert_eq!(area.action, None);
        assert_eq!(
            area.mode,
            InputMode::Targeting {
                cursor: Point::new(10, 10),
                kind: TargetingKind::AreaAttack {
                    radius: 3,
                    item: fireball
                },
            }
        );

        let single = handle_key(&InputMode::UseInventory, key(VirtualKeyCode::C), &map, &log);
        assert_eq!(
            single.mode,
            InputMode::Targeting {
                cursor: Point::new(10, 10),
                kind: TargetingKind::SingleRanged { item: confusion },
            }
        );
    }

    #[test]
    fn cursor_moves_with_strongest_modifier() {
        let (map, log) = world();
        let mode = InputMode::Targeting {
            cursor: Point::new(10, 10),
            kind: TargetingKind::Look,
        };
        let cursor_after = |event: KeyEvent| match handle_key(&mode, event, &map, &log).mode {
            InputMode::Targeting { cursor, .. } => cursor,
            other => panic!("left targeting: {other:?}"),
        };
        assert_eq!(cursor_after(key(VirtualKeyCode::Right)), Point::new(11, 10));
        assert_eq!(cursor_after(key(VirtualKeyCode::Right).with_shift()), Point::new(15, 10));
        assert_eq!(cursor_after(key(VirtualKeyCode::Down).with_control()), Point::new(10, 20));
        assert_eq!(
            cursor_after(key(VirtualKeyCode::Down).with_shift().with_control().with_alt()),
            Point::new(10, 29)
        );
        assert_eq!(cursor_after(key(VirtualKeyCode::Left).with_alt()), Point::new(0, 10));
    }

    #[test]
    fn confirm_runs_the_pending_callback() {
        let (map, log) = world();
        let item = map.player();
        let aimed = InputMode::Targeting {
            cursor: Point::new(4, 7),
            kind: TargetingKind::AreaAttack { radius: 3, item },
        };
        let t = handle_key(&aimed, key(VirtualKeyCode::Return), &map, &log);
        assert_eq!(t.mode, InputMode::Game);
        assert_eq!(
            t.action,
            Some(Action::UseItem {
                item,
                target: Some(Point::new(4, 7))
            })
        );

        let look = InputMode::Targeting {
            cursor: Point::new(4, 7),
            kind: TargetingKind::Look,
        };
        let t = handle_key(&look, key(VirtualKeyCode::NumpadEnter), &map, &log);
        assert_eq!(t, Transition::to(InputMode::Game));
    }

    #[test]
    fn other_keys_cancel_targeting() {
        let (map, log) = world();
        let aimed = InputMode::Targeting {
            cursor: Point::new(4, 7),
            kind: TargetingKind::SingleRanged { item: map.player() },
        };
        let t = handle_key(&aimed, key(VirtualKeyCode::Escape), &map, &log);
        assert_eq!(t, Transition::to(InputMode::Game));
    }

    #[test]
    fn game_over_only_opens_the_log() {
        let (map, mut log) = world();
        log.add("You died!", WHITE);
        let t = handle_key(&InputMode::GameOver, key(VirtualKeyCode::Up), &map, &log);
        assert_eq!(t, Transition::to(InputMode::GameOver));
        let t = handle_key(&InputMode::GameOver, key(VirtualKeyCode::V), &map, &log);
        assert_eq!(t.mode, InputMode::Log { cursor: 0 });
    }
}
