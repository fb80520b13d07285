use bracket_terminal::prelude::RGB;

#[derive(Clone, Debug)]
pub struct ConsumableTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub effect: ConsumableEffect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumableEffect {
    Heal { amount: i32 },
    Lightning { damage: i32, range: i32 },
    Confusion { turns: i32 },
    Fireball { damage: i32, radius: i32 },
}

/// What the input layer must collect before the item can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRequest {
    None,
    Single,
    Area { radius: i32 },
}

impl ConsumableEffect {
    pub fn target_request(&self) -> TargetRequest {
        match self {
            ConsumableEffect::Heal { .. } | ConsumableEffect::Lightning { .. } => {
                TargetRequest::None
            }
            ConsumableEffect::Confusion { .. } => TargetRequest::Single,
            ConsumableEffect::Fireball { radius, .. } => TargetRequest::Area { radius: *radius },
        }
    }
}

impl ConsumableTemplate {
    pub fn health_potion() -> Self {
        Self::new(
            "Health Potion",
            '!',
            RGB::from_u8(127, 0, 255),
            ConsumableEffect::Heal { amount: 4 },
        )
    }

    pub fn fireball_scroll() -> Self {
        Self::new(
            "Fireball Scroll",
            '~',
            RGB::from_u8(255, 0, 0),
            ConsumableEffect::Fireball {
                damage: 12,
                radius: 3,
            },
        )
    }

    pub fn confusion_scroll() -> Self {
        Self::new(
            "Confusion Scroll",
            '~',
            RGB::from_u8(207, 63, 255),
            ConsumableEffect::Confusion { turns: 10 },
        )
    }

    pub fn lightning_scroll() -> Self {
        Self::new(
            "Lightning Scroll",
            '~',
            RGB::from_u8(255, 255, 0),
            ConsumableEffect::Lightning {
                damage: 20,
                range: 5,
            },
        )
    }

    pub const fn new(name: &'static str, glyph: char, color: RGB, effect: ConsumableEffect) -> Self {
        Self {
            name,
            glyph,
            color,
            effect,
        }
    }
}
