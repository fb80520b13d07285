pub mod items;
pub mod monsters;

/// Message and glyph colors shared by the simulation and the renderer.
pub mod colors {
    pub const WELCOME_TEXT: (u8, u8, u8) = (32, 160, 255);
    pub const PLAYER_ATTACK: (u8, u8, u8) = (224, 224, 224);
    pub const ENEMY_ATTACK: (u8, u8, u8) = (255, 192, 192);
    pub const PLAYER_DIE: (u8, u8, u8) = (255, 48, 48);
    pub const ENEMY_DIE: (u8, u8, u8) = (255, 160, 48);
    pub const INVALID: (u8, u8, u8) = (255, 255, 0);
    pub const IMPOSSIBLE: (u8, u8, u8) = (128, 128, 128);
    pub const HEALTH_RECOVERED: (u8, u8, u8) = (0, 255, 0);
    pub const STATUS_EFFECT_APPLIED: (u8, u8, u8) = (63, 255, 63);
    pub const NEEDS_TARGET: (u8, u8, u8) = (63, 255, 255);
    pub const ITEM_PICKUP: (u8, u8, u8) = (191, 191, 255);
    pub const WHITE: (u8, u8, u8) = (255, 255, 255);
    pub const REMAINS: (u8, u8, u8) = (191, 0, 0);
    pub const BAR_FILLED: (u8, u8, u8) = (0, 96, 0);
    pub const BAR_EMPTY: (u8, u8, u8) = (64, 16, 16);
}
