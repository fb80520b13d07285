use bracket_terminal::prelude::RGB;

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub hp: i32,
    pub defence: i32,
    pub power: i32,
}

impl MonsterTemplate {
    /// The common spawn; four out of five monsters.
    pub fn orc() -> Self {
        Self::new("Orc", 'o', RGB::from_u8(63, 127, 63), 10, 0, 3)
    }

    pub fn troll() -> Self {
        Self::new("Troll", 'T', RGB::from_u8(0, 127, 0), 16, 1, 4)
    }

    fn new(
        name: &'static str,
        glyph: char,
        color: RGB,
        hp: i32,
        defence: i32,
        power: i32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            hp,
            defence,
            power,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerTemplate {
    pub name: &'static str,
    pub hp: i32,
    pub defence: i32,
    pub power: i32,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            name: "Player",
            hp: 30,
            defence: 2,
            power: 5,
        }
    }
}
