use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use specs::prelude::{Join, WorldExt};

use crate::{
    data::colors,
    ecs::components::{Inventory, Position, Renderable},
    engine::Engine,
    input::InputMode,
    log::MessageLog,
    map::DungeonMap,
};

const PANEL_TOP: i32 = 45;
const BAR_WIDTH: i32 = 20;
const LOG_LEFT: i32 = 21;

fn rgb((r, g, b): (u8, u8, u8)) -> RGB {
    RGB::from_u8(r, g, b)
}

/// Draws one frame for the current mode. The map and HUD are always shown;
/// menus and the targeting cursor are layered on top.
pub fn render_all(ctx: &mut BTerm, engine: &Engine) {
    ctx.cls();
    draw_map(ctx, &engine.map);
    draw_entities(ctx, &engine.map);
    if let Some(stats) = engine.player_stats() {
        draw_health_bar(ctx, stats.hp(), stats.max_hp, BAR_WIDTH);
    }
    let (width, height) = ctx.get_char_size();
    let log_width = width as i32 - LOG_LEFT;
    let log_height = height as i32 - PANEL_TOP;
    draw_log(ctx, &engine.log, LOG_LEFT, PANEL_TOP, log_width, log_height, None);

    match &engine.mode {
        InputMode::Log { cursor } => {
            ctx.draw_box(0, 0, width as i32 - 1, height as i32 - 1, rgb(colors::WHITE), RGB::named(BLACK));
            ctx.print_color_centered(0, rgb(colors::WHITE), RGB::named(BLACK), "┤Message history├");
            draw_log(ctx, &engine.log, 1, 1, width as i32 - 2, height as i32 - 2, Some(*cursor));
        }
        InputMode::UseInventory => {
            draw_inventory(ctx, &engine.map, "Select an item to use");
        }
        InputMode::DropInventory => {
            draw_inventory(ctx, &engine.map, "Select an item to drop");
        }
        InputMode::Targeting { cursor, kind } => {
            draw_targeting(ctx, &engine.map, *cursor, kind.radius());
        }
        InputMode::GameOver => {
            ctx.print_color_centered(
                PANEL_TOP - 1,
                rgb(colors::PLAYER_DIE),
                RGB::named(BLACK),
                "You are dead. Press V to read the log.",
            );
        }
        InputMode::Game => {}
    }
}

/// Visible tiles in their own colors, explored ones dimmed, the rest blank.
pub fn draw_map(ctx: &mut BTerm, map: &DungeonMap) {
    for y in 0..map.height {
        for x in 0..map.width {
            let Some(tile) = map.tile_at(Point::new(x, y)) else {
                continue;
            };
            if tile.visible {
                ctx.set(x, y, tile.fg, tile.bg, tile.glyph);
            } else if tile.explored {
                ctx.set(x, y, tile.fg.to_greyscale() * 0.5, RGB::named(BLACK), tile.glyph);
            }
        }
    }
}

/// Renderables on visible tiles, lowest layer first so actors end up on top
/// of items and remains.
pub fn visible_renderables(map: &DungeonMap) -> Vec<(Point, Renderable)> {
    let positions = map.ecs().read_storage::<Position>();
    let renderables = map.ecs().read_storage::<Renderable>();
    let mut drawn: Vec<(Point, Renderable)> = (&positions, &renderables)
        .join()
        .filter(|(pos, _)| map.is_visible(pos.point))
        .map(|(pos, render)| (pos.point, render.clone()))
        .collect();
    drawn.sort_by_key(|(_, render)| render.order);
    drawn
}

pub fn draw_entities(ctx: &mut BTerm, map: &DungeonMap) {
    for (point, render) in visible_renderables(map) {
        ctx.set(point.x, point.y, render.fg, render.bg, render.glyph);
    }
}

pub fn draw_health_bar(ctx: &mut BTerm, hp: i32, max_hp: i32, width: i32) {
    ctx.draw_bar_horizontal(
        0,
        PANEL_TOP,
        width,
        hp.max(0),
        max_hp,
        rgb(colors::BAR_FILLED),
        rgb(colors::BAR_EMPTY),
    );
    ctx.print_color(
        1,
        PANEL_TOP,
        rgb(colors::WHITE),
        rgb(colors::BAR_FILLED),
        format!("HP: {}/{}", hp.max(0), max_hp),
    );
}

/// Bottom-aligned message log. With a cursor, the view ends at that message
/// instead of the newest one.
pub fn draw_log(
    ctx: &mut BTerm,
    log: &MessageLog,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    cursor: Option<usize>,
) {
    if log.is_empty() {
        return;
    }
    let end = cursor.map_or(log.len(), |cursor| (cursor + 1).min(log.len()));
    let mut row = y + height - 1;
    for message in log.messages()[..end].iter().rev() {
        for line in wrap(&message.full_text(), width.max(1) as usize).iter().rev() {
            if row < y {
                return;
            }
            ctx.print_color(x, row, message.fg, RGB::named(BLACK), line);
            row -= 1;
        }
    }
}

/// Lettered list of the player's items in a box at the top left.
pub fn draw_inventory(ctx: &mut BTerm, map: &DungeonMap, title: &str) {
    let names: Vec<String> = {
        let inventories = map.ecs().read_component::<Inventory>();
        inventories
            .get(map.player())
            .map(|inventory| inventory.items.iter().map(|&item| map.name_of(item)).collect())
            .unwrap_or_default()
    };
    let width = names
        .iter()
        .map(|name| name.len() as i32 + 4)
        .chain(std::iter::once(title.len() as i32 + 4))
        .max()
        .unwrap_or(20);
    let height = names.len().max(1) as i32 + 2;
    ctx.draw_box(0, 0, width, height, rgb(colors::WHITE), RGB::named(BLACK));
    ctx.print_color(1, 0, rgb(colors::WHITE), RGB::named(BLACK), title);
    if names.is_empty() {
        ctx.print(1, 1, "(Empty)");
        return;
    }
    for (index, name) in names.iter().enumerate() {
        let letter = (b'a' + index as u8) as char;
        ctx.print(1, 1 + index as i32, format!("({letter}) {name}"));
    }
}

/// Highlights the square of `radius` around the cursor. The cursor cell is
/// redrawn with inverted colours so it stands out inside the square.
pub fn draw_targeting(ctx: &mut BTerm, map: &DungeonMap, cursor: Point, radius: i32) {
    for point in highlighted_cells(map, cursor, radius) {
        ctx.set_bg(point.x, point.y, RGB::named(WHITE));
    }
    if let Some(tile) = map.tile_at(cursor) {
        ctx.set(cursor.x, cursor.y, tile.bg, RGB::named(WHITE), tile.glyph);
    }
}

fn highlighted_cells(map: &DungeonMap, cursor: Point, radius: i32) -> Vec<Point> {
    let mut cells = Vec::new();
    for y in cursor.y - radius..=cursor.y + radius {
        for x in cursor.x - radius..=cursor.x + radius {
            let point = Point::new(x, y);
            if map.is_in_bounds(point) {
                cells.push(point);
            }
        }
    }
    cells
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let split = word.char_indices().nth(width).map_or(word.len(), |(idx, _)| idx);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{items::ConsumableTemplate, monsters::MonsterTemplate},
        ecs::{self, components::RenderOrder},
        map::tests::open_map,
    };

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap("Orc attacks Player for 1 hit points.", 16),
            vec!["Orc attacks", "Player for 1 hit", "points."]
        );
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn actors_draw_over_items_and_hidden_things_are_skipped() {
        let mut map = open_map(30, 5, &[(1, 1, 28, 3)], Point::new(2, 2));
        ecs::spawn_item(&mut map, &ConsumableTemplate::health_potion(), Point::new(4, 2));
        ecs::spawn_monster(&mut map, &MonsterTemplate::orc(), Point::new(4, 2));
        ecs::spawn_monster(&mut map, &MonsterTemplate::troll(), Point::new(25, 2));
        let player = map.player();
        map.update_fov(player, 8);

        let drawn = visible_renderables(&map);
        let orders: Vec<RenderOrder> = drawn.iter().map(|(_, render)| render.order).collect();
        assert_eq!(
            orders,
            vec![RenderOrder::Item, RenderOrder::Actor, RenderOrder::Actor]
        );
        assert!(drawn.iter().all(|(point, _)| point.x < 25));
    }

    #[test]
    fn targeting_square_is_clipped_to_the_map() {
        let map = open_map(10, 10, &[(1, 1, 8, 8)], Point::new(2, 2));
        assert_eq!(highlighted_cells(&map, Point::new(5, 5), 0), vec![Point::new(5, 5)]);
        assert_eq!(highlighted_cells(&map, Point::new(5, 5), 1).len(), 9);
        assert_eq!(highlighted_cells(&map, Point::new(0, 0), 3).len(), 16);
        let corner = highlighted_cells(&map, Point::new(9, 9), 2);
        assert_eq!(corner.len(), 9);
        assert!(corner.contains(&Point::new(9, 9)));
        assert!(corner.iter().all(|point| point.x >= 7 && point.y >= 7));
    }
}
