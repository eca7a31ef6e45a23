//! Per-screen drawing. Everything is rebuilt from console state each frame.

use retro_core::backend::{GLYPH_CELL, RenderBackend};
use retro_core::catalog::CatalogItem;
use retro_core::chat::Role;
use retro_core::color::{Color, darken};
use retro_core::console::Console;
use retro_core::embed::EmbedSurface;
use retro_core::error::Result;
use retro_core::skin::Palette;
use retro_core::view::Screen;

use crate::app_state::{AppState, VISUALISER_BARS};
use crate::layout::{CARD_H, FOOTER_H, Layout, POWER_RADIUS, Rect, TOP_BAR_H};

const SMALL: u16 = 8;
const MEDIUM: u16 = 16;
const LARGE: u16 = 24;

/// Draw one frame (without presenting it).
pub fn draw(be: &mut dyn RenderBackend, state: &AppState) -> Result<()> {
    let palette = state.console.palette();
    be.clear(palette.background)?;
    match state.console.view().screen() {
        Screen::PowerOff => draw_power_off(be, state, &palette)?,
        Screen::Booting => draw_boot(be, state, &palette)?,
        Screen::Menu => draw_menu(be, state, &palette)?,
        Screen::PlayingGame => draw_game(be, state, &palette)?,
        Screen::PlayingMusic => draw_radio(be, state, &palette)?,
        Screen::Chatting => draw_chat(be, state, &palette)?,
    }
    draw_scanlines(be, &state.layout, palette.scanline)
}

fn draw_power_off(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let l = &state.layout;
    let (cx, cy) = l.power_center();
    be.fill_circle(cx, cy, POWER_RADIUS, p.border)?;
    be.fill_circle(cx, cy, POWER_RADIUS - 4, p.panel)?;

    // Power symbol: broken ring with a bar through the gap.
    be.fill_circle(cx, cy + 2, 18, p.dim_text)?;
    be.fill_circle(cx, cy + 2, 14, p.panel)?;
    be.fill_rect(cx - 5, cy - 18, 10, 12, p.panel)?;
    be.fill_rect(cx - 2, cy - 20, 4, 20, p.dim_text)?;

    // Standby LED.
    be.fill_circle(cx + 36, cy - 36, 6, darken(p.error, 0.5))?;

    if state.blink_on() {
        let text = &state.console.skin().strings.press_start;
        let y = cy + POWER_RADIUS as i32 + 24;
        draw_centered(be, text, l.width, y, SMALL, p.dim_text)?;
    }
    Ok(())
}

fn draw_boot(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let line_h = 28;
    let lines = state.console.view().boot_lines();
    let total = lines.len() as i32 + 1;
    let mut y = state.layout.height as i32 - 40 - total * line_h;
    for line in lines {
        be.draw_text(&format!("> {line}"), 40, y, MEDIUM, p.primary)?;
        y += line_h;
    }
    if state.blink_on() {
        be.draw_text("_", 40, y, MEDIUM, p.primary)?;
    }
    Ok(())
}

fn draw_menu(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let console = &state.console;
    let l = &state.layout;
    let view = console.view();

    draw_top_bar(be, state, p)?;

    let selected = view.selected_index();
    for (index, item) in console.catalog().items().iter().enumerate() {
        if let Some(rect) = l.card_rect(index, selected) {
            draw_card(be, item, rect, index == selected, p)?;
        }
    }

    // Footer: selected description and key hints.
    let fy = (l.height - FOOTER_H) as i32;
    be.fill_rect(0, fy, l.width, FOOTER_H, p.panel)?;
    be.fill_rect(0, fy, l.width, 2, p.border)?;
    let max_chars = ((l.width / GLYPH_CELL) as usize).saturating_sub(4);
    if let Some(item) = console.catalog().get(selected) {
        let mut line = fit(&item.description, max_chars.saturating_sub(14));
        if state.blink_on() && item.launch_target.is_available() {
            line.push_str("  PRESS ENTER");
        }
        draw_centered(be, &line, l.width, fy + 10, SMALL, p.accent)?;
    }
    let hints = "[ARROWS] NAV  [ENTER] GO  [F2] AUDIO  [PGUP/PGDN] VOL";
    draw_centered(be, &fit(hints, max_chars), l.width, fy + 28, SMALL, p.dim_text)
}

fn draw_top_bar(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let l = &state.layout;
    let view = state.console.view();
    let strings = &state.console.skin().strings;

    be.fill_rect(0, 0, l.width, TOP_BAR_H, p.panel)?;
    be.fill_rect(0, TOP_BAR_H as i32 - 4, l.width, 4, p.border)?;
    be.draw_text("[+]", 16, 14, MEDIUM, p.primary)?;
    be.draw_text(&strings.title, 72, 14, MEDIUM, p.primary)?;

    // Right side, laid out right to left.
    let mut x = l.width as i32 - 16;
    x -= be.measure_text(&strings.clock, SMALL) as i32;
    be.draw_text(&strings.clock, x, 20, SMALL, p.primary)?;

    let music = if view.music_playing() { "ON [F2]" } else { "OFF [F2]" };
    x -= 24 + be.measure_text(music, SMALL) as i32;
    be.draw_text(music, x, 20, SMALL, p.primary)?;

    let bar_w = 64;
    x -= 24 + bar_w as i32;
    be.stroke_rect(x, 18, bar_w, 12, 1, darken(p.primary, 0.4))?;
    let fill = bar_w * view.volume() as u32 / 100;
    be.fill_rect(x, 18, fill, 12, p.primary)?;
    x -= 8 + be.measure_text("VOL", SMALL) as i32;
    be.draw_text("VOL", x, 20, SMALL, p.primary)
}

fn draw_card(
    be: &mut dyn RenderBackend,
    item: &CatalogItem,
    r: Rect,
    selected: bool,
    p: &Palette,
) -> Result<()> {
    let face = if item.is_app() { p.panel } else { darken(p.panel, 0.8) };
    be.fill_rect(r.x, r.y, r.w, r.h, face)?;

    let glyph_w = be.measure_text(&item.glyph, LARGE);
    be.draw_text(
        &item.glyph,
        r.x + (r.w as i32 - glyph_w as i32) / 2,
        r.y + 14,
        LARGE,
        p.text,
    )?;

    let max_chars = ((r.w / GLYPH_CELL) as usize).saturating_sub(1);
    let title = fit(&item.title, max_chars);
    let title_w = be.measure_text(&title, SMALL);
    let title_color = if selected { p.primary } else { p.dim_text };
    be.draw_text(
        &title,
        r.x + (r.w as i32 - title_w as i32) / 2,
        r.y + 50,
        SMALL,
        title_color,
    )?;

    let strip_y = r.y + CARD_H as i32 - 24;
    be.fill_rect(r.x, strip_y, r.w, 24, p.background)?;
    let category_color = if item.is_app() { p.primary } else { p.dim_text };
    be.draw_text(&fit(&item.category, 8), r.x + 8, strip_y + 8, SMALL, category_color)?;
    let year_w = be.measure_text(&item.year, SMALL);
    let year_x = r.x + r.w as i32 - year_w as i32 - 10;
    be.stroke_rect(year_x - 3, strip_y + 5, year_w + 6, 14, 1, p.border)?;
    be.draw_text(&item.year, year_x, strip_y + 8, SMALL, p.dim_text)?;

    if selected {
        be.stroke_rect(r.x - 4, r.y - 4, r.w + 8, r.h + 8, 4, p.primary)
    } else {
        be.stroke_rect(r.x, r.y, r.w, r.h, 2, p.border)
    }
}

fn draw_game(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let l = &state.layout;
    let console = &state.console;
    let item = console
        .view()
        .active_item_id()
        .and_then(|id| console.catalog().find(id));
    let title = item.map_or("UNKNOWN", |i| i.title.as_str());

    be.fill_rect(0, 0, l.width, 40, p.panel)?;
    be.fill_rect(0, 40, l.width, 1, p.border)?;
    if state.blink_on() {
        be.fill_rect(12, 14, 12, 12, p.error)?;
    }
    be.draw_text(&format!("RUNNING: {title}"), 32, 16, SMALL, p.primary)?;
    let exit = l.game_exit();
    be.stroke_rect(exit.x, exit.y, exit.w, exit.h, 1, Color::WHITE)?;
    be.draw_text("[ESC] EXIT", exit.x + 10, exit.y + 8, SMALL, Color::WHITE)?;

    let mid = l.height as i32 / 2;
    draw_centered(be, "GAME OPENED IN YOUR WEB BROWSER", l.width, mid - 40, MEDIUM, p.primary)?;
    if let Some(locator) = state.embed.current() {
        let max_chars = ((l.width / GLYPH_CELL) as usize).saturating_sub(8);
        draw_centered(be, &fit(locator, max_chars), l.width, mid, SMALL, p.dim_text)?;
    }
    draw_centered(be, "PRESS [ESC] TO RETURN", l.width, mid + 32, SMALL, p.dim_text)
}

fn draw_radio(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let l = &state.layout;
    let view = state.console.view();
    let strings = &state.console.skin().strings;
    let playing = view.music_playing();

    // Visualiser behind the panel.
    let area_x = 40;
    let area_w = l.width - 80;
    let area_h = l.height - 120;
    let gap = 4;
    let bar_w = (area_w - gap * (VISUALISER_BARS as u32 - 1)) / VISUALISER_BARS as u32;
    let bar_color = if playing {
        darken(p.primary, 0.5)
    } else {
        darken(p.primary, 0.2)
    };
    let floor = (l.height - 80) as i32;
    for (i, pct) in state.visualiser.iter().enumerate() {
        let h = area_h * *pct as u32 / 100;
        let x = area_x + (i as u32 * (bar_w + gap)) as i32;
        be.fill_rect(x, floor - h as i32, bar_w, h, bar_color)?;
    }

    // Panel.
    let (pw, ph) = (400, 240);
    let px = (l.width as i32 - pw as i32) / 2;
    let py = (l.height as i32 - ph as i32) / 2 - 24;
    be.fill_rect(px, py, pw, ph, Color::BLACK.with_alpha(230))?;
    be.stroke_rect(px, py, pw, ph, 4, p.primary)?;

    // Disc: the hub ring is offset while playing so it reads as spinning.
    let (dx, dy) = (l.width as i32 / 2, py + 56);
    be.fill_circle(dx, dy, 28, p.primary)?;
    be.fill_circle(dx, dy, 22, Color::BLACK)?;
    let wobble = if playing && state.blink_on() { 3 } else { 0 };
    be.fill_circle(dx + wobble, dy, 6, p.primary)?;

    draw_centered(be, &strings.radio_title, l.width, py + 100, LARGE, p.primary)?;
    draw_centered(be, &strings.radio_track, l.width, py + 136, SMALL, p.primary)?;
    draw_centered(
        be,
        &format!("VOL {:>3}", view.volume()),
        l.width,
        py + 154,
        SMALL,
        p.dim_text,
    )?;

    let (back, toggle) = l.radio_buttons();
    be.stroke_rect(back.x, back.y, back.w, back.h, 1, darken(p.primary, 0.5))?;
    be.draw_text("[ESC] BACK", back.x + 36, back.y + 12, SMALL, p.primary)?;
    be.fill_rect(toggle.x, toggle.y, toggle.w, toggle.h, p.primary)?;
    let label = if playing { "PAUSE" } else { "PLAY" };
    let label_w = be.measure_text(label, SMALL) as i32;
    be.draw_text(
        label,
        toggle.x + (toggle.w as i32 - label_w) / 2,
        toggle.y + 12,
        SMALL,
        Color::BLACK,
    )
}

fn draw_chat(be: &mut dyn RenderBackend, state: &AppState, p: &Palette) -> Result<()> {
    let l = &state.layout;
    let console = &state.console;
    let strings = &console.skin().strings;
    let frame = Rect::new(16, 16, l.width - 32, l.height - 32);

    be.fill_rect(frame.x, frame.y, frame.w, frame.h, Color::BLACK)?;
    be.stroke_rect(frame.x, frame.y, frame.w, frame.h, 4, darken(p.primary, 0.35))?;

    // Header.
    let header_h: i32 = 40;
    be.fill_rect(
        frame.x + 4,
        frame.y + 4,
        frame.w - 8,
        (header_h - 4) as u32,
        darken(p.primary, 0.12),
    )?;
    be.fill_rect(frame.x, frame.y + header_h, frame.w, 2, darken(p.primary, 0.45))?;
    if state.blink_on() {
        be.fill_rect(frame.x + 14, frame.y + 16, 10, 10, p.primary)?;
    }
    be.draw_text(&strings.chat_title, frame.x + 34, frame.y + 14, MEDIUM, p.primary)?;
    if !state.online {
        let x = frame.x + 42 + be.measure_text(&strings.chat_title, MEDIUM) as i32;
        be.draw_text("OFFLINE", x, frame.y + 18, SMALL, p.error)?;
    }
    let exit = l.chat_exit();
    be.draw_text("[ESC] TO EXIT", exit.x + 8, exit.y + 8, SMALL, darken(p.primary, 0.7))?;

    // Storyboard column on the right once a script has been analysed.
    let storyboard = console.storyboard();
    let side_w = if storyboard.is_empty() { 0 } else { 208 };
    if side_w > 0 {
        let sx = frame.x + frame.w as i32 - side_w as i32 - 4;
        let top = frame.y + header_h + 2;
        let bottom = frame.y + frame.h as i32 - 48;
        draw_storyboard(be, console, Rect::new(sx, top, side_w, (bottom - top) as u32), p)?;
    }

    // Conversation.
    let text_x = frame.x + 16;
    let text_w = frame.w - 32 - side_w;
    let cols = (text_w / (GLYPH_CELL * 2)) as usize;
    let line_h = 20;
    let top = frame.y + header_h + 12;
    let bottom = frame.y + frame.h as i32 - 56;
    let rows = ((bottom - top) / line_h).max(1) as usize;

    let messages = console.session().messages();
    if messages.is_empty() && !console.session().is_busy() {
        let mut y = top + 60;
        for line in &strings.chat_welcome {
            let w = be.measure_text(line, MEDIUM) as i32;
            be.draw_text(line, text_x + (text_w as i32 - w) / 2, y, MEDIUM, darken(p.primary, 0.5))?;
            y += line_h;
        }
    } else {
        let mut lines: Vec<(String, Color)> = Vec::new();
        for msg in messages {
            let (prefix, color) = match (msg.role, msg.is_error) {
                (_, true) => ("# ", p.error),
                (Role::User, false) => ("> ", p.text),
                (Role::Model, false) => ("# ", p.primary),
            };
            for (i, line) in wrap(&msg.text, cols.saturating_sub(2)).into_iter().enumerate() {
                let lead = if i == 0 { prefix } else { "  " };
                lines.push((format!("{lead}{line}"), color));
            }
        }
        if console.session().is_busy() && state.blink_on() {
            lines.push((format!("# {}", strings.processing), p.primary));
        }
        let skip = lines.len().saturating_sub(rows);
        let mut y = top;
        for (line, color) in &lines[skip..] {
            be.draw_text(line, text_x, y, MEDIUM, *color)?;
            y += line_h;
        }
    }

    // Input line.
    let iy = frame.y + frame.h as i32 - 44;
    be.fill_rect(frame.x, iy - 6, frame.w, 2, darken(p.primary, 0.45))?;
    be.draw_text(">", text_x, iy + 6, MEDIUM, p.primary)?;
    let input = console.panel().input();
    let room = ((frame.w - 64) / (GLYPH_CELL * 2)) as usize;
    if input.is_empty() {
        be.draw_text(&strings.chat_placeholder, text_x + 32, iy + 6, MEDIUM, darken(p.primary, 0.35))?;
    } else {
        let mut shown = tail(&input.to_uppercase(), room.saturating_sub(1));
        if state.blink_on() {
            shown.push('_');
        }
        be.draw_text(&shown, text_x + 32, iy + 6, MEDIUM, p.primary)?;
    }
    Ok(())
}

fn draw_storyboard(be: &mut dyn RenderBackend, console: &Console, r: Rect, p: &Palette) -> Result<()> {
    be.fill_rect(r.x, r.y, 2, r.h, darken(p.primary, 0.45))?;
    be.draw_text("STORYBOARD", r.x + 12, r.y + 10, SMALL, p.accent)?;
    let cols = ((r.w - 20) / GLYPH_CELL) as usize;
    let mut y = r.y + 30;
    let limit = r.y + r.h as i32 - 12;
    for scene in console.storyboard().scenes() {
        if y > limit {
            break;
        }
        let status = if scene.loading_image {
            "[...]"
        } else if scene.image.is_some() {
            "[IMG]"
        } else {
            "[   ]"
        };
        let header = format!("SCENE {:02} {status}", scene.scene_number);
        be.draw_text(&header, r.x + 12, y, SMALL, p.primary)?;
        y += 12;
        for line in wrap(&scene.description.to_uppercase(), cols).into_iter().take(2) {
            be.draw_text(&line, r.x + 12, y, SMALL, p.dim_text)?;
            y += 10;
        }
        y += 8;
    }
    Ok(())
}

/// CRT scanlines over the whole frame.
fn draw_scanlines(be: &mut dyn RenderBackend, l: &Layout, color: Color) -> Result<()> {
    if color.a == 0 {
        return Ok(());
    }
    for y in (0..l.height as i32).step_by(4) {
        be.fill_rect(0, y, l.width, 1, color)?;
    }
    Ok(())
}

fn draw_centered(
    be: &mut dyn RenderBackend,
    text: &str,
    width: u32,
    y: i32,
    size: u16,
    color: Color,
) -> Result<()> {
    let w = be.measure_text(text, size) as i32;
    be.draw_text(text, (width as i32 - w) / 2, y, size, color)
}

/// `text` cut to `max` chars, with `..` when shortened.
fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}

/// Last `max` chars of `text`.
fn tail(text: &str, max: usize) -> String {
    let skip = text.chars().count().saturating_sub(max);
    text.chars().skip(skip).collect()
}

/// Word-wrap to `cols` chars per line, honouring explicit newlines.
/// Words longer than a line are split.
fn wrap(text: &str, cols: usize) -> Vec<String> {
    let cols = cols.max(1);
    let mut out = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;
        for word in para.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > cols {
                if len > 0 {
                    out.push(std::mem::take(&mut line));
                    len = 0;
                }
                out.push(word.drain(..cols).collect());
            }
            if word.is_empty() {
                continue;
            }
            let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
            if needed > cols {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(word.iter());
            len += word.len();
        }
        out.push(line);
    }
    out
}
