//! SDL2 backend for RETRO_OS.
//!
//! Implements `RenderBackend` and `InputBackend` using SDL2 for desktop use.
//! Text is drawn from the shared 8x8 bitmap font; all other drawing is solid
//! rectangles and circles, which is all the console UI needs.

mod font;
mod sdl_audio;

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;
use sdl2::{EventPump, Sdl, VideoSubsystem};

use retro_core::backend::{Color, InputBackend, RenderBackend, font_scale};
use retro_core::error::{Result, RetroError};
use retro_core::input::{Button, InputEvent};

pub use sdl_audio::SdlAudioBackend;

/// SDL2 rendering and input backend.
pub struct SdlBackend {
    sdl: Sdl,
    video: VideoSubsystem,
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

impl SdlBackend {
    /// Create a new SDL2 backend with a window and keyboard text input on.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(RetroError::Backend)?;
        let video = sdl.video().map_err(RetroError::Backend)?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| RetroError::Backend(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| RetroError::Backend(e.to_string()))?;
        let event_pump = sdl.event_pump().map_err(RetroError::Backend)?;
        video.text_input().start();

        log::info!("SDL2 backend initialized: {width}x{height}");

        Ok(Self {
            sdl,
            video,
            canvas,
            event_pump,
        })
    }

    /// Open the music device on this backend's SDL context.
    pub fn open_audio(&self) -> Result<SdlAudioBackend> {
        SdlAudioBackend::new(&self.sdl)
    }

    /// Set the SDL draw color with optional blend mode.
    fn set_color(&mut self, color: Color) {
        if color.a < 255 {
            self.canvas.set_blend_mode(BlendMode::Blend);
        } else {
            self.canvas.set_blend_mode(BlendMode::None);
        }
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
    }

    /// Clipboard contents as typed characters (Ctrl+V in the terminal).
    fn paste(&self) -> Vec<InputEvent> {
        match self.video.clipboard().clipboard_text() {
            Ok(text) => text
                .chars()
                .filter(|c| !c.is_control() || *c == '\n')
                .map(|c| InputEvent::TextInput(if c == '\n' { ' ' } else { c }))
                .collect(),
            Err(e) => {
                log::warn!("Clipboard read failed: {e}");
                Vec::new()
            },
        }
    }
}

impl RenderBackend for SdlBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
        self.canvas.clear();
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_color(color);
        self.canvas
            .fill_rect(Rect::new(x, y, w, h))
            .map_err(RetroError::Backend)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        let scale = font_scale(font_size) as i32;
        let glyph_w = font::GLYPH_WIDTH as i32 * scale;
        self.set_color(color);

        let mut cx = x;
        for ch in text.chars() {
            let glyph_data = font::glyph(ch);
            for row in 0..font::GLYPH_HEIGHT as i32 {
                let bits = glyph_data[row as usize];
                for col in 0..8i32 {
                    if bits & (0x80 >> col) == 0 {
                        continue;
                    }
                    let px = cx + col * scale;
                    let py = y + row * scale;
                    if scale == 1 {
                        let _ = self.canvas.draw_point(Point::new(px, py));
                    } else {
                        let _ = self.canvas.fill_rect(Rect::new(
                            px,
                            py,
                            scale as u32,
                            scale as u32,
                        ));
                    }
                }
            }
            cx += glyph_w;
        }
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.video.text_input().stop();
        log::info!("SDL2 backend shut down");
        Ok(())
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: u16, color: Color) -> Result<()> {
        let r = radius as i32;
        self.set_color(color);

        // Midpoint circle, filled with horizontal spans.
        let mut x = 0i32;
        let mut y = r;
        let mut d = 1 - r;
        while x <= y {
            let _ = self
                .canvas
                .draw_line(Point::new(cx - y, cy + x), Point::new(cx + y, cy + x));
            if x != 0 {
                let _ = self
                    .canvas
                    .draw_line(Point::new(cx - y, cy - x), Point::new(cx + y, cy - x));
            }
            if x != y {
                let _ = self
                    .canvas
                    .draw_line(Point::new(cx - x, cy + y), Point::new(cx + x, cy + y));
                let _ = self
                    .canvas
                    .draw_line(Point::new(cx - x, cy - y), Point::new(cx + x, cy - y));
            }
            x += 1;
            if d < 0 {
                d += 2 * x + 1;
            } else {
                y -= 1;
                d += 2 * (x - y) + 1;
            }
        }
        Ok(())
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let raw: Vec<Event> = self.event_pump.poll_iter().collect();
        let mut events = Vec::new();
        for event in raw {
            match event {
                Event::KeyDown {
                    keycode: Some(Keycode::V),
                    keymod,
                    ..
                } if keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD) => {
                    events.extend(self.paste());
                },
                other => events.extend(map_sdl_event(other)),
            }
        }
        events
    }
}

/// Map an SDL2 event to RETRO_OS input events.
fn map_sdl_event(event: Event) -> Vec<InputEvent> {
    match event {
        Event::Quit { .. } => vec![InputEvent::Quit],
        Event::KeyDown {
            keycode: Some(key),
            repeat,
            ..
        } => map_key_down(key, repeat).into_iter().collect(),
        Event::MouseButtonDown { x, y, .. } => vec![InputEvent::PointerClick { x, y }],
        Event::TextInput { text, .. } => map_text(&text),
        _ => Vec::new(),
    }
}

/// Characters from one SDL text-input event.
fn map_text(text: &str) -> Vec<InputEvent> {
    text.chars()
        .filter(|c| !c.is_control())
        .map(InputEvent::TextInput)
        .collect()
}

/// Map a key press. Auto-repeat only applies to navigation and editing keys.
fn map_key_down(key: Keycode, repeat: bool) -> Option<InputEvent> {
    let event = match key {
        Keycode::Up => InputEvent::ButtonPress(Button::Up),
        Keycode::Down => InputEvent::ButtonPress(Button::Down),
        Keycode::Left => InputEvent::ButtonPress(Button::Left),
        Keycode::Right => InputEvent::ButtonPress(Button::Right),
        Keycode::Backspace => InputEvent::Backspace,
        _ if repeat => return None,
        Keycode::Return | Keycode::KpEnter => InputEvent::ButtonPress(Button::Confirm),
        Keycode::Escape => InputEvent::ButtonPress(Button::Cancel),
        Keycode::F1 => InputEvent::ButtonPress(Button::Power),
        Keycode::F2 => InputEvent::ButtonPress(Button::Music),
        Keycode::PageUp | Keycode::KpPlus => InputEvent::ButtonPress(Button::VolumeUp),
        Keycode::PageDown | Keycode::KpMinus => InputEvent::ButtonPress(Button::VolumeDown),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_directions() {
        assert_eq!(
            map_key_down(Keycode::Up, false),
            Some(InputEvent::ButtonPress(Button::Up))
        );
        assert_eq!(
            map_key_down(Keycode::Right, false),
            Some(InputEvent::ButtonPress(Button::Right))
        );
    }

    #[test]
    fn arrows_and_backspace_repeat() {
        assert!(map_key_down(Keycode::Down, true).is_some());
        assert_eq!(
            map_key_down(Keycode::Backspace, true),
            Some(InputEvent::Backspace)
        );
    }

    #[test]
    fn action_keys_ignore_repeat() {
        assert_eq!(map_key_down(Keycode::Return, true), None);
        assert_eq!(map_key_down(Keycode::F1, true), None);
        assert_eq!(
            map_key_down(Keycode::Return, false),
            Some(InputEvent::ButtonPress(Button::Confirm))
        );
    }

    #[test]
    fn console_buttons() {
        assert_eq!(
            map_key_down(Keycode::F1, false),
            Some(InputEvent::ButtonPress(Button::Power))
        );
        assert_eq!(
            map_key_down(Keycode::F2, false),
            Some(InputEvent::ButtonPress(Button::Music))
        );
        assert_eq!(
            map_key_down(Keycode::PageUp, false),
            Some(InputEvent::ButtonPress(Button::VolumeUp))
        );
        assert_eq!(
            map_key_down(Keycode::KpMinus, false),
            Some(InputEvent::ButtonPress(Button::VolumeDown))
        );
    }

    #[test]
    fn letter_keys_are_left_to_text_input() {
        assert_eq!(map_key_down(Keycode::M, false), None);
        assert_eq!(map_key_down(Keycode::P, false), None);
    }

    #[test]
    fn text_event_yields_every_char() {
        assert_eq!(
            map_text("hé!"),
            vec![
                InputEvent::TextInput('h'),
                InputEvent::TextInput('é'),
                InputEvent::TextInput('!'),
            ]
        );
        assert!(map_text("\t").is_empty());
    }

    #[test]
    fn quit_event() {
        assert_eq!(
            map_sdl_event(Event::Quit { timestamp: 0 }),
            vec![InputEvent::Quit]
        );
    }
}
